//! Byte-level reading infrastructure for the decrypted license buffer
//!
//! The field grammar is read strictly forward: a [`ByteCursor`] hands out
//! bytes, fixed-width runs and delimiter-terminated strings, and every short
//! read reports the field that was being read.

use crate::parser::ParseError;

pub mod nibble;

pub use nibble::NibbleQueue;

/// Terminates a field or a group of items
pub const FIELD_TERMINATOR: u8 = 0xe0;

/// Terminates one item inside a bounded group
pub const ITEM_TERMINATOR: u8 = 0xe1;

/// Which terminator ended a delimited string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `0xE0`
    Field,
    /// `0xE1`
    Item,
}

impl Delimiter {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            FIELD_TERMINATOR => Some(Delimiter::Field),
            ITEM_TERMINATOR => Some(Delimiter::Item),
            _ => None,
        }
    }
}

/// Forward-only cursor over a byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move to the byte after the first occurrence of `byte`, returning its offset
    pub fn seek_past(&mut self, byte: u8) -> Option<usize> {
        let found = self.data[self.position.min(self.data.len())..]
            .iter()
            .position(|b| *b == byte)
            .map(|i| self.position + i)?;
        self.position = found + 1;
        Some(found)
    }

    /// Read one byte
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, ParseError> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or_else(|| self.truncated(field))?;
        self.position += 1;
        Ok(byte)
    }

    /// Read exactly `n` bytes
    pub fn read_bytes(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], ParseError> {
        if self.remaining() < n {
            return Err(self.truncated(field));
        }
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }

    /// Skip `n` bytes without looking at them
    pub fn skip(&mut self, n: usize, field: &'static str) -> Result<(), ParseError> {
        self.read_bytes(n, field).map(|_| ())
    }

    /// Read bytes as Latin-1 characters up to the next `0xE0` or `0xE1`
    ///
    /// The terminator is consumed and returned alongside the string.
    pub fn read_delimited(
        &mut self,
        field: &'static str,
    ) -> Result<(String, Delimiter), ParseError> {
        let mut value = String::new();
        loop {
            let byte = self.read_u8(field)?;
            if let Some(delimiter) = Delimiter::from_byte(byte) {
                return Ok((value, delimiter));
            }
            value.push(char::from(byte));
        }
    }

    fn truncated(&self, field: &'static str) -> ParseError {
        ParseError::Truncated {
            field,
            offset: self.position,
        }
    }
}

/// Render a byte as a zero-padded two-digit decimal string
pub fn two_digit(value: u8) -> String {
    format!("{:02}", value)
}
