//! Nibble queue for the packed binary section
//!
//! The binary section is a run of bytes split into high/low 4-bit nibbles.
//! Fields carry no boundaries of their own, so the queue is drained in a
//! fixed order; an explicit read index makes exhaustion a checkable error.

use super::ByteCursor;
use crate::parser::ParseError;

/// Leading nibble value marking an absent date
pub const ABSENT_DATE: u8 = 10;

/// Number of nibbles in a present date, leading nibble included
pub const DATE_NIBBLES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NibbleQueue {
    nibbles: Vec<u8>,
    next: usize,
}

impl NibbleQueue {
    pub fn from_nibbles(nibbles: Vec<u8>) -> Self {
        Self { nibbles, next: 0 }
    }

    /// Split bytes into nibbles until `terminator` is read
    ///
    /// The terminator is consumed but contributes no nibbles.
    pub fn read_until(
        cursor: &mut ByteCursor<'_>,
        terminator: u8,
        field: &'static str,
    ) -> Result<Self, ParseError> {
        let mut nibbles = Vec::new();
        loop {
            let byte = cursor.read_u8(field)?;
            if byte == terminator {
                break;
            }
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0f);
        }
        Ok(Self::from_nibbles(nibbles))
    }

    pub fn len(&self) -> usize {
        self.nibbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nibbles.is_empty()
    }

    /// Nibbles not yet consumed
    pub fn remaining(&self) -> usize {
        self.nibbles.len() - self.next
    }

    fn ensure(&self, needed: usize, field: &'static str) -> Result<(), ParseError> {
        if self.remaining() < needed {
            return Err(ParseError::NibblesExhausted {
                field,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn pop(&mut self, field: &'static str) -> Result<u8, ParseError> {
        self.ensure(1, field)?;
        let nibble = self.nibbles[self.next];
        self.next += 1;
        Ok(nibble)
    }

    /// Two nibbles printed as decimal digits, e.g. `0,1` -> `"01"`
    pub fn read_code(&mut self, field: &'static str) -> Result<String, ParseError> {
        self.ensure(2, field)?;
        let high = self.pop(field)?;
        let low = self.pop(field)?;
        Ok(format!("{}{}", high, low))
    }

    /// Read a packed date as `YYYY/MM/DD`, or an empty string when absent
    ///
    /// An absent date is a single nibble of value 10. A present date is the
    /// leading nibble followed by seven more, printed digit by digit.
    pub fn read_date(&mut self, field: &'static str) -> Result<String, ParseError> {
        let first = self.pop(field)?;
        if first == ABSENT_DATE {
            return Ok(String::new());
        }
        self.ensure(DATE_NIBBLES - 1, field)?;
        let mut digits = [first; DATE_NIBBLES];
        for digit in digits.iter_mut().skip(1) {
            *digit = self.pop(field)?;
        }
        let [y1, y2, y3, y4, m1, m2, d1, d2] = digits;
        Ok(format!(
            "{}{}{}{}/{}{}/{}{}",
            y1, y2, y3, y4, m1, m2, d1, d2
        ))
    }

    /// Read `count` dates, keeping only the present ones
    pub fn read_date_list(
        &mut self,
        count: usize,
        field: &'static str,
    ) -> Result<Vec<String>, ParseError> {
        let mut dates = Vec::with_capacity(count);
        for _ in 0..count {
            let date = self.read_date(field)?;
            if !date.is_empty() {
                dates.push(date);
            }
        }
        Ok(dates)
    }
}
