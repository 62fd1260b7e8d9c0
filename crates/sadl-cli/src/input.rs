//! Reading payloads from files or stdin and working out their encoding

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Hex,
    Base64,
    Raw,
}

impl InputFormat {
    /// Guess the encoding of `data` given the raw length a decoded payload should have
    pub fn detect(data: &[u8], raw_len: usize) -> Self {
        if data.len() == raw_len && !data.is_ascii() {
            return Self::Raw;
        }
        match std::str::from_utf8(data) {
            Ok(text) => {
                let digits = strip_whitespace(text);
                if !digits.is_empty()
                    && digits.len() % 2 == 0
                    && digits.bytes().all(|b| b.is_ascii_hexdigit())
                {
                    Self::Hex
                } else {
                    Self::Base64
                }
            }
            Err(_) => Self::Raw,
        }
    }
}

fn strip_whitespace(text: &str) -> String {
    text.split_whitespace().collect()
}

/// Read the whole input, where `-` means stdin
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Turn input of the given format into bytes
pub fn to_bytes(data: Vec<u8>, format: InputFormat) -> Result<Vec<u8>> {
    match format {
        InputFormat::Raw => Ok(data),
        InputFormat::Hex => {
            let text = std::str::from_utf8(&data).context("Hex input is not valid UTF-8")?;
            Ok(hex::decode(strip_whitespace(text)).context("Invalid hex input")?)
        }
        InputFormat::Base64 => {
            let text = std::str::from_utf8(&data).context("Base64 input is not valid UTF-8")?;
            let compact = strip_whitespace(text);
            if compact.is_empty() {
                bail!("Input is empty");
            }
            Ok(STANDARD.decode(compact).context("Invalid base64 input")?)
        }
    }
}

/// Read text input for commands that only accept hex
pub fn read_text(path: &Path) -> Result<String> {
    let data = read_input(path)?;
    String::from_utf8(data).context("Input is not valid UTF-8")
}
