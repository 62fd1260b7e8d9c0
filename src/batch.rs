//! Text input decoding and multi-license dispatch
//!
//! A barcode scanned as text arrives as hex (1440 characters per license)
//! or base64. Two licenses may be concatenated; each one is decrypted and
//! parsed on its own so that a bad half never hides a good one.

use crate::decrypt::{DecryptedPlaintext, EncryptedPayload, PAYLOAD_LEN};
use crate::error::LicenseError;
use crate::keys::KeyVersion;
use crate::parser;
use crate::record::LicenseRecord;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;
use tracing::{debug, warn};

/// Hex characters in one encrypted license
pub const HEX_LEN_PER_LICENSE: usize = PAYLOAD_LEN * 2;

/// Most licenses accepted in one concatenated input
pub const MAX_LICENSES_PER_BATCH: usize = 2;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Invalid hex length: {actual} characters (expected 1440 or 2880)")]
    InvalidHexLength { actual: usize },

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl InputError {
    pub fn error_code(&self) -> &'static str {
        match self {
            InputError::InvalidHex(_) => "SADL_E_INPUT_HEX",
            InputError::InvalidHexLength { .. } => "SADL_E_INPUT_HEX_LENGTH",
            InputError::Base64(_) => "SADL_E_INPUT_BASE64",
        }
    }
}

/// A decrypted and parsed license
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLicense {
    pub version: KeyVersion,
    pub plaintext: DecryptedPlaintext,
    pub record: LicenseRecord,
}

impl DecodedLicense {
    /// The opaque trailing bytes the record's image region points at
    pub fn image_bytes(&self) -> &[u8] {
        self.record
            .image_region
            .slice(&self.plaintext)
            .unwrap_or_default()
    }
}

/// Outcome for one license of a concatenated input
#[derive(Debug)]
pub struct BatchEntry {
    /// Position of the license in the input, from zero
    pub index: usize,
    pub result: Result<DecodedLicense, LicenseError>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Keep only hex digits, dropping whitespace and separators
pub fn clean_hex(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_hexdigit()).collect()
}

/// Decrypt and parse one raw 720-byte payload
pub fn decode_bytes(payload: &[u8]) -> Result<DecodedLicense, LicenseError> {
    let payload = EncryptedPayload::new(payload)?;
    let plaintext = payload.decrypt()?;
    let record = parser::parse(&plaintext)?;
    Ok(DecodedLicense {
        version: payload.version(),
        plaintext,
        record,
    })
}

/// Decode a single license given as 1440 hex characters
pub fn decode_hex(input: &str) -> Result<DecodedLicense, LicenseError> {
    let cleaned = clean_hex(input);
    if cleaned.len() != HEX_LEN_PER_LICENSE {
        return Err(InputError::InvalidHexLength {
            actual: cleaned.len(),
        }
        .into());
    }
    let payload = hex::decode(&cleaned).map_err(InputError::from)?;
    decode_bytes(&payload)
}

/// Decode a single license given as base64
pub fn decode_base64(input: &str) -> Result<DecodedLicense, LicenseError> {
    let payload = BASE64.decode(input.trim()).map_err(InputError::from)?;
    decode_bytes(&payload)
}

/// Decode one or two concatenated licenses given as hex
///
/// Fails as a whole only when the input length is not a whole number of
/// licenses; otherwise every license gets its own result.
pub fn decode_hex_batch(input: &str) -> Result<Vec<BatchEntry>, LicenseError> {
    let cleaned = clean_hex(input);
    let count = cleaned.len() / HEX_LEN_PER_LICENSE;
    if cleaned.len() % HEX_LEN_PER_LICENSE != 0 || count == 0 || count > MAX_LICENSES_PER_BATCH {
        return Err(InputError::InvalidHexLength {
            actual: cleaned.len(),
        }
        .into());
    }
    debug!("Decoding {} license(s) from hex input", count);

    let entries = (0..count)
        .map(|index| {
            let chunk = &cleaned[index * HEX_LEN_PER_LICENSE..(index + 1) * HEX_LEN_PER_LICENSE];
            let result = decode_hex(chunk);
            if let Err(e) = &result {
                warn!("License {} failed to decode: {}", index, e);
            }
            BatchEntry { index, result }
        })
        .collect();
    Ok(entries)
}
