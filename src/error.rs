//! Unified error type for the public decoding API
//!
//! Each stage keeps its own error enum for precise handling; this type
//! gathers them so callers can use a single `Result` across stages.
//!
//! # Example
//!
//! ```no_run
//! use sadl::LicenseError;
//!
//! fn show(hex: &str) -> Result<(), LicenseError> {
//!     let license = sadl::decode_hex(hex)?;
//!     println!("{}", license.record);
//!     Ok(())
//! }
//! ```

use crate::batch::InputError;
use crate::decrypt::DecryptError;
use crate::parser::ParseError;
use crate::scan::ScanError;
use thiserror::Error;

/// Error categories:
///
/// - **Decrypt**: wrong payload length, unknown signature, block overflow
/// - **Parse**: missing start marker, buffer exhausted mid-field
/// - **Input**: malformed hex or base64 text
/// - **Scan**: the barcode reader collaborator failed
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("Decrypt error: {0}")]
    Decrypt(#[from] DecryptError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

impl LicenseError {
    /// Decoding is a pure function of static input, so only reader I/O can change on retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Scan(ScanError::Io(_)))
    }

    /// Wrong payload length or a block result wider than its block
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Decrypt(e) if e.is_format_error())
    }

    pub fn is_version_error(&self) -> bool {
        matches!(
            self,
            Self::Decrypt(DecryptError::UnsupportedVersion { .. })
        )
    }

    pub fn is_marker_error(&self) -> bool {
        matches!(self, Self::Parse(ParseError::MarkerNotFound))
    }

    /// The plaintext ran out while a field was still expected
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Self::Parse(ParseError::Truncated { .. } | ParseError::NibblesExhausted { .. })
        )
    }

    /// Returns a stable error code
    ///
    /// Codes follow the format `SADL_E_<CATEGORY>_<SPECIFIC>`.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Decrypt(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Input(e) => e.error_code(),
            Self::Scan(_) => "SADL_E_SCAN",
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Decrypt(DecryptError::InvalidLength { .. }) => {
                Some("A single license payload is exactly 720 bytes (1440 hex characters)")
            }
            Self::Decrypt(DecryptError::UnsupportedVersion { .. }) => {
                Some("Payloads must start with 01E10245 (v1) or 019B0945 (v2)")
            }
            Self::Parse(ParseError::MarkerNotFound) => {
                Some("The payload decrypted with the wrong key or is not a driving license")
            }
            Self::Input(InputError::InvalidHexLength { .. }) => {
                Some("Provide 1440 hex characters per license, at most two licenses")
            }
            _ => None,
        }
    }
}
