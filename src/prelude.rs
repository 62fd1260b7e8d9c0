//! Commonly used types in one import
//!
//! ```rust
//! use sadl::prelude::*;
//!
//! # fn example(hex: &str) -> Result<(), LicenseError> {
//! let entries = decode_hex_batch(hex)?;
//! for entry in entries {
//!     match entry.result {
//!         Ok(license) => println!("{}", license.record.license_number),
//!         Err(e) => eprintln!("license {}: {}", entry.index, e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub use crate::batch::{
    decode_base64, decode_bytes, decode_hex, decode_hex_batch, BatchEntry, DecodedLicense,
};
pub use crate::decrypt::{decrypt, DecryptedPlaintext};
pub use crate::error::LicenseError;
pub use crate::keys::KeyVersion;
pub use crate::parser::parse;
pub use crate::record::{Gender, LicenseRecord};
pub use crate::scan::{decode_scanned, BarcodeReader};
