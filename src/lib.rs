//! Decoder for the PDF417 payload printed on South African driving licenses
//!
//! Two stages run back to back over byte buffers:
//!
//! 1. [`decrypt`] applies the bundled RSA public keys block by block to a
//!    720-byte payload, producing a 714-byte plaintext.
//! 2. [`parse`] walks the plaintext with a fixed grammar and returns a
//!    [`LicenseRecord`] plus the location of the opaque image bytes.
//!
//! ```no_run
//! # fn example(hex: &str) -> Result<(), sadl::LicenseError> {
//! let license = sadl::decode_hex(hex)?;
//! println!("{}", license.record);
//! println!("image region: {} bytes", license.image_bytes().len());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod binary;
pub mod decrypt;
pub mod error;
pub mod keys;
pub mod parser;
pub mod prelude;
pub mod record;
pub mod scan;

pub use batch::{
    decode_base64, decode_bytes, decode_hex, decode_hex_batch, BatchEntry, DecodedLicense,
    InputError,
};
pub use decrypt::{decrypt, DecryptError, DecryptedPlaintext, EncryptedPayload};
pub use error::LicenseError;
pub use keys::KeyVersion;
pub use parser::{parse, ParseError};
pub use record::{ExpectedImageSizes, Gender, ImageHeader, ImageRegion, LicenseRecord};
pub use scan::{decode_scanned, BarcodeReader, RawPayloadFile, ScanError};
