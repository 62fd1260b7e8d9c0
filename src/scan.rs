//! Seam for the upstream barcode reader
//!
//! Optical PDF417 decoding is done elsewhere. A [`BarcodeReader`] turns an
//! image (or any other source) into the raw barcode bytes, and
//! [`decode_scanned`] takes it from there.

use crate::batch::{decode_bytes, DecodedLicense};
use crate::error::LicenseError;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Barcode reader failed: {0}")]
    Reader(String),
}

/// Something that can pull the raw PDF417 payload out of a file
pub trait BarcodeReader {
    /// `Ok(None)` when the file holds no readable barcode
    fn read_barcode(&self, path: &Path) -> Result<Option<Vec<u8>>, ScanError>;
}

/// Reader for files that already contain the raw barcode bytes
///
/// Empty files count as "no barcode".
#[derive(Debug, Default, Clone, Copy)]
pub struct RawPayloadFile;

impl BarcodeReader for RawPayloadFile {
    fn read_barcode(&self, path: &Path) -> Result<Option<Vec<u8>>, ScanError> {
        let bytes = fs::read(path)?;
        Ok(if bytes.is_empty() { None } else { Some(bytes) })
    }
}

/// Read a barcode with `reader` and decode it
///
/// Returns `Ok(None)` when the reader finds nothing.
pub fn decode_scanned<R: BarcodeReader + ?Sized>(
    reader: &R,
    path: &Path,
) -> Result<Option<DecodedLicense>, LicenseError> {
    let Some(payload) = reader.read_barcode(path)? else {
        debug!("No barcode found in {}", path.display());
        return Ok(None);
    };
    decode_bytes(&payload).map(Some)
}
