//! Block modular exponentiation over the encrypted payload
//!
//! ```text
//! ┌──────────────┬───────────────────────────────┬───────────────┐
//! │ signature 6B │ 5 × 128-byte blocks (key 128) │ 74 B (key 74) │
//! └──────────────┴───────────────────────────────┴───────────────┘
//! ```
//!
//! Each block is read as a big-endian integer `c` and replaced by
//! `c^e mod n`, written back at the block's width. The payload was produced
//! with the private half of each key, so applying the public half recovers
//! the plaintext. This is verification-style RSA and is not constant-time.

use crate::keys::{BlockKey, KeyVersion};
use num_bigint::BigUint;
use std::ops::Deref;
use thiserror::Error;
use tracing::{debug, trace};

/// Signature plus reserved bytes at the start of every payload
pub const HEADER_LEN: usize = 6;

pub const LARGE_BLOCK_LEN: usize = 128;

pub const LARGE_BLOCK_COUNT: usize = 5;

pub const FINAL_BLOCK_LEN: usize = 74;

/// Length of the decrypted buffer: 5 × 128 + 74
pub const PLAINTEXT_LEN: usize = LARGE_BLOCK_COUNT * LARGE_BLOCK_LEN + FINAL_BLOCK_LEN;

/// Length of one encrypted license payload: 6 + 5 × 128 + 74
pub const PAYLOAD_LEN: usize = HEADER_LEN + PLAINTEXT_LEN;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecryptError {
    #[error("Invalid payload length: {actual} bytes (expected {expected})")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unsupported payload signature: {}", hex::encode_upper(.signature))]
    UnsupportedVersion { signature: [u8; 4] },

    #[error("Block {block} result needs {actual} bytes but the block is {width} bytes wide")]
    BlockOverflow {
        block: usize,
        width: usize,
        actual: usize,
    },
}

impl DecryptError {
    pub fn error_code(&self) -> &'static str {
        match self {
            DecryptError::InvalidLength { .. } => "SADL_E_FORMAT_LENGTH",
            DecryptError::UnsupportedVersion { .. } => "SADL_E_VERSION_UNSUPPORTED",
            DecryptError::BlockOverflow { .. } => "SADL_E_FORMAT_BLOCK_OVERFLOW",
        }
    }

    /// True for the wrong-length and overflow cases
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DecryptError::InvalidLength { .. } | DecryptError::BlockOverflow { .. }
        )
    }
}

/// A validated, single-license encrypted payload
#[derive(Debug, Clone, Copy)]
pub struct EncryptedPayload<'a> {
    bytes: &'a [u8],
    version: KeyVersion,
}

impl<'a> EncryptedPayload<'a> {
    /// Check the length and signature of a raw payload
    pub fn new(bytes: &'a [u8]) -> Result<Self, DecryptError> {
        if bytes.len() != PAYLOAD_LEN {
            return Err(DecryptError::InvalidLength {
                expected: PAYLOAD_LEN,
                actual: bytes.len(),
            });
        }
        let version = KeyVersion::from_signature(&bytes[..4]).ok_or_else(|| {
            let mut signature = [0u8; 4];
            signature.copy_from_slice(&bytes[..4]);
            DecryptError::UnsupportedVersion { signature }
        })?;
        Ok(Self { bytes, version })
    }

    pub fn version(&self) -> KeyVersion {
        self.version
    }

    /// The six leading bytes: 4-byte signature and 2 reserved bytes
    pub fn header(&self) -> &'a [u8] {
        &self.bytes[..HEADER_LEN]
    }

    /// Ciphertext blocks in order, paired with the key each one uses
    pub fn blocks(&self) -> impl Iterator<Item = (&'a [u8], &'static BlockKey)> + 'a {
        let keys = self.version.keys();
        let body = &self.bytes[HEADER_LEN..];
        let (large, last) = body.split_at(LARGE_BLOCK_COUNT * LARGE_BLOCK_LEN);
        large
            .chunks(LARGE_BLOCK_LEN)
            .map(move |block| (block, &keys.block_128))
            .chain(std::iter::once((last, &keys.block_74)))
    }
}

/// The 714-byte result of decrypting one payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedPlaintext {
    bytes: Vec<u8>,
}

impl DecryptedPlaintext {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Deref for DecryptedPlaintext {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for DecryptedPlaintext {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Compute `block^e mod n` and write it back left-padded to the key's width
fn apply_block_key(index: usize, block: &[u8], key: &BlockKey) -> Result<Vec<u8>, DecryptError> {
    let input = BigUint::from_bytes_be(block);
    let output = input.modpow(&key.exponent, &key.modulus).to_bytes_be();
    if output.len() > key.width {
        return Err(DecryptError::BlockOverflow {
            block: index,
            width: key.width,
            actual: output.len(),
        });
    }
    let mut padded = vec![0u8; key.width];
    padded[key.width - output.len()..].copy_from_slice(&output);
    trace!("Block {} ({} bytes) decrypted", index, key.width);
    Ok(padded)
}

impl EncryptedPayload<'_> {
    /// Apply each block's key and concatenate the results
    pub fn decrypt(&self) -> Result<DecryptedPlaintext, DecryptError> {
        let mut bytes = Vec::with_capacity(PLAINTEXT_LEN);
        for (index, (block, key)) in self.blocks().enumerate() {
            bytes.extend(apply_block_key(index, block, key)?);
        }
        debug!(
            "Decrypted {} payload into {} bytes",
            self.version,
            bytes.len()
        );
        Ok(DecryptedPlaintext { bytes })
    }
}

/// Decrypt one 720-byte license payload
pub fn decrypt(payload: &[u8]) -> Result<DecryptedPlaintext, DecryptError> {
    EncryptedPayload::new(payload)?.decrypt()
}
