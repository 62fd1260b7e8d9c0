//! Version signatures and the bundled public-key table
//!
//! Each license payload starts with a 4-byte signature naming the key
//! version used to produce it. Every version carries two RSA public keys:
//! one for the five 128-byte blocks and one for the trailing 74-byte block.
//! The key material below is the literal PKCS#1 content shipped with the
//! license format and must stay bit-exact.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Signature of payloads produced with the first key generation
pub const SIGNATURE_V1: [u8; 4] = [0x01, 0xe1, 0x02, 0x45];

/// Signature of payloads produced with the second key generation
pub const SIGNATURE_V2: [u8; 4] = [0x01, 0x9b, 0x09, 0x45];

/// Key generation selected by the payload signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyVersion {
    V1,
    V2,
}

impl KeyVersion {
    /// Match the first four bytes of a payload against the known signatures
    pub fn from_signature(signature: &[u8]) -> Option<Self> {
        match signature.get(..4)? {
            s if s == SIGNATURE_V1 => Some(KeyVersion::V1),
            s if s == SIGNATURE_V2 => Some(KeyVersion::V2),
            _ => None,
        }
    }

    pub fn signature(self) -> [u8; 4] {
        match self {
            KeyVersion::V1 => SIGNATURE_V1,
            KeyVersion::V2 => SIGNATURE_V2,
        }
    }

    /// Keys bundled for this version
    pub fn keys(self) -> &'static KeySet {
        &KEY_TABLE[&self]
    }
}

impl fmt::Display for KeyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyVersion::V1 => write!(f, "v1"),
            KeyVersion::V2 => write!(f, "v2"),
        }
    }
}

/// RSA public key bound to the width of the block it is applied to
#[derive(Debug, Clone)]
pub struct BlockKey {
    pub modulus: BigUint,
    pub exponent: BigUint,
    /// Width in bytes of both the ciphertext block and its output
    pub width: usize,
}

impl BlockKey {
    fn from_be_bytes(modulus: &[u8], exponent: &[u8]) -> Self {
        Self {
            modulus: BigUint::from_bytes_be(modulus),
            exponent: BigUint::from_bytes_be(exponent),
            width: modulus.len(),
        }
    }
}

/// The pair of keys used for one payload
#[derive(Debug, Clone)]
pub struct KeySet {
    /// Applied to each of the five 128-byte blocks
    pub block_128: BlockKey,
    /// Applied to the final 74-byte block
    pub block_74: BlockKey,
}

lazy_static! {
    static ref KEY_TABLE: HashMap<KeyVersion, KeySet> = {
        let mut table = HashMap::new();
        table.insert(
            KeyVersion::V1,
            KeySet {
                block_128: BlockKey::from_be_bytes(&V1_128_MODULUS, &V1_128_EXPONENT),
                block_74: BlockKey::from_be_bytes(&V1_74_MODULUS, &V1_74_EXPONENT),
            },
        );
        table.insert(
            KeyVersion::V2,
            KeySet {
                block_128: BlockKey::from_be_bytes(&V2_128_MODULUS, &V2_128_EXPONENT),
                block_74: BlockKey::from_be_bytes(&V2_74_MODULUS, &V2_74_EXPONENT),
            },
        );
        table
    };
}

const V1_128_MODULUS: [u8; 128] = [
    0xfe, 0xd2, 0xe1, 0xc2, 0x7e, 0x33, 0x63, 0x31, 0x6e, 0x77, 0x31, 0x7a,
    0x7a, 0x52, 0xc5, 0x49, 0x81, 0x39, 0x51, 0x86, 0xbe, 0x49, 0x74, 0x76,
    0x0c, 0x72, 0x51, 0x8d, 0x63, 0xe0, 0x54, 0x4a, 0x48, 0xd0, 0x88, 0xb3,
    0x32, 0xc5, 0xb0, 0xc3, 0x70, 0xc7, 0x65, 0xd6, 0x5d, 0x98, 0x3c, 0x1f,
    0x9d, 0xe0, 0xa4, 0x2b, 0x31, 0x0c, 0xcc, 0x07, 0xae, 0x77, 0x0b, 0xd2,
    0xb6, 0x1d, 0x6a, 0x4d, 0xcc, 0xea, 0xc7, 0x57, 0x68, 0x9b, 0xdc, 0xbf,
    0x60, 0x84, 0x78, 0xfa, 0xf3, 0x12, 0xf6, 0x08, 0x7c, 0xc4, 0x96, 0xc3,
    0x76, 0x2c, 0xf5, 0xc4, 0x65, 0x1c, 0xae, 0xcd, 0xa3, 0x49, 0x9f, 0xae,
    0x7e, 0xdb, 0x7e, 0xb4, 0x0e, 0x3e, 0x18, 0xeb, 0x30, 0x41, 0x70, 0xe9,
    0x1e, 0xd5, 0xb1, 0x56, 0xaa, 0xce, 0x6f, 0x43, 0x2d, 0x6e, 0xca, 0x6c,
    0xc3, 0x58, 0x51, 0xde, 0x8c, 0x67, 0x8f, 0x67,
];

const V1_128_EXPONENT: [u8; 16] = [
    0xbb, 0x79, 0x7f, 0xfd, 0xec, 0x7f, 0x9e, 0x42, 0xc9, 0xd6, 0xf7, 0x9b,
    0x13, 0x70, 0x59, 0xdb,
];

const V1_74_MODULUS: [u8; 74] = [
    0xff, 0x3c, 0xec, 0x6b, 0x5f, 0x40, 0xe3, 0xc3, 0x66, 0x14, 0x51, 0xb9,
    0xfc, 0xfa, 0xef, 0x3a, 0xeb, 0x06, 0xdc, 0x23, 0x29, 0xc0, 0xe6, 0xf4,
    0xdc, 0xcc, 0x92, 0x79, 0x72, 0x67, 0x16, 0xce, 0x15, 0xbb, 0xe0, 0x5e,
    0xed, 0x2c, 0x57, 0x11, 0xbc, 0xf8, 0xf5, 0xb6, 0xc8, 0xf7, 0x27, 0x6d,
    0xb5, 0xc4, 0x3b, 0xfa, 0xa3, 0x04, 0x0d, 0xc0, 0x1a, 0xb1, 0x4b, 0x9c,
    0x4d, 0x16, 0xf7, 0x1c, 0x0c, 0xe5, 0xea, 0x95, 0x3f, 0x0c, 0x75, 0x4c,
    0x6b, 0x17,
];

const V1_74_EXPONENT: [u8; 16] = [
    0xdb, 0x05, 0xba, 0x82, 0x2d, 0x9a, 0xcc, 0x33, 0xfa, 0xb7, 0xd8, 0xf4,
    0x27, 0xf9, 0xce, 0x65,
];

const V2_128_MODULUS: [u8; 128] = [
    0xca, 0x9f, 0x18, 0xef, 0x6c, 0x3f, 0x3f, 0xa4, 0xc5, 0xa4, 0x61, 0xfe,
    0xa5, 0x4a, 0xb1, 0x94, 0x06, 0xba, 0x5e, 0xcd, 0x74, 0x6d, 0x60, 0xa2,
    0x74, 0x92, 0xdc, 0xa3, 0xd7, 0x4e, 0x3b, 0x5c, 0x1d, 0x31, 0x5f, 0x7b,
    0x10, 0x38, 0x32, 0x41, 0x80, 0x9b, 0x02, 0x9e, 0xbb, 0xd5, 0xde, 0x4d,
    0x11, 0x60, 0x30, 0xcc, 0x57, 0xf7, 0xd5, 0xa6, 0xc9, 0xa1, 0x6f, 0x37,
    0x3b, 0xb1, 0x4a, 0x50, 0x85, 0x23, 0xf7, 0xe8, 0x0a, 0x4c, 0x74, 0x4d,
    0x90, 0x85, 0x66, 0x3a, 0x4a, 0x14, 0x72, 0xd7, 0xaf, 0x2c, 0x56, 0xae,
    0x41, 0xb5, 0x06, 0x5f, 0x7e, 0xfa, 0x02, 0x93, 0xbd, 0x32, 0x78, 0xad,
    0x69, 0x35, 0x46, 0xf9, 0xf1, 0x62, 0x19, 0xb7, 0x9f, 0xf4, 0x71, 0xa3,
    0x63, 0x68, 0x24, 0xcf, 0xfc, 0xdb, 0x63, 0xa8, 0xed, 0x80, 0x59, 0xe6,
    0xb9, 0xa4, 0xf0, 0xdb, 0x89, 0x53, 0x81, 0xcb,
];

const V2_128_EXPONENT: [u8; 16] = [
    0x18, 0x70, 0x92, 0xda, 0x64, 0x54, 0xce, 0xb1, 0x85, 0x3e, 0x69, 0x15,
    0xf8, 0x46, 0x6a, 0x05,
];

const V2_74_MODULUS: [u8; 74] = [
    0xb4, 0x04, 0xa0, 0xdf, 0x11, 0xd1, 0xca, 0xcf, 0xf1, 0xa1, 0xa0, 0x48,
    0xd4, 0xd5, 0x73, 0xf9, 0x53, 0xa6, 0x2c, 0x58, 0x3d, 0x74, 0x92, 0x59,
    0x27, 0x56, 0x1a, 0x6d, 0x7a, 0x1e, 0x2b, 0x14, 0x04, 0x25, 0x26, 0xaf,
    0x70, 0xb5, 0x50, 0x54, 0x73, 0x90, 0xea, 0x6e, 0xc7, 0x48, 0xd3, 0x0f,
    0xdb, 0x81, 0xad, 0xb4, 0x90, 0xe0, 0xc3, 0x6a, 0x19, 0x86, 0xb4, 0x04,
    0xb2, 0xf5, 0xf6, 0x9e, 0xf5, 0xda, 0x1b, 0x66, 0x3e, 0x59, 0x50, 0x91,
    0x30, 0xe7,
];

const V2_74_EXPONENT: [u8; 16] = [
    0x30, 0x9c, 0xfe, 0xd9, 0x71, 0x9f, 0xe2, 0xa5, 0xe2, 0x0c, 0x9b, 0xb4,
    0x47, 0x65, 0x38, 0x2b,
];
