//! Sequential field parser for decrypted license buffers
//!
//! The plaintext is read once, front to back:
//!
//! ```text
//! ┌────────┬───────────────┬──────┬─────────┬────────┬────────────┬────────┬───────┐
//! │ ..0x82 │ string fields │ id   │ id type │ nibble │ 0x57       │ header │ image │
//! │ + 1 B  │ E0/E1 delim.  │ 13 B │ 1 B     │ run    │ terminator │ 6 B    │ ...   │
//! └────────┴───────────────┴──────┴─────────┴────────┴────────────┴────────┴───────┘
//! ```

use crate::binary::{two_digit, ByteCursor, Delimiter, NibbleQueue};
use crate::record::{Gender, ImageHeader, ImageRegion, LicenseRecord};
use thiserror::Error;
use tracing::debug;

/// Byte marking the start of the field section
pub const START_MARKER: u8 = 0x82;

/// Byte ending the nibble-packed section
pub const BINARY_TERMINATOR: u8 = 0x57;

/// Slots in the vehicle code and vehicle restriction groups
pub const GROUP_SLOTS: usize = 4;

/// Slots in the license code issue date list
pub const ISSUE_DATE_SLOTS: usize = 4;

pub const ID_NUMBER_LEN: usize = 13;

const IMAGE_HEADER_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Start marker 0x82 not found in plaintext")]
    MarkerNotFound,

    #[error("Buffer exhausted at offset {offset} while reading {field}")]
    Truncated { field: &'static str, offset: usize },

    #[error("Binary section exhausted while reading {field}: needed {needed} nibble(s), {available} left")]
    NibblesExhausted {
        field: &'static str,
        needed: usize,
        available: usize,
    },
}

impl ParseError {
    /// Name of the field being read when the buffer ran out
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ParseError::MarkerNotFound => None,
            ParseError::Truncated { field, .. } | ParseError::NibblesExhausted { field, .. } => {
                Some(*field)
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ParseError::MarkerNotFound => "SADL_E_PARSE_MARKER_NOT_FOUND",
            ParseError::Truncated { .. } => "SADL_E_PARSE_TRUNCATED",
            ParseError::NibblesExhausted { .. } => "SADL_E_PARSE_NIBBLES_EXHAUSTED",
        }
    }
}

/// Read a bounded group of item-terminated strings
///
/// Each terminator uses up one slot and a non-empty item ended by `0xE1`
/// uses up one more. Empty items are dropped.
fn read_group(
    cursor: &mut ByteCursor<'_>,
    slots: usize,
    field: &'static str,
) -> Result<Vec<String>, ParseError> {
    let mut items = Vec::new();
    let mut used = 0;
    while used < slots {
        let (value, delimiter) = cursor.read_delimited(field)?;
        if delimiter == Delimiter::Item && !value.is_empty() {
            used += 1;
        }
        used += 1;
        if !value.is_empty() {
            items.push(value);
        }
    }
    Ok(items)
}

/// Parse a decrypted plaintext buffer into a [`LicenseRecord`]
///
/// Pure over its input: the same buffer always yields the same record.
pub fn parse(plaintext: &[u8]) -> Result<LicenseRecord, ParseError> {
    let mut cursor = ByteCursor::new(plaintext);

    let marker = cursor
        .seek_past(START_MARKER)
        .ok_or(ParseError::MarkerNotFound)?;
    cursor.skip(1, "reserved byte after marker")?;
    debug!("Field section starts after marker at offset {}", marker);

    // Section 1: strings
    let vehicle_codes = read_group(&mut cursor, GROUP_SLOTS, "vehicle codes")?;
    let (surname, _) = cursor.read_delimited("surname")?;
    let (initials, delimiter) = cursor.read_delimited("initials")?;
    let prdp_code = match delimiter {
        Delimiter::Field => Some(cursor.read_delimited("PrDP code")?.0),
        Delimiter::Item => None,
    };
    let (id_country_of_issue, _) = cursor.read_delimited("ID country of issue")?;
    let (license_country_of_issue, _) = cursor.read_delimited("license country of issue")?;
    let vehicle_restrictions = read_group(&mut cursor, GROUP_SLOTS, "vehicle restrictions")?;
    let (license_number, _) = cursor.read_delimited("license number")?;
    let id_number: String = cursor
        .read_bytes(ID_NUMBER_LEN, "ID number")?
        .iter()
        .map(|b| char::from(*b))
        .collect();

    // Section 2: binary data
    let id_number_type = two_digit(cursor.read_u8("ID number type")?);
    let mut nibbles = NibbleQueue::read_until(&mut cursor, BINARY_TERMINATOR, "binary section")?;
    debug!("Binary section holds {} nibbles", nibbles.len());

    let license_code_issue_dates =
        nibbles.read_date_list(ISSUE_DATE_SLOTS, "license code issue dates")?;
    let driver_restriction_codes = nibbles.read_code("driver restriction codes")?;
    let prdp_permit_expiry_date = nibbles.read_date("PrDP permit expiry date")?;
    let license_issue_number = nibbles.read_code("license issue number")?;
    let birthdate = nibbles.read_date("birthdate")?;
    let license_issue_date = nibbles.read_date("license issue date")?;
    let license_expiry_date = nibbles.read_date("license expiry date")?;
    let gender = Gender::from_code(&nibbles.read_code("gender")?);

    // Section 3: image
    let mut raw = [0u8; IMAGE_HEADER_LEN];
    raw.copy_from_slice(cursor.read_bytes(IMAGE_HEADER_LEN, "image header")?);
    let image_header = ImageHeader::from_raw(raw);
    let image_region = ImageRegion {
        offset: cursor.position(),
        len: cursor.remaining(),
    };
    debug!(
        "Image {}x{} region at offset {} ({} bytes)",
        image_header.width, image_header.height, image_region.offset, image_region.len
    );

    Ok(LicenseRecord {
        vehicle_codes,
        surname,
        initials,
        prdp_code,
        id_country_of_issue,
        license_country_of_issue,
        vehicle_restrictions,
        license_number,
        id_number,
        id_number_type,
        license_code_issue_dates,
        driver_restriction_codes,
        prdp_permit_expiry_date,
        license_issue_number,
        birthdate,
        license_issue_date,
        license_expiry_date,
        gender,
        image_header,
        image_region,
    })
}
