//! Structured license record produced by the field parser

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Gender as encoded by a two-digit nibble code
///
/// Only `"01"` is known to mean male. Every other code maps to female; this
/// mirrors the behaviour of existing decoders and may be incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn from_code(code: &str) -> Self {
        if code == "01" {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// The six bytes preceding the image region
///
/// Width and height are decoded from single bytes (`raw[3]`, `raw[5]`), which
/// caps them at 255. The on-wire encoding is unconfirmed, so the raw bytes are
/// kept for callers that need a different interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHeader {
    pub raw: [u8; 6],
    pub width: u8,
    pub height: u8,
}

impl ImageHeader {
    pub fn from_raw(raw: [u8; 6]) -> Self {
        Self {
            raw,
            width: raw[3],
            height: raw[5],
        }
    }

    /// Width and height read as big-endian u16 values from `raw[2..4]` and `raw[4..6]`
    ///
    /// Provisional: matches the single-byte values whenever the high bytes are zero.
    pub fn wide_dimensions(&self) -> (u16, u16) {
        (
            u16::from_be_bytes([self.raw[2], self.raw[3]]),
            u16::from_be_bytes([self.raw[4], self.raw[5]]),
        )
    }
}

/// Offset and length of the opaque trailing region of a plaintext buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRegion {
    pub offset: usize,
    pub len: usize,
}

impl ImageRegion {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the region out of the buffer it was parsed from
    pub fn slice<'a>(&self, plaintext: &'a [u8]) -> Option<&'a [u8]> {
        plaintext.get(self.range())
    }

    /// Locate a JPEG stream (`FF D8 FF` .. `FF D9`) inside the region
    ///
    /// Returns absolute offsets into `plaintext`. None of the known payloads
    /// carry one; raw bytes are the norm.
    pub fn jpeg_span(&self, plaintext: &[u8]) -> Option<Range<usize>> {
        let region = self.slice(plaintext)?;
        let start = region
            .windows(3)
            .position(|w| w == [0xffu8, 0xd8, 0xff])?;
        let end = region[start + 2..]
            .windows(2)
            .position(|w| w == [0xffu8, 0xd9])
            .map(|i| start + 2 + i + 2)?;
        Some(self.offset + start..self.offset + end)
    }
}

/// Byte counts an uncompressed image of the header's dimensions would need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpectedImageSizes {
    pub grayscale: usize,
    pub rgb: usize,
}

impl ExpectedImageSizes {
    pub fn for_header(header: &ImageHeader) -> Self {
        let pixels = usize::from(header.width) * usize::from(header.height);
        Self {
            grayscale: pixels,
            rgb: pixels * 3,
        }
    }
}

/// Parse a `YYYY/MM/DD` date string; empty or malformed strings yield `None`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y/%m/%d").ok()
}

/// Fields of a decrypted license in the order they are encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    pub vehicle_codes: Vec<String>,
    pub surname: String,
    pub initials: String,
    /// Professional driving permit categories, present only when flagged
    pub prdp_code: Option<String>,
    pub id_country_of_issue: String,
    pub license_country_of_issue: String,
    pub vehicle_restrictions: Vec<String>,
    pub license_number: String,
    pub id_number: String,
    pub id_number_type: String,
    pub license_code_issue_dates: Vec<String>,
    pub driver_restriction_codes: String,
    pub prdp_permit_expiry_date: String,
    pub license_issue_number: String,
    pub birthdate: String,
    pub license_issue_date: String,
    pub license_expiry_date: String,
    pub gender: Gender,
    pub image_header: ImageHeader,
    pub image_region: ImageRegion,
}

impl LicenseRecord {
    pub fn image_width(&self) -> u8 {
        self.image_header.width
    }

    pub fn image_height(&self) -> u8 {
        self.image_header.height
    }

    pub fn expected_image_sizes(&self) -> ExpectedImageSizes {
        ExpectedImageSizes::for_header(&self.image_header)
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        parse_date(&self.birthdate)
    }

    pub fn license_valid_from(&self) -> Option<NaiveDate> {
        parse_date(&self.license_issue_date)
    }

    pub fn license_valid_to(&self) -> Option<NaiveDate> {
        parse_date(&self.license_expiry_date)
    }

    /// Whether `date` falls inside the validity window, `None` if either bound is unreadable
    pub fn is_valid_on(&self, date: NaiveDate) -> Option<bool> {
        let from = self.license_valid_from()?;
        let to = self.license_valid_to()?;
        Some(from <= date && date <= to)
    }
}

impl fmt::Display for LicenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vehicle codes: {}", self.vehicle_codes.join(", "))?;
        writeln!(f, "Surname: {}", self.surname)?;
        writeln!(f, "Initials: {}", self.initials)?;
        writeln!(f, "PrDP Code: {}", self.prdp_code.as_deref().unwrap_or(""))?;
        writeln!(f, "ID Country of Issue: {}", self.id_country_of_issue)?;
        writeln!(f, "License Country of Issue: {}", self.license_country_of_issue)?;
        writeln!(
            f,
            "Vehicle Restrictions: {}",
            self.vehicle_restrictions.join(", ")
        )?;
        writeln!(f, "License Number: {}", self.license_number)?;
        writeln!(f, "ID Number: {}", self.id_number)?;
        writeln!(f, "ID number type: {}", self.id_number_type)?;
        writeln!(
            f,
            "License code issue dates: {}",
            self.license_code_issue_dates.join(", ")
        )?;
        writeln!(f, "Driver restriction codes: {}", self.driver_restriction_codes)?;
        writeln!(f, "PrDP permit expiry date: {}", self.prdp_permit_expiry_date)?;
        writeln!(f, "License issue number: {}", self.license_issue_number)?;
        writeln!(f, "Birthdate: {}", self.birthdate)?;
        writeln!(f, "License Valid From: {}", self.license_issue_date)?;
        writeln!(f, "License Valid To: {}", self.license_expiry_date)?;
        writeln!(f, "Gender: {}", self.gender)?;
        writeln!(f, "Image width: {}", self.image_width())?;
        write!(f, "Image height: {}", self.image_height())
    }
}
