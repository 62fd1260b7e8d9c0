mod common;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::NaiveDate;
use common::*;
use sadl::{
    decode_base64, decode_bytes, decode_hex, decode_hex_batch, decrypt, parse, Gender, KeyVersion,
    ParseError,
};

#[test]
fn test_decode_sample_with_prdp() -> Result<(), Box<dyn std::error::Error>> {
    let license = decode_hex(SAMPLE_WITH_PRDP_HEX)?;
    let record = &license.record;

    assert_eq!(license.version, KeyVersion::V2);
    assert_eq!(license.plaintext.len(), 714);
    assert_eq!(&license.plaintext[..5], b"\x01\x02\x03\x04\x05");

    assert_eq!(record.vehicle_codes, vec!["EC"]);
    assert_eq!(record.surname, "KATUMBA");
    assert_eq!(record.initials, "W");
    assert_eq!(record.prdp_code.as_deref(), Some("G,P"));
    assert_eq!(record.id_country_of_issue, "ZA");
    assert_eq!(record.license_country_of_issue, "ZA");
    assert_eq!(record.vehicle_restrictions, vec!["0"]);
    assert_eq!(record.license_number, "402800062D3M");
    assert_eq!(record.id_number.chars().count(), 13);
    assert_eq!(record.id_number_type, "01");
    assert_eq!(record.license_code_issue_dates, vec!["2020/10/06"]);
    assert_eq!(record.driver_restriction_codes, "00");
    assert_eq!(record.prdp_permit_expiry_date, "2027/02/09");
    assert_eq!(record.license_issue_number, "01");
    assert_eq!(record.birthdate, "1980/11/01");
    assert_eq!(record.license_issue_date, "2025/02/11");
    assert_eq!(record.license_expiry_date, "2030/02/10");
    assert_eq!(record.gender, Gender::Male);

    assert_eq!(record.image_width(), 250);
    assert_eq!(record.image_height(), 200);
    assert_eq!(record.image_header.wide_dimensions(), (250, 200));
    let sizes = record.expected_image_sizes();
    assert_eq!((sizes.grayscale, sizes.rgb), (50_000, 150_000));
    assert_eq!(record.image_region.offset, 103);
    assert_eq!(record.image_region.len, 611);
    assert_eq!(license.image_bytes().len(), 611);
    assert_eq!(record.image_region.jpeg_span(&license.plaintext), None);

    Ok(())
}

#[test]
fn test_decode_sample_without_prdp() -> Result<(), Box<dyn std::error::Error>> {
    let license = decode_hex(SAMPLE_WITHOUT_PRDP_HEX)?;
    let record = &license.record;

    assert_eq!(record.vehicle_codes, vec!["B"]);
    assert_eq!(record.initials, "C");
    assert_eq!(record.prdp_code, None);
    assert_eq!(record.id_country_of_issue, "ZA");
    assert_eq!(record.license_country_of_issue, "ZA");
    assert_eq!(record.vehicle_restrictions, vec!["0"]);
    assert_eq!(record.license_number, "412200075WGW");
    assert_eq!(record.license_code_issue_dates, vec!["2015/06/10"]);
    assert_eq!(record.prdp_permit_expiry_date, "");
    assert_eq!(record.birthdate, "1991/07/07");
    assert_eq!(record.license_issue_date, "2020/08/05");
    assert_eq!(record.license_expiry_date, "2025/08/04");
    assert_eq!(record.gender, Gender::Male);
    assert_eq!(record.image_region.offset, 97);
    assert_eq!(record.image_region.len, 617);

    Ok(())
}

#[test]
fn test_image_region_stays_in_bounds() -> Result<(), Box<dyn std::error::Error>> {
    for payload in [sample_with_prdp(), sample_without_prdp()] {
        let license = decode_bytes(&payload)?;
        let region = license.record.image_region;
        assert!(region.offset + region.len <= 714);
        assert!(matches!(license.record.gender, Gender::Male | Gender::Female));
    }
    Ok(())
}

#[test]
fn test_decrypt_and_parse_are_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let payload = sample_with_prdp();
    let first = decrypt(&payload)?;
    let second = decrypt(&payload)?;
    assert_eq!(first, second);

    // Parsing the same buffer twice yields the same record
    assert_eq!(parse(&first)?, parse(&first)?);
    assert_eq!(decode_bytes(&payload)?, decode_bytes(&payload)?);
    Ok(())
}

#[test]
fn test_input_forms_agree() -> Result<(), Box<dyn std::error::Error>> {
    let payload = sample_with_prdp();
    let from_hex = decode_hex(SAMPLE_WITH_PRDP_HEX)?;
    let from_lower_spaced = decode_hex(
        &SAMPLE_WITH_PRDP_HEX
            .to_lowercase()
            .as_bytes()
            .chunks(32)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect::<Vec<_>>()
            .join(" "),
    )?;
    let from_base64 = decode_base64(&BASE64.encode(&payload))?;

    assert_eq!(from_hex, from_lower_spaced);
    assert_eq!(from_hex, from_base64);
    Ok(())
}

#[test]
fn test_unknown_signature() {
    let corrupted = with_signature(SAMPLE_WITH_PRDP_HEX, "019B0946");
    let err = decode_hex(&corrupted).unwrap_err();
    assert!(err.is_version_error());
}

#[test]
fn test_signature_selects_keys() {
    // Relabelling v2 ciphertext as v1 applies the other key pair
    let swapped = with_signature(SAMPLE_WITH_PRDP_HEX, "01E10245");
    let payload = hex::decode(swapped).unwrap();
    let plaintext = decrypt(&payload).unwrap();
    assert_eq!(plaintext.len(), 714);
    assert_ne!(plaintext, decrypt(&sample_with_prdp()).unwrap());
}

#[test]
fn test_plaintext_without_marker() {
    let plaintext = decrypt(&sample_with_prdp()).unwrap();
    let scrubbed: Vec<u8> = plaintext
        .iter()
        .map(|b| if *b == 0x82 { 0x00 } else { *b })
        .collect();
    assert_eq!(parse(&scrubbed), Err(ParseError::MarkerNotFound));
}

#[test]
fn test_batch_of_two() -> Result<(), Box<dyn std::error::Error>> {
    let input = format!("{}{}", SAMPLE_WITH_PRDP_HEX, SAMPLE_WITHOUT_PRDP_HEX);
    let entries = decode_hex_batch(&input)?;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.is_ok()));

    let first = entries[0].result.as_ref().unwrap();
    let second = entries[1].result.as_ref().unwrap();
    assert_eq!(first.record.license_number, "402800062D3M");
    assert_eq!(second.record.license_number, "412200075WGW");
    Ok(())
}

#[test]
fn test_batch_isolates_corrupted_half() -> Result<(), Box<dyn std::error::Error>> {
    let corrupted = with_signature(SAMPLE_WITHOUT_PRDP_HEX, "FFFFFFFF");
    let input = format!("{}{}", SAMPLE_WITH_PRDP_HEX, corrupted);
    let entries = decode_hex_batch(&input)?;

    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_ok());
    match &entries[1].result {
        Err(e) => assert!(e.is_version_error()),
        Ok(_) => panic!("corrupted half decoded"),
    }

    // Same isolation with the corruption in the first half
    let input = format!("{}{}", corrupted, SAMPLE_WITH_PRDP_HEX);
    let entries = decode_hex_batch(&input)?;
    assert!(!entries[0].is_ok());
    assert!(entries[1].is_ok());
    Ok(())
}

#[test]
fn test_single_license_batch() -> Result<(), Box<dyn std::error::Error>> {
    let entries = decode_hex_batch(SAMPLE_WITHOUT_PRDP_HEX)?;
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_ok());
    Ok(())
}

#[test]
fn test_record_serialization() -> Result<(), Box<dyn std::error::Error>> {
    let license = decode_hex(SAMPLE_WITH_PRDP_HEX)?;
    let json = serde_json::to_value(&license.record)?;

    assert_eq!(json["licenseNumber"], "402800062D3M");
    assert_eq!(json["prdpCode"], "G,P");
    assert_eq!(json["gender"], "male");
    assert_eq!(json["imageRegion"]["offset"], 103);

    let back: sadl::LicenseRecord = serde_json::from_value(json)?;
    assert_eq!(back, license.record);
    Ok(())
}

#[test]
fn test_record_dates_and_display() -> Result<(), Box<dyn std::error::Error>> {
    let record = decode_hex(SAMPLE_WITH_PRDP_HEX)?.record;

    assert_eq!(record.birth_date(), NaiveDate::from_ymd_opt(1980, 11, 1));
    assert_eq!(
        record.is_valid_on(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        Some(true)
    );
    assert_eq!(
        record.is_valid_on(NaiveDate::from_ymd_opt(2031, 1, 1).unwrap()),
        Some(false)
    );

    let text = record.to_string();
    assert!(text.contains("License Number: 402800062D3M"));
    assert!(text.contains("PrDP Code: G,P"));
    assert!(text.ends_with("Image height: 200"));
    Ok(())
}
