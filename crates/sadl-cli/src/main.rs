//! `sadl`: decode South African driving license barcode payloads
//!
//! ```text
//! sadl decode payload.hex
//! sadl decode --format base64 --json -
//! sadl decode --plaintext --image-out photo.bin plaintext.bin
//! sadl batch two-licenses.hex
//! sadl inspect payload.bin
//! ```
//!
//! Logs go to stderr, filtered by `RUST_LOG` or `SADL_LOG`. The default
//! output style comes from `SADL_OUTPUT` (`text` or `json`).

mod config;
mod input;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sadl::decrypt::{EncryptedPayload, PAYLOAD_LEN, PLAINTEXT_LEN};
use sadl::parser::START_MARKER;
use sadl::{ExpectedImageSizes, KeyVersion, LicenseError, LicenseRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{Config, OutputFormat};
use input::InputFormat;

/// Plaintext bytes shown by `inspect`
const INSPECT_PREVIEW_LEN: usize = 100;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "sadl")]
#[command(about = "Decode South African driving license PDF417 payloads")]
#[command(version)]
struct Cli {
    /// Output style, overriding SADL_OUTPUT
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt and parse a single license
    Decode {
        /// Payload file, or - for stdin
        input: PathBuf,
        /// Input encoding; detected when omitted
        #[arg(long, value_enum)]
        format: Option<InputFormat>,
        /// Input is already-decrypted plaintext
        #[arg(long)]
        plaintext: bool,
        /// Shorthand for --output json
        #[arg(long)]
        json: bool,
        /// Write the image region bytes to this file
        #[arg(long)]
        image_out: Option<PathBuf>,
    },
    /// Decode one or two concatenated hex licenses
    Batch {
        /// Hex file, or - for stdin
        input: PathBuf,
    },
    /// Show the version, header and start of the plaintext
    Inspect {
        /// Payload file, or - for stdin
        input: PathBuf,
        /// Input encoding; detected when omitted
        #[arg(long, value_enum)]
        format: Option<InputFormat>,
    },
}

// ============================================================================
// Output
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LicenseOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<KeyVersion>,
    #[serde(flatten)]
    record: &'a LicenseRecord,
    image_bytes: usize,
    expected_image_sizes: ExpectedImageSizes,
}

impl<'a> LicenseOutput<'a> {
    fn new(version: Option<KeyVersion>, record: &'a LicenseRecord, image_bytes: usize) -> Self {
        Self {
            version,
            record,
            image_bytes,
            expected_image_sizes: record.expected_image_sizes(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchOutput<'a> {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<LicenseOutput<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectOutput {
    version: KeyVersion,
    header: String,
    plaintext_preview: String,
    marker_offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_image_sizes: Option<ExpectedImageSizes>,
}

fn expected_size_line(width: u8, height: u8, sizes: &ExpectedImageSizes) -> String {
    format!(
        "Expected size for {}x{}: {} bytes grayscale, {} bytes RGB",
        width, height, sizes.grayscale, sizes.rgb
    )
}

fn print_license(output: OutputFormat, license: &LicenseOutput<'_>) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(license)?),
        OutputFormat::Text => {
            if let Some(version) = license.version {
                println!("Key version: {}", version);
            }
            println!("{}", license.record);
            println!("Image bytes: {}", license.image_bytes);
            println!(
                "{}",
                expected_size_line(
                    license.record.image_width(),
                    license.record.image_height(),
                    &license.expected_image_sizes,
                )
            );
        }
    }
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn load(path: &Path, format: Option<InputFormat>, raw_len: usize) -> Result<Vec<u8>> {
    let data = input::read_input(path)?;
    let format = format.unwrap_or_else(|| InputFormat::detect(&data, raw_len));
    debug!("Reading {} as {:?}", path.display(), format);
    input::to_bytes(data, format)
}

fn write_image(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write image to {}", path.display()))?;
    info!("Wrote {} image bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn cmd_decode(
    output: OutputFormat,
    path: &Path,
    format: Option<InputFormat>,
    plaintext: bool,
    image_out: Option<&Path>,
) -> Result<()> {
    if plaintext {
        let bytes = load(path, format, PLAINTEXT_LEN)?;
        let record = sadl::parse(&bytes).map_err(LicenseError::from)?;
        let image = record.image_region.slice(&bytes).unwrap_or_default();
        if let Some(out) = image_out {
            write_image(out, image)?;
        }
        return print_license(output, &LicenseOutput::new(None, &record, image.len()));
    }

    let bytes = load(path, format, PAYLOAD_LEN)?;
    let license = sadl::decode_bytes(&bytes)?;
    let image = license.image_bytes();
    if let Some(out) = image_out {
        write_image(out, image)?;
    }
    print_license(
        output,
        &LicenseOutput::new(Some(license.version), &license.record, image.len()),
    )
}

fn cmd_batch(output: OutputFormat, path: &Path) -> Result<()> {
    let text = input::read_text(path)?;
    let entries = sadl::decode_hex_batch(&text)?;

    let mut failures = 0;
    for entry in &entries {
        let (license, error, error_code) = match &entry.result {
            Ok(decoded) => (
                Some(LicenseOutput::new(
                    Some(decoded.version),
                    &decoded.record,
                    decoded.image_bytes().len(),
                )),
                None,
                None,
            ),
            Err(e) => {
                failures += 1;
                (None, Some(e.to_string()), Some(e.error_code()))
            }
        };

        match output {
            OutputFormat::Json => {
                let item = BatchOutput {
                    index: entry.index,
                    license,
                    error,
                    error_code,
                };
                println!("{}", serde_json::to_string(&item)?);
            }
            OutputFormat::Text => {
                println!("=== License {} ===", entry.index + 1);
                match (license, error) {
                    (Some(license), _) => print_license(output, &license)?,
                    (None, Some(error)) => println!("Error: {}", error),
                    (None, None) => {}
                }
            }
        }
    }

    if failures == entries.len() {
        bail!("All {} license(s) failed to decode", failures);
    }
    if failures > 0 {
        warn!("{} of {} license(s) failed to decode", failures, entries.len());
    }
    Ok(())
}

fn cmd_inspect(output: OutputFormat, path: &Path, format: Option<InputFormat>) -> Result<()> {
    let bytes = load(path, format, PAYLOAD_LEN)?;
    let payload = EncryptedPayload::new(&bytes).map_err(LicenseError::from)?;
    let plaintext = payload.decrypt().map_err(LicenseError::from)?;
    let preview_len = plaintext.len().min(INSPECT_PREVIEW_LEN);
    let record = sadl::parse(&plaintext).ok();

    let report = InspectOutput {
        version: payload.version(),
        header: hex::encode_upper(payload.header()),
        plaintext_preview: hex::encode_upper(&plaintext[..preview_len]),
        marker_offset: plaintext.iter().position(|&b| b == START_MARKER),
        expected_image_sizes: record.as_ref().map(LicenseRecord::expected_image_sizes),
    };

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Key version: {}", report.version);
            println!("Header: {}", report.header);
            println!("Plaintext (first {} bytes): {}", preview_len, report.plaintext_preview);
            match report.marker_offset {
                Some(offset) => println!("Start marker offset: {}", offset),
                None => println!("Start marker offset: not found"),
            }
            if let (Some(record), Some(sizes)) = (&record, &report.expected_image_sizes) {
                println!(
                    "{}",
                    expected_size_line(record.image_width(), record.image_height(), sizes)
                );
            }
        }
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

/// Suggestion attached to a decoding failure, if any
fn hint(err: &anyhow::Error) -> Option<&str> {
    err.downcast_ref::<LicenseError>()
        .and_then(LicenseError::suggestion)
}

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .init();

    let cli = Cli::parse();
    let output = cli.output.unwrap_or(config.output);

    let result = match cli.command {
        Commands::Decode {
            input,
            format,
            plaintext,
            json,
            image_out,
        } => {
            let output = if json { OutputFormat::Json } else { output };
            cmd_decode(output, &input, format, plaintext, image_out.as_deref())
        }
        Commands::Batch { input } => cmd_batch(output, &input),
        Commands::Inspect { input, format } => cmd_inspect(output, &input, format),
    };

    if let Some(suggestion) = result.as_ref().err().and_then(hint) {
        eprintln!("hint: {}", suggestion);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_decode_args() {
        let cli = Cli::try_parse_from([
            "sadl",
            "decode",
            "--format",
            "base64",
            "--json",
            "--image-out",
            "photo.bin",
            "-",
        ])
        .unwrap();
        match cli.command {
            Commands::Decode {
                input,
                format,
                plaintext,
                json,
                image_out,
            } => {
                assert_eq!(input, PathBuf::from("-"));
                assert_eq!(format, Some(InputFormat::Base64));
                assert!(!plaintext);
                assert!(json);
                assert_eq!(image_out, Some(PathBuf::from("photo.bin")));
            }
            _ => panic!("Expected decode command"),
        }
    }

    #[test]
    fn test_global_output_flag() {
        let cli = Cli::try_parse_from(["sadl", "batch", "in.hex", "--output", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Batch { .. }));
    }

    #[test]
    fn test_plaintext_decode_missing_marker() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &[0u8; PLAINTEXT_LEN]).unwrap();
        let err = cmd_decode(
            OutputFormat::Text,
            file.path(),
            Some(InputFormat::Raw),
            true,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LicenseError>(),
            Some(LicenseError::Parse(sadl::ParseError::MarkerNotFound))
        ));
        assert!(hint(&err).is_some());
    }

    #[test]
    fn test_inspect_wrong_length_has_hint() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &[0x01, 0x9b, 0x09, 0x45, 0x00]).unwrap();
        let err = cmd_inspect(OutputFormat::Text, file.path(), Some(InputFormat::Raw)).unwrap_err();
        assert!(err
            .downcast_ref::<LicenseError>()
            .is_some_and(LicenseError::is_format_error));
        assert!(hint(&err).unwrap().contains("720"));
    }

    #[test]
    fn test_io_failure_has_no_hint() {
        let err = load(Path::new("/nonexistent/payload.hex"), None, PAYLOAD_LEN).unwrap_err();
        assert!(hint(&err).is_none());
    }

    fn record_250x200() -> LicenseRecord {
        LicenseRecord {
            vehicle_codes: vec!["EC".to_string()],
            surname: "DOE".to_string(),
            initials: "J".to_string(),
            prdp_code: None,
            id_country_of_issue: "ZA".to_string(),
            license_country_of_issue: "ZA".to_string(),
            vehicle_restrictions: vec!["0".to_string()],
            license_number: "123400001ABC".to_string(),
            id_number: "8001015009087".to_string(),
            id_number_type: "01".to_string(),
            license_code_issue_dates: vec!["2020/10/06".to_string()],
            driver_restriction_codes: "00".to_string(),
            prdp_permit_expiry_date: String::new(),
            license_issue_number: "01".to_string(),
            birthdate: "1980/11/01".to_string(),
            license_issue_date: "2025/02/11".to_string(),
            license_expiry_date: "2030/02/10".to_string(),
            gender: sadl::Gender::Male,
            image_header: sadl::ImageHeader::from_raw([0x49, 0x04, 0x00, 0xfa, 0x00, 0xc8]),
            image_region: sadl::ImageRegion {
                offset: 103,
                len: 611,
            },
        }
    }

    #[test]
    fn test_license_output_reports_expected_sizes() {
        let record = record_250x200();
        let output = LicenseOutput::new(Some(KeyVersion::V2), &record, 611);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["version"], "v2");
        assert_eq!(json["surname"], "DOE");
        assert_eq!(json["imageBytes"], 611);
        assert_eq!(json["expectedImageSizes"]["grayscale"], 50_000);
        assert_eq!(json["expectedImageSizes"]["rgb"], 150_000);

        assert_eq!(
            expected_size_line(250, 200, &output.expected_image_sizes),
            "Expected size for 250x200: 50000 bytes grayscale, 150000 bytes RGB"
        );
    }

    #[test]
    fn test_batch_rejects_bad_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"019B0945").unwrap();
        assert!(cmd_batch(OutputFormat::Text, file.path()).is_err());
    }
}
