//! Environment configuration for the `sadl` binary

use anyhow::{bail, Result};

/// How decoded records are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("Unknown output format: {}. Use text or json.", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Output used when no `--output` flag is given
    pub output: OutputFormat,
    /// Filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("SADL_OUTPUT").ok(),
            std::env::var("SADL_LOG").ok(),
        )
    }

    fn from_vars(output: Option<String>, log_filter: Option<String>) -> Result<Self> {
        let output = match output {
            Some(value) => OutputFormat::parse(&value)?,
            None => OutputFormat::Text,
        };
        Ok(Self {
            output,
            log_filter: log_filter.unwrap_or_else(|| "info".to_string()),
        })
    }
}
