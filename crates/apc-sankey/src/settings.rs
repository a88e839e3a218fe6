//! Environment-driven settings for the exporter binary.

use std::path::PathBuf;
use std::str::FromStr;

use apc_loader::LoadConfig;
use thiserror::Error;

const DEFAULT_DATA_PATH: &str = "data";
const DEFAULT_PERIOD: u32 = 2025;

/// Errors raised while reading settings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// Unknown input kind.
    #[error("Invalid APC_INPUT_KIND '{0}' (expected 'diagnosis' or 'aggregated')")]
    InvalidInputKind(String),

    /// Period is neither a year nor `all`.
    #[error("Invalid APC_PERIOD '{0}' (expected a year or 'all')")]
    InvalidPeriod(String),

    /// Delimiter is not a single ASCII character.
    #[error("Invalid APC_DELIMITER '{0}' (expected one ASCII character)")]
    InvalidDelimiter(String),
}

/// Shape of the input exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// Diagnosis-level rows with `Code` and `Year` columns.
    #[default]
    Diagnosis,
    /// Rows already grouped by `category`.
    Aggregated,
}

impl FromStr for InputKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diagnosis" => Ok(Self::Diagnosis),
            "aggregated" => Ok(Self::Aggregated),
            _ => Err(SettingsError::InvalidInputKind(s.to_string())),
        }
    }
}

/// Exporter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Input file or directory (`APC_DATA_PATH`).
    pub data_path: PathBuf,
    /// Input shape (`APC_INPUT_KIND`).
    pub input_kind: InputKind,
    /// Reporting year filter (`APC_PERIOD`, `all` disables it).
    pub period: Option<u32>,
    /// Field delimiter (`APC_DELIMITER`).
    pub delimiter: u8,
    /// JSON destination (`APC_OUTPUT_PATH`); stdout when unset.
    pub output_path: Option<PathBuf>,
    /// Figure title (`APC_TITLE`).
    pub title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            input_kind: InputKind::default(),
            period: Some(DEFAULT_PERIOD),
            delimiter: b',',
            output_path: None,
            title: default_title(InputKind::default(), Some(DEFAULT_PERIOD)),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through a lookup function, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(path) = lookup("APC_DATA_PATH") {
            settings.data_path = PathBuf::from(path);
        }
        if let Some(kind) = lookup("APC_INPUT_KIND") {
            settings.input_kind = kind.parse()?;
        }
        if let Some(period) = lookup("APC_PERIOD") {
            settings.period = parse_period(&period)?;
        }
        if let Some(delimiter) = lookup("APC_DELIMITER") {
            settings.delimiter = parse_delimiter(&delimiter)?;
        }
        settings.output_path = lookup("APC_OUTPUT_PATH").map(PathBuf::from);
        settings.title = lookup("APC_TITLE")
            .unwrap_or_else(|| default_title(settings.input_kind, settings.period));

        Ok(settings)
    }

    /// Parser configuration derived from these settings.
    pub fn load_config(&self) -> LoadConfig {
        LoadConfig {
            delimiter: self.delimiter,
            period: self.period,
            ..Default::default()
        }
    }
}

fn parse_period(value: &str) -> Result<Option<u32>, SettingsError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| SettingsError::InvalidPeriod(value.to_string()))
}

fn parse_delimiter(value: &str) -> Result<u8, SettingsError> {
    if value == "\\t" || value == "tab" {
        return Ok(b'\t');
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(SettingsError::InvalidDelimiter(value.to_string())),
    }
}

/// Aggregated input carries no year, so only diagnosis titles name one.
fn default_title(input_kind: InputKind, period: Option<u32>) -> String {
    let base = "NHS England Patient Care: Cancer Type by Gender and Admission Type";
    match (input_kind, period) {
        (InputKind::Diagnosis, Some(year)) => format!("{} ({})", base, year),
        _ => base.to_string(),
    }
}
