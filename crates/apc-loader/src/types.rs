//! Loader-specific types: errors, configuration and statistics.

use std::path::PathBuf;

use apc_types::RuleError;
use thiserror::Error;

/// Errors that can occur while loading rows or building a flow graph.
#[derive(Error, Debug)]
pub enum ApcError {
    /// I/O error reading an input file.
    #[error("IO error reading input: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid classification rule.
    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),

    /// Missing required column in an input file.
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// The name of the missing column.
        column: String,
    },

    /// Non-numeric measure cell.
    #[error("Invalid number in column '{column}': {value}")]
    InvalidNumber {
        /// The column being parsed.
        column: String,
        /// The offending cell.
        value: String,
    },

    /// Invalid reporting year.
    #[error("Invalid period: {value}")]
    InvalidPeriod {
        /// The offending cell.
        value: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A directory held no delimited files.
    #[error("No input files found in {path}")]
    NoInputFiles {
        /// The directory that was searched.
        path: String,
    },

    /// The same label appears twice in the node sequence.
    #[error("Duplicate node label: {label}")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },

    /// A measure value is negative or not finite.
    #[error("Invalid value {value} for measure '{measure}' in category '{category}'")]
    InvalidMeasure {
        /// Category of the offending row.
        category: String,
        /// Measure name.
        measure: String,
        /// The rejected value.
        value: f64,
    },

    /// A declared measure is absent from a row.
    #[error("Measure '{measure}' missing from category '{category}'")]
    MissingMeasure {
        /// Category of the offending row.
        category: String,
        /// Measure name.
        measure: String,
    },

    /// A row has an empty category label.
    #[error("Row has an empty category label")]
    EmptyCategory,

    /// The colour palette has no entries.
    #[error("Colour palette is empty")]
    EmptyPalette,
}

/// Result type for loader operations.
pub type ApcResult<T> = Result<T, ApcError>;

/// Configuration for reading delimited input.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Only keep records for this reporting year (`None` = all years).
    pub period: Option<u32>,
    /// Batch size for batched parsing (affects memory usage).
    pub batch_size: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            period: None,
            batch_size: 10_000,
        }
    }
}

impl LoadConfig {
    /// Creates a config restricted to one reporting year.
    pub fn for_period(period: u32) -> Self {
        Self {
            period: Some(period),
            ..Default::default()
        }
    }

    /// Creates a config for tab-delimited exports.
    pub fn tab_delimited() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }
}

/// Statistics from aggregating diagnosis records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    /// Records offered to the aggregator.
    pub total_records: usize,
    /// Records matched by a rule.
    pub classified_records: usize,
    /// Records dropped because no rule matched.
    pub unclassified_records: usize,
    /// Distinct categories produced.
    pub categories: usize,
}

impl AggregateStats {
    /// Returns the percentage of records that were classified.
    pub fn match_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.classified_records as f64 / self.total_records as f64) * 100.0
        }
    }
}

/// Delimited files discovered under an input path.
#[derive(Debug, Clone, Default)]
pub struct InputFiles {
    /// Files in name order.
    pub files: Vec<PathBuf>,
}

impl InputFiles {
    /// Returns true if no files were found.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }
}
