//! Generic delimited-file parser.
//!
//! Provides a streaming parser for warehouse exports. Columns are located by
//! header name so exports may order or pad their columns freely.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use apc_types::{FlowDimensions, Measures};
use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{ApcError, ApcResult, LoadConfig};

/// Trait for types that can be parsed from export rows.
pub trait ApcRecord: Sized {
    /// Non-measure columns this record type requires, in lookup order.
    const KEY_COLUMNS: &'static [&'static str];

    /// Parse a record from a CSV StringRecord.
    fn from_record(record: &StringRecord, columns: &ColumnMap) -> ApcResult<Self>;

    /// Returns true if this record passes the given filter config.
    fn passes_filter(&self, config: &LoadConfig) -> bool;
}

/// Header positions of the key and measure columns.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    keys: Vec<usize>,
    measures: Vec<(String, usize)>,
}

impl ColumnMap {
    /// Resolves key and measure columns against a header row.
    ///
    /// # Errors
    /// Returns [`ApcError::MissingColumn`] for the first column not present.
    pub fn resolve<'a>(
        headers: &StringRecord,
        key_columns: &[&str],
        measures: impl IntoIterator<Item = &'a str>,
    ) -> ApcResult<Self> {
        let names: Vec<&str> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                // Handle UTF-8 BOM at start of file
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim()
            })
            .collect();

        let find = |column: &str| {
            names
                .iter()
                .position(|&name| name == column)
                .ok_or_else(|| ApcError::MissingColumn {
                    column: column.to_string(),
                })
        };

        let keys = key_columns
            .iter()
            .map(|&column| find(column))
            .collect::<ApcResult<Vec<_>>>()?;
        let measures = measures
            .into_iter()
            .map(|column| find(column).map(|i| (column.to_string(), i)))
            .collect::<ApcResult<Vec<_>>>()?;

        Ok(Self { keys, measures })
    }

    /// Returns the trimmed value of the `n`th key column.
    pub fn key<'r>(&self, record: &'r StringRecord, n: usize) -> &'r str {
        self.keys
            .get(n)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .trim()
    }

    /// Parses every measure column of a record.
    pub fn measures(&self, record: &StringRecord) -> ApcResult<Measures> {
        self.measures
            .iter()
            .map(|(name, i)| {
                let value = record.get(*i).ok_or_else(|| ApcError::MissingColumn {
                    column: name.clone(),
                })?;
                parse::measure(name, value).map(|v| (name.clone(), v))
            })
            .collect()
    }
}

/// A streaming parser for delimited exports.
///
/// This parser reads files record-by-record to avoid loading
/// entire files into memory.
pub struct CsvParser<R: Read, T: ApcRecord> {
    reader: Reader<R>,
    columns: ColumnMap,
    config: LoadConfig,
    records_read: usize,
    records_skipped: usize,
    _marker: PhantomData<T>,
}

impl<T: ApcRecord> CsvParser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or lacks a required column.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        dimensions: &FlowDimensions,
        config: LoadConfig,
    ) -> ApcResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ApcError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), dimensions, config)
    }
}

impl<R: Read, T: ApcRecord> CsvParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(
        reader: R,
        dimensions: &FlowDimensions,
        config: LoadConfig,
    ) -> ApcResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let columns =
            ColumnMap::resolve(csv_reader.headers()?, T::KEY_COLUMNS, dimensions.measures())?;

        Ok(Self {
            reader: csv_reader,
            columns,
            config,
            records_read: 0,
            records_skipped: 0,
            _marker: PhantomData,
        })
    }

    /// Returns the number of records read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the number of records rejected by the filter so far.
    pub fn records_skipped(&self) -> usize {
        self.records_skipped
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Parses all records into a Vec, applying filters.
    ///
    /// Note: This loads all matching records into memory.
    pub fn parse_all(self) -> ApcResult<Vec<T>> {
        self.collect()
    }

    /// Parses records in batches, calling the callback for each batch.
    ///
    /// Returns the number of records passed to the callback.
    pub fn parse_batched<F>(&mut self, mut callback: F) -> ApcResult<usize>
    where
        F: FnMut(Vec<T>) -> ApcResult<()>,
    {
        let batch_size = self.config.batch_size.max(1);
        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0;

        for record in self.by_ref() {
            batch.push(record?);
            if batch.len() >= batch_size {
                total += batch.len();
                callback(std::mem::replace(&mut batch, Vec::with_capacity(batch_size)))?;
            }
        }

        // Process remaining records
        if !batch.is_empty() {
            total += batch.len();
            callback(batch)?;
        }

        Ok(total)
    }
}

impl<R: Read, T: ApcRecord> Iterator for CsvParser<R, T> {
    type Item = ApcResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    // Skip empty records
                    if record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    self.records_read += 1;

                    match T::from_record(&record, &self.columns) {
                        Ok(parsed) => {
                            if parsed.passes_filter(&self.config) {
                                return Some(Ok(parsed));
                            }
                            self.records_skipped += 1;
                            continue;
                        }
                        Err(e) => return Some(Err(e)),
                    }
                }
                Ok(false) => return None, // End of file
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Helper functions for parsing field values.
pub mod parse {
    use super::{ApcError, ApcResult};

    /// Parses a measure cell. Blank cells count as zero.
    pub fn measure(column: &str, value: &str) -> ApcResult<f64> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(0.0);
        }
        value.parse::<f64>().map_err(|_| ApcError::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    /// Parses a reporting year.
    pub fn period(value: &str) -> ApcResult<u32> {
        let value = value.trim();
        value.parse::<u32>().map_err(|_| ApcError::InvalidPeriod {
            value: value.to_string(),
        })
    }
}
