//! # apc-loader
//!
//! Loads admitted patient care exports and builds Sankey flow graphs.
//!
//! The pipeline is:
//!
//! 1. [`discover_input_files`] finds delimited exports.
//! 2. [`CsvParser`] streams [`DiagnosisRecord`](apc_types::DiagnosisRecord)s
//!    or [`AggregatedRow`](apc_types::AggregatedRow)s from them.
//! 3. [`CategoryAggregator`] classifies diagnosis codes and sums measures
//!    per category, dropping codes no rule matches.
//! 4. [`build`] turns the per-category rows into a
//!    [`FlowGraph`](apc_types::FlowGraph).
//!
//! ## Features
//!
//! - `parallel` (default): classifies batches and builds multiple graphs on
//!   the rayon thread pool. Output is identical without it.

#![warn(missing_docs)]

mod aggregate;
mod aggregated;
mod builder;
mod diagnosis;
mod loader;
pub mod parser;
mod types;

pub use aggregate::{aggregate, CategoryAggregator};
pub use builder::{build, FlowGraphBuilder};
pub use loader::{discover_input_files, load_aggregated_rows, load_diagnosis_rows};
pub use parser::{ApcRecord, ColumnMap, CsvParser};
pub use types::{AggregateStats, ApcError, ApcResult, InputFiles, LoadConfig};

// Re-export apc-types for convenience
pub use apc_types;
