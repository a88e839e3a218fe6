//! # apc-types
//!
//! Type definitions for admitted patient care flow graphs.
//!
//! This crate provides the data model shared by the loader and the Sankey
//! exporter: diagnosis code classification rules, input rows, and the
//! three-tier flow graph handed to a renderer.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use apc_types::{AggregatedRow, FlowDimensions};
//! use apc_types::well_known;
//!
//! // Classify a diagnosis code
//! let rules = well_known::cancer_rules();
//! let category = rules.classify("C341").label().unwrap();
//! assert_eq!(category, well_known::LUNG_CANCER);
//!
//! // Describe a per-category total
//! let row = AggregatedRow::new(category)
//!     .with_value(well_known::MALE, 10.0)
//!     .with_value(well_known::EMERGENCY, 10.0);
//!
//! let dims = FlowDimensions::admissions();
//! assert_eq!(dims.source_measures.len(), 2);
//! assert_eq!(row.value("Male"), Some(10.0));
//! ```

#![warn(missing_docs)]

mod graph;
mod row;
mod rule;
pub mod well_known;

// Re-export all public types at crate root
pub use graph::{Color, Edge, FlowGraph, Node, Tier};
pub use row::{AggregatedRow, DiagnosisRecord, FlowDimensions, Measures};
pub use rule::{classify, CategoryRule, Classification, CodeMatcher, RuleError, RuleSet};
