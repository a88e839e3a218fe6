//! Input rows: diagnosis-level records and per-category aggregates.
//!
//! Both carry a map from measure name (a warehouse column such as `Male` or
//! `Waiting List`) to a numeric value.

use std::collections::BTreeMap;

/// Measure values keyed by column name.
pub type Measures = BTreeMap<String, f64>;

/// One diagnosis-level row of the admitted patient care table.
///
/// # Examples
///
/// ```
/// use apc_types::DiagnosisRecord;
///
/// let record = DiagnosisRecord::new("C34", 2025)
///     .with_value("Male", 120.0)
///     .with_value("Emergency", 80.0);
///
/// assert_eq!(record.value("Male"), Some(120.0));
/// assert_eq!(record.value("Female"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosisRecord {
    /// Diagnosis code, e.g. `C34`.
    pub code: String,
    /// Reporting year.
    pub period: u32,
    /// Measure values for this code.
    pub values: Measures,
}

impl DiagnosisRecord {
    /// Creates a record with no measure values.
    pub fn new(code: impl Into<String>, period: u32) -> Self {
        Self {
            code: code.into(),
            period,
            values: Measures::new(),
        }
    }

    /// Sets a measure value, builder style.
    pub fn with_value(mut self, measure: impl Into<String>, value: f64) -> Self {
        self.values.insert(measure.into(), value);
        self
    }

    /// Returns the value of a measure, if present.
    pub fn value(&self, measure: &str) -> Option<f64> {
        self.values.get(measure).copied()
    }
}

/// Per-category totals, the input of the flow graph builder.
///
/// Values are expected to be non-negative. A value of zero means no flow.
///
/// # Examples
///
/// ```
/// use apc_types::AggregatedRow;
///
/// let mut row = AggregatedRow::new("Lung Cancer").with_value("Male", 10.0);
/// row.add("Male", 5.0);
///
/// assert_eq!(row.value("Male"), Some(15.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregatedRow {
    /// Category label assigned by classification.
    pub category: String,
    /// Measure totals for the category.
    pub values: Measures,
}

impl AggregatedRow {
    /// Creates a row with no measure values.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            values: Measures::new(),
        }
    }

    /// Sets a measure value, builder style.
    pub fn with_value(mut self, measure: impl Into<String>, value: f64) -> Self {
        self.values.insert(measure.into(), value);
        self
    }

    /// Returns the value of a measure, if present.
    pub fn value(&self, measure: &str) -> Option<f64> {
        self.values.get(measure).copied()
    }

    /// Adds to a measure, inserting it at zero first if absent.
    pub fn add(&mut self, measure: &str, value: f64) {
        match self.values.get_mut(measure) {
            Some(total) => *total += value,
            None => {
                self.values.insert(measure.to_string(), value);
            }
        }
    }
}

/// The ordered measure layout of a two-level flow graph.
///
/// `source_measures` become the first node tier and `target_measures` the
/// last, both in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowDimensions {
    /// Measures flowing into categories (e.g. gender).
    pub source_measures: Vec<String>,
    /// Measures flowing out of categories (e.g. admission method).
    pub target_measures: Vec<String>,
}

impl FlowDimensions {
    /// Creates a layout from measure names.
    pub fn new<S, T>(source_measures: S, target_measures: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            source_measures: source_measures.into_iter().map(Into::into).collect(),
            target_measures: target_measures.into_iter().map(Into::into).collect(),
        }
    }

    /// Gender → admission method, the layout of the admissions chart.
    pub fn admissions() -> Self {
        Self::new(
            crate::well_known::GENDER_MEASURES.iter().copied(),
            crate::well_known::ADMISSION_MEASURES.iter().copied(),
        )
    }

    /// All measures, source measures first.
    pub fn measures(&self) -> impl Iterator<Item = &str> {
        self.source_measures
            .iter()
            .chain(self.target_measures.iter())
            .map(String::as_str)
    }
}
