//! Classification and per-category aggregation of diagnosis records.
//!
//! This is the in-process counterpart of the warehouse query
//!
//! ```sql
//! SELECT CASE WHEN Code LIKE 'C33%' ... END AS category, SUM(Male), ...
//! GROUP BY category
//! ```
//!
//! Records whose code matches no rule are dropped, never placed in a
//! category. Output rows keep the order in which categories are first seen.
//! A classified record carrying a negative or non-finite measure is rejected
//! before it is summed.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use apc_types::{AggregatedRow, DiagnosisRecord, FlowDimensions, RuleSet};

use crate::types::{AggregateStats, ApcError, ApcResult};

/// Incrementally sums diagnosis records into per-category rows.
///
/// # Example
///
/// ```
/// use apc_loader::CategoryAggregator;
/// use apc_types::{well_known, DiagnosisRecord, FlowDimensions};
///
/// let rules = well_known::cancer_rules();
/// let dims = FlowDimensions::new(["Male"], ["Emergency"]);
/// let mut aggregator = CategoryAggregator::new(&rules, &dims);
///
/// aggregator.push(&DiagnosisRecord::new("C33", 2025).with_value("Male", 2.0))?;
/// aggregator.push(&DiagnosisRecord::new("C34", 2025).with_value("Male", 3.0))?;
/// aggregator.push(&DiagnosisRecord::new("I21", 2025).with_value("Male", 9.0))?;
///
/// let (rows, stats) = aggregator.finish();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].value("Male"), Some(5.0));
/// assert_eq!(stats.unclassified_records, 1);
/// # Ok::<(), apc_loader::ApcError>(())
/// ```
#[derive(Debug)]
pub struct CategoryAggregator<'a> {
    rules: &'a RuleSet,
    dimensions: &'a FlowDimensions,
    rows: Vec<AggregatedRow>,
    slots: HashMap<String, usize>,
    stats: AggregateStats,
}

impl<'a> CategoryAggregator<'a> {
    /// Creates an empty aggregator.
    pub fn new(rules: &'a RuleSet, dimensions: &'a FlowDimensions) -> Self {
        Self {
            rules,
            dimensions,
            rows: Vec::new(),
            slots: HashMap::new(),
            stats: AggregateStats::default(),
        }
    }

    /// Classifies and adds one record.
    ///
    /// # Errors
    /// Returns [`ApcError::InvalidMeasure`] if a classified record holds a
    /// negative or non-finite value. Nothing is summed in that case.
    pub fn push(&mut self, record: &DiagnosisRecord) -> ApcResult<()> {
        let label = self.rules.classify(&record.code).label();
        self.accumulate(record, label)
    }

    /// Classifies and adds a batch of records, preserving their order.
    ///
    /// With the `parallel` feature the classification runs on the rayon pool.
    /// Stops at the first invalid record; earlier records stay summed.
    pub fn extend(&mut self, records: &[DiagnosisRecord]) -> ApcResult<()> {
        let rules = self.rules;

        #[cfg(feature = "parallel")]
        let labels: Vec<Option<&str>> = records
            .par_iter()
            .map(|r| rules.classify(&r.code).label())
            .collect();

        #[cfg(not(feature = "parallel"))]
        let labels: Vec<Option<&str>> = records
            .iter()
            .map(|r| rules.classify(&r.code).label())
            .collect();

        for (record, label) in records.iter().zip(labels) {
            self.accumulate(record, label)?;
        }
        Ok(())
    }

    fn accumulate(&mut self, record: &DiagnosisRecord, label: Option<&str>) -> ApcResult<()> {
        let Some(label) = label else {
            self.stats.total_records += 1;
            self.stats.unclassified_records += 1;
            return Ok(());
        };

        for (measure, &value) in &record.values {
            if value < 0.0 || !value.is_finite() {
                return Err(ApcError::InvalidMeasure {
                    category: label.to_string(),
                    measure: measure.clone(),
                    value,
                });
            }
        }

        self.stats.total_records += 1;
        self.stats.classified_records += 1;

        let slot = match self.slots.get(label) {
            Some(&slot) => slot,
            None => {
                let slot = self.rows.len();
                self.slots.insert(label.to_string(), slot);
                self.rows.push(AggregatedRow::new(label));
                slot
            }
        };

        let row = &mut self.rows[slot];
        for measure in self.dimensions.measures() {
            row.add(measure, record.value(measure).unwrap_or(0.0));
        }
        Ok(())
    }

    /// Returns the statistics gathered so far.
    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Consumes the aggregator, returning rows in first-seen category order.
    pub fn finish(mut self) -> (Vec<AggregatedRow>, AggregateStats) {
        self.stats.categories = self.rows.len();
        tracing::debug!(
            total = self.stats.total_records,
            classified = self.stats.classified_records,
            unclassified = self.stats.unclassified_records,
            categories = self.stats.categories,
            "aggregated diagnosis records"
        );
        (self.rows, self.stats)
    }
}

/// Classifies and sums a slice of records in one call.
pub fn aggregate(
    records: &[DiagnosisRecord],
    rules: &RuleSet,
    dimensions: &FlowDimensions,
) -> ApcResult<(Vec<AggregatedRow>, AggregateStats)> {
    let mut aggregator = CategoryAggregator::new(rules, dimensions);
    aggregator.extend(records)?;
    Ok(aggregator.finish())
}
