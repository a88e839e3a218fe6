//! Aggregated export parser.
//!
//! Parses exports that are already grouped by category, such as the result
//! of the warehouse `GROUP BY` query saved to a file.

use apc_types::well_known::CATEGORY_COLUMN;
use apc_types::AggregatedRow;
use csv::StringRecord;

use crate::parser::{ApcRecord, ColumnMap};
use crate::types::{ApcResult, LoadConfig};

/// Key columns in an aggregated export.
const AGGREGATED_COLUMNS: &[&str] = &[CATEGORY_COLUMN];

impl ApcRecord for AggregatedRow {
    const KEY_COLUMNS: &'static [&'static str] = AGGREGATED_COLUMNS;

    fn from_record(record: &StringRecord, columns: &ColumnMap) -> ApcResult<Self> {
        Ok(AggregatedRow {
            category: columns.key(record, 0).to_string(),
            values: columns.measures(record)?,
        })
    }

    /// Rows whose category is blank were unclassified upstream.
    fn passes_filter(&self, _config: &LoadConfig) -> bool {
        !self.category.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CsvParser;
    use crate::types::ApcError;
    use apc_types::FlowDimensions;

    #[test]
    fn test_parse_aggregated_export() {
        let export = "\
category,Male,Female,Emergency,Waiting List,Planned,Other
Lung Cancer,120,95,150,40,20,5
,400,250,600,10,30,10
Breast Cancer,0,310,30,200,70,10
";
        let mut parser = CsvParser::<_, AggregatedRow>::from_reader(
            export.as_bytes(),
            &FlowDimensions::admissions(),
            LoadConfig::default(),
        )
        .unwrap();

        let rows: Vec<_> = parser.by_ref().collect::<ApcResult<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Lung Cancer");
        assert_eq!(rows[1].value("Female"), Some(310.0));
        assert_eq!(parser.records_skipped(), 1);
    }

    #[test]
    fn test_short_row_is_an_error() {
        let export = "\
category,Male,Female,Emergency,Waiting List,Planned,Other
Lung Cancer,120
";
        let rows = CsvParser::<_, AggregatedRow>::from_reader(
            export.as_bytes(),
            &FlowDimensions::admissions(),
            LoadConfig::default(),
        )
        .unwrap()
        .parse_all();
        assert!(matches!(rows, Err(ApcError::Csv(_))));
    }
}
