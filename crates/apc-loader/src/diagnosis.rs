//! Diagnosis table parser.
//!
//! Parses diagnosis-level exports with a `Code` and `Year` column plus one
//! column per measure.

use apc_types::well_known::{CODE_COLUMN, YEAR_COLUMN};
use apc_types::DiagnosisRecord;
use csv::StringRecord;

use crate::parser::{parse, ApcRecord, ColumnMap};
use crate::types::{ApcResult, LoadConfig};

/// Key columns in a diagnosis export.
const DIAGNOSIS_COLUMNS: &[&str] = &[CODE_COLUMN, YEAR_COLUMN];

impl ApcRecord for DiagnosisRecord {
    const KEY_COLUMNS: &'static [&'static str] = DIAGNOSIS_COLUMNS;

    fn from_record(record: &StringRecord, columns: &ColumnMap) -> ApcResult<Self> {
        Ok(DiagnosisRecord {
            code: columns.key(record, 0).to_string(),
            period: parse::period(columns.key(record, 1))?,
            values: columns.measures(record)?,
        })
    }

    fn passes_filter(&self, config: &LoadConfig) -> bool {
        match config.period {
            Some(period) => self.period == period,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CsvParser;
    use crate::types::ApcError;
    use apc_types::FlowDimensions;

    const EXPORT: &str = "\
Code,Description,Year,Male,Female,Emergency,Waiting List,Planned,Other
C34,Malignant neoplasm of bronchus and lung,2025,120,95,150,40,20,5
C50,Malignant neoplasm of breast,2025,,310,30,200,70,10

C50,Malignant neoplasm of breast,2024,2,290,25,190,70,7
I21,Acute myocardial infarction,2025,400,250,600,10,30,10
";

    fn parser(config: LoadConfig) -> CsvParser<&'static [u8], DiagnosisRecord> {
        CsvParser::from_reader(EXPORT.as_bytes(), &FlowDimensions::admissions(), config).unwrap()
    }

    #[test]
    fn test_parse_diagnosis_export() {
        let records = parser(LoadConfig::default()).parse_all().unwrap();
        assert_eq!(records.len(), 4);

        let lung = &records[0];
        assert_eq!(lung.code, "C34");
        assert_eq!(lung.period, 2025);
        assert_eq!(lung.value("Male"), Some(120.0));
        assert_eq!(lung.value("Waiting List"), Some(40.0));
        assert_eq!(lung.values.len(), 6);

        // Blank cell reads as zero
        assert_eq!(records[1].value("Male"), Some(0.0));
    }

    #[test]
    fn test_period_filter() {
        let mut parser = parser(LoadConfig::for_period(2025));
        let records: Vec<_> = parser.by_ref().collect::<ApcResult<_>>().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.period == 2025));
        assert_eq!(parser.records_read(), 4);
        assert_eq!(parser.records_skipped(), 1);
    }

    #[test]
    fn test_parse_batched() {
        let config = LoadConfig {
            batch_size: 3,
            ..Default::default()
        };
        let mut sizes = Vec::new();
        let total = parser(config)
            .parse_batched(|batch| {
                sizes.push(batch.len());
                Ok(())
            })
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(sizes, vec![3, 1]);
    }

    #[test]
    fn test_missing_measure_column() {
        let export = "Code,Year,Male,Female\nC34,2025,1,2\n";
        let result = CsvParser::<_, DiagnosisRecord>::from_reader(
            export.as_bytes(),
            &FlowDimensions::admissions(),
            LoadConfig::default(),
        );
        assert!(matches!(
            result,
            Err(ApcError::MissingColumn { column }) if column == "Emergency"
        ));
    }

    #[test]
    fn test_invalid_year() {
        let export = "Code,Year,Male\nC34,2024-25,1\n";
        let dims = FlowDimensions::new(["Male"], Vec::<String>::new());
        let records = CsvParser::<_, DiagnosisRecord>::from_reader(
            export.as_bytes(),
            &dims,
            LoadConfig::default(),
        )
        .unwrap()
        .parse_all();
        assert!(matches!(records, Err(ApcError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_tab_delimited() {
        let export = "Code\tYear\tMale\n C61 \t2025\t12\n";
        let dims = FlowDimensions::new(["Male"], Vec::<String>::new());
        let records = CsvParser::<_, DiagnosisRecord>::from_reader(
            export.as_bytes(),
            &dims,
            LoadConfig::tab_delimited(),
        )
        .unwrap()
        .parse_all()
        .unwrap();
        assert_eq!(records[0].code, "C61");
        assert_eq!(records[0].value("Male"), Some(12.0));
    }
}
