//! Input file discovery and loading utilities.

use std::fs;
use std::path::Path;

use apc_types::{AggregatedRow, DiagnosisRecord, FlowDimensions, RuleSet};

use crate::aggregate::CategoryAggregator;
use crate::parser::CsvParser;
use crate::types::{AggregateStats, ApcError, ApcResult, InputFiles, LoadConfig};

/// File extensions treated as delimited exports.
const INPUT_EXTENSIONS: &[&str] = &["csv", "tsv"];

/// Discovers delimited export files under a path.
///
/// A file path is returned as-is. A directory is scanned (not recursively)
/// for `.csv` and `.tsv` files, returned in name order.
pub fn discover_input_files<P: AsRef<Path>>(path: P) -> ApcResult<InputFiles> {
    let path = path.as_ref();

    if path.is_file() {
        return Ok(InputFiles {
            files: vec![path.to_path_buf()],
        });
    }

    if !path.is_dir() {
        return Err(ApcError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let file_path = entry.path();
        let is_export = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| INPUT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_export {
            files.push(file_path);
        }
    }

    if files.is_empty() {
        return Err(ApcError::NoInputFiles {
            path: path.display().to_string(),
        });
    }

    files.sort();
    Ok(InputFiles { files })
}

/// Reads every diagnosis file and aggregates the records by category.
///
/// Records outside `config.period` are skipped while parsing. Returns the
/// aggregated rows, the aggregation statistics and the number of skipped
/// records.
pub fn load_diagnosis_rows(
    files: &InputFiles,
    rules: &RuleSet,
    dimensions: &FlowDimensions,
    config: &LoadConfig,
) -> ApcResult<(Vec<AggregatedRow>, AggregateStats, usize)> {
    let mut aggregator = CategoryAggregator::new(rules, dimensions);
    let mut skipped = 0;

    for path in &files.files {
        let mut parser =
            CsvParser::<_, DiagnosisRecord>::from_path(path, dimensions, config.clone())?;
        parser.parse_batched(|batch| aggregator.extend(&batch))?;
        skipped += parser.records_skipped();
        tracing::debug!(
            path = %path.display(),
            read = parser.records_read(),
            skipped = parser.records_skipped(),
            "parsed diagnosis file"
        );
    }

    let (rows, stats) = aggregator.finish();
    Ok((rows, stats, skipped))
}

/// Reads every pre-aggregated file, concatenating rows in file order.
///
/// Rows with a blank category are skipped. Returns the rows and the number
/// of skipped rows.
pub fn load_aggregated_rows(
    files: &InputFiles,
    dimensions: &FlowDimensions,
    config: &LoadConfig,
) -> ApcResult<(Vec<AggregatedRow>, usize)> {
    let mut rows = Vec::new();
    let mut skipped = 0;

    for path in &files.files {
        let mut parser =
            CsvParser::<_, AggregatedRow>::from_path(path, dimensions, config.clone())?;
        for row in parser.by_ref() {
            rows.push(row?);
        }
        skipped += parser.records_skipped();
        tracing::debug!(
            path = %path.display(),
            read = parser.records_read(),
            skipped = parser.records_skipped(),
            "parsed aggregated file"
        );
    }

    Ok((rows, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use apc_types::well_known;

    const HEADER: &str = "Code,Year,Male,Female,Emergency,Waiting List,Planned,Other\n";

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), format!("{HEADER}{body}")).unwrap();
    }

    #[test]
    fn test_discover_sorted_exports() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.csv", "");
        write(dir.path(), "a.TSV", "");
        write(dir.path(), "notes.txt", "");
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let files = discover_input_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.TSV", "b.csv"]);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "diagnosis.txt", "");
        let files = discover_input_files(dir.path().join("diagnosis.txt")).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover_input_files(dir.path()),
            Err(ApcError::NoInputFiles { .. })
        ));
        assert!(matches!(
            discover_input_files(dir.path().join("missing")),
            Err(ApcError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_load_diagnosis_rows_across_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2025-a.csv", "C34,2025,10,5,12,1,2,0\nI21,2025,50,50,90,5,5,0\n");
        write(dir.path(), "2025-b.csv", "C34,2025,1,1,2,0,0,0\nC50,2024,0,9,1,8,0,0\n");

        let files = discover_input_files(dir.path()).unwrap();
        let rules = well_known::cancer_rules();
        let dims = FlowDimensions::admissions();
        let (rows, stats, skipped) =
            load_diagnosis_rows(&files, &rules, &dims, &LoadConfig::for_period(2025)).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, well_known::LUNG_CANCER);
        assert_eq!(rows[0].value(well_known::MALE), Some(11.0));
        assert_eq!(rows[0].value(well_known::EMERGENCY), Some(14.0));
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.unclassified_records, 1);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_load_aggregated_rows() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("summary.csv"),
            "category,Male,Female,Emergency,Waiting List,Planned,Other\n\
             Melanoma,3,4,1,2,3,1\n\
             ,9,9,9,0,0,0\n",
        )
        .unwrap();

        let files = discover_input_files(dir.path()).unwrap();
        let (rows, skipped) =
            load_aggregated_rows(&files, &FlowDimensions::admissions(), &LoadConfig::default())
                .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, well_known::MELANOMA);
        assert_eq!(skipped, 1);
    }
}
