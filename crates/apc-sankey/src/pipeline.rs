//! End-to-end export: discover, load, aggregate, build.

use apc_loader::{
    discover_input_files, load_aggregated_rows, load_diagnosis_rows, AggregateStats, ApcResult,
    FlowGraphBuilder,
};
use apc_types::{well_known, FlowGraph};

use crate::settings::{InputKind, Settings};

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// The built graph.
    pub graph: FlowGraph,
    /// Number of input files read.
    pub files: usize,
    /// Aggregation statistics (diagnosis input only).
    pub stats: Option<AggregateStats>,
    /// Records skipped while parsing: diagnosis records outside the
    /// reporting period, or aggregated rows with a blank category.
    pub skipped_records: usize,
}

/// Runs the pipeline with the admissions layout and the cancer rule set.
pub fn run(settings: &Settings, builder: &FlowGraphBuilder) -> ApcResult<PipelineReport> {
    let files = discover_input_files(&settings.data_path)?;
    tracing::info!(
        "Discovered {} input file(s) in {}",
        files.len(),
        settings.data_path.display()
    );

    let config = settings.load_config();
    let dimensions = builder.dimensions();

    let (rows, stats, skipped_records) = match settings.input_kind {
        InputKind::Diagnosis => {
            let rules = well_known::cancer_rules();
            let (rows, stats, skipped) =
                load_diagnosis_rows(&files, &rules, dimensions, &config)?;
            tracing::info!(
                "Classified {} of {} records ({:.1}%) into {} categories",
                stats.classified_records,
                stats.total_records,
                stats.match_rate(),
                stats.categories
            );
            if stats.unclassified_records > 0 {
                tracing::info!("Dropped {} unclassified records", stats.unclassified_records);
            }
            if skipped > 0 {
                tracing::info!("Skipped {} records outside the reporting period", skipped);
            }
            (rows, Some(stats), skipped)
        }
        InputKind::Aggregated => {
            let (rows, skipped) = load_aggregated_rows(&files, dimensions, &config)?;
            tracing::info!("Loaded {} aggregated rows", rows.len());
            if skipped > 0 {
                tracing::warn!("Skipped {} aggregated rows with a blank category", skipped);
            }
            (rows, None, skipped)
        }
    };
    if rows.is_empty() {
        tracing::warn!("No matching rows; the figure will be empty");
    }

    let graph = builder.build(&rows)?;
    tracing::info!(
        "Built flow graph with {} nodes and {} edges",
        graph.nodes().len(),
        graph.edges().len()
    );

    Ok(PipelineReport {
        graph,
        files: files.len(),
        stats,
        skipped_records,
    })
}
