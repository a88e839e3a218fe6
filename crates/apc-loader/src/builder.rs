//! Sankey flow graph construction.
//!
//! Turns per-category rows into a three-tier graph:
//!
//! ```text
//! source measures ──► categories ──► target measures
//!   (Male, Female)    (Lung, ...)    (Emergency, Waiting List, ...)
//! ```
//!
//! Nodes are laid out as `source ++ categories ++ target`, categories
//! deduplicated in first-seen order. Each row emits one edge per non-zero
//! measure. Edges are never merged, so two rows for the same category yield
//! parallel edges. Each edge takes the palette colour of its category,
//! assigned by first-seen position modulo the palette length.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use apc_types::{AggregatedRow, Color, Edge, FlowDimensions, FlowGraph, Node, Tier};

use crate::types::{ApcError, ApcResult};

/// Builds a flow graph from aggregated rows.
///
/// Empty `rows` give an empty graph. Otherwise the rows, the palette and the
/// node labels are validated before any edge is produced, so a failed build
/// never yields a partial graph.
///
/// # Errors
/// - [`ApcError::EmptyPalette`] if `palette` is empty.
/// - [`ApcError::EmptyCategory`] for a row with a blank category.
/// - [`ApcError::MissingMeasure`] if a row lacks a declared measure.
/// - [`ApcError::InvalidMeasure`] for a negative or non-finite value.
/// - [`ApcError::DuplicateLabel`] if a label occurs twice across the tiers.
///
/// # Example
///
/// ```
/// use apc_loader::build;
/// use apc_types::{AggregatedRow, Color};
///
/// let rows = vec![AggregatedRow::new("Lung")
///     .with_value("Male", 10.0)
///     .with_value("Female", 0.0)
///     .with_value("Emergency", 10.0)
///     .with_value("Planned", 0.0)];
///
/// let graph = build(
///     &rows,
///     &["Male", "Female"],
///     &["Emergency", "Planned"],
///     &[Color::new("pink")],
/// )
/// .unwrap();
///
/// let labels: Vec<_> = graph.labels().collect();
/// assert_eq!(labels, ["Male", "Female", "Lung", "Emergency", "Planned"]);
///
/// let edges: Vec<_> = graph.edges().iter().map(|e| (e.source, e.target, e.weight)).collect();
/// assert_eq!(edges, [(0, 2, 10.0), (2, 3, 10.0)]);
/// ```
pub fn build<S, T>(
    rows: &[AggregatedRow],
    source_measures: &[S],
    target_measures: &[T],
    palette: &[Color],
) -> ApcResult<FlowGraph>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    if rows.is_empty() {
        return Ok(FlowGraph::empty());
    }
    if palette.is_empty() {
        return Err(ApcError::EmptyPalette);
    }

    let sources: Vec<&str> = source_measures.iter().map(AsRef::as_ref).collect();
    let targets: Vec<&str> = target_measures.iter().map(AsRef::as_ref).collect();

    for row in rows {
        validate_row(row, sources.iter().chain(targets.iter()).copied())?;
    }

    // Distinct categories, first-seen order
    let mut categories: Vec<&str> = Vec::new();
    let mut category_slot: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        let category = row.category.as_str();
        if !category_slot.contains_key(category) {
            category_slot.insert(category, categories.len());
            categories.push(category);
        }
    }

    let tiers = sources
        .iter()
        .map(|&label| (label, Tier::Source))
        .chain(categories.iter().map(|&label| (label, Tier::Category)))
        .chain(targets.iter().map(|&label| (label, Tier::Target)));

    let mut nodes = Vec::with_capacity(sources.len() + categories.len() + targets.len());
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (label, tier) in tiers {
        if index.insert(label, nodes.len()).is_some() {
            return Err(ApcError::DuplicateLabel {
                label: label.to_string(),
            });
        }
        nodes.push(Node::new(label, tier));
    }

    let category_offset = sources.len();
    let target_offset = sources.len() + categories.len();
    let category_of = |row: &AggregatedRow| category_slot[row.category.as_str()];
    let color_of = |slot: usize| palette[slot % palette.len()].clone();

    let mut edges = Vec::new();

    // Source measures → category
    for row in rows {
        let slot = category_of(row);
        for (i, &measure) in sources.iter().enumerate() {
            let weight = row.value(measure).unwrap_or(0.0);
            if weight > 0.0 {
                edges.push(Edge {
                    source: i,
                    target: category_offset + slot,
                    weight,
                    color: color_of(slot),
                });
            }
        }
    }

    // Category → target measures
    for row in rows {
        let slot = category_of(row);
        for (i, &measure) in targets.iter().enumerate() {
            let weight = row.value(measure).unwrap_or(0.0);
            if weight > 0.0 {
                edges.push(Edge {
                    source: category_offset + slot,
                    target: target_offset + i,
                    weight,
                    color: color_of(slot),
                });
            }
        }
    }

    tracing::debug!(
        rows = rows.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "built flow graph"
    );

    Ok(FlowGraph::new(nodes, edges))
}

fn validate_row<'m>(
    row: &AggregatedRow,
    measures: impl Iterator<Item = &'m str>,
) -> ApcResult<()> {
    if row.category.is_empty() {
        return Err(ApcError::EmptyCategory);
    }
    for measure in measures {
        match row.value(measure) {
            None => {
                return Err(ApcError::MissingMeasure {
                    category: row.category.clone(),
                    measure: measure.to_string(),
                })
            }
            Some(value) if !value.is_finite() || value < 0.0 => {
                return Err(ApcError::InvalidMeasure {
                    category: row.category.clone(),
                    measure: measure.to_string(),
                    value,
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// A reusable builder bound to one measure layout and palette.
#[derive(Debug, Clone)]
pub struct FlowGraphBuilder {
    dimensions: FlowDimensions,
    palette: Vec<Color>,
}

impl FlowGraphBuilder {
    /// Creates a builder.
    pub fn new(dimensions: FlowDimensions, palette: Vec<Color>) -> Self {
        Self {
            dimensions,
            palette,
        }
    }

    /// Gender → cancer category → admission method, in pastel colours.
    pub fn admissions() -> Self {
        Self::new(
            FlowDimensions::admissions(),
            apc_types::well_known::pastel_palette(),
        )
    }

    /// Returns the measure layout.
    pub fn dimensions(&self) -> &FlowDimensions {
        &self.dimensions
    }

    /// Returns the palette.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Builds one graph. See [`build`].
    pub fn build(&self, rows: &[AggregatedRow]) -> ApcResult<FlowGraph> {
        build(
            rows,
            self.dimensions.source_measures.as_slice(),
            self.dimensions.target_measures.as_slice(),
            &self.palette,
        )
    }

    /// Builds one graph per row set, e.g. one per reporting period.
    ///
    /// Results keep the input order. With the `parallel` feature the builds
    /// run on the rayon pool.
    pub fn build_many(&self, row_sets: &[Vec<AggregatedRow>]) -> Vec<ApcResult<FlowGraph>> {
        #[cfg(feature = "parallel")]
        let graphs: Vec<_> = row_sets.par_iter().map(|rows| self.build(rows)).collect();

        #[cfg(not(feature = "parallel"))]
        let graphs: Vec<_> = row_sets.iter().map(|rows| self.build(rows)).collect();

        graphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCES: [&str; 2] = ["Male", "Female"];
    const TARGETS: [&str; 2] = ["Emergency", "Planned"];

    fn row(category: &str, values: [f64; 4]) -> AggregatedRow {
        SOURCES
            .iter()
            .chain(TARGETS.iter())
            .zip(values)
            .fold(AggregatedRow::new(category), |row, (&m, v)| {
                row.with_value(m, v)
            })
    }

    fn palette() -> Vec<Color> {
        vec![Color::new("a"), Color::new("b")]
    }

    fn triples(graph: &FlowGraph) -> Vec<(usize, usize, f64)> {
        graph
            .edges()
            .iter()
            .map(|e| (e.source, e.target, e.weight))
            .collect()
    }

    #[test]
    fn test_node_order_and_edges() {
        let rows = vec![row("Lung", [10.0, 0.0, 10.0, 0.0])];
        let graph = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap();

        let labels: Vec<_> = graph.labels().collect();
        assert_eq!(labels, vec!["Male", "Female", "Lung", "Emergency", "Planned"]);
        assert_eq!(triples(&graph), vec![(0, 2, 10.0), (2, 3, 10.0)]);

        let tiers: Vec<_> = graph.nodes().iter().map(|n| n.tier).collect();
        assert_eq!(
            tiers,
            vec![Tier::Source, Tier::Source, Tier::Category, Tier::Target, Tier::Target]
        );
    }

    #[test]
    fn test_zero_measure_emits_no_edge() {
        let rows = vec![row("Lung", [0.0, 5.0, 0.0, 0.0])];
        let graph = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap();
        assert_eq!(triples(&graph), vec![(1, 2, 5.0)]);
    }

    #[test]
    fn test_shared_category_edges_are_not_merged() {
        let rows = vec![
            row("Lung", [5.0, 0.0, 0.0, 0.0]),
            row("Lung", [3.0, 0.0, 0.0, 0.0]),
        ];
        let graph = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap();

        assert_eq!(graph.nodes().len(), 5);
        assert_eq!(triples(&graph), vec![(0, 2, 5.0), (0, 2, 3.0)]);
    }

    #[test]
    fn test_source_layer_precedes_target_layer() {
        let rows = vec![
            row("Lung", [1.0, 2.0, 3.0, 4.0]),
            row("Breast", [5.0, 6.0, 7.0, 8.0]),
        ];
        let graph = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap();

        assert_eq!(
            triples(&graph),
            vec![
                (0, 2, 1.0),
                (1, 2, 2.0),
                (0, 3, 5.0),
                (1, 3, 6.0),
                (2, 4, 3.0),
                (2, 5, 4.0),
                (3, 4, 7.0),
                (3, 5, 8.0),
            ]
        );
    }

    #[test]
    fn test_colors_follow_first_seen_category() {
        let rows = vec![
            row("Lung", [1.0, 0.0, 1.0, 0.0]),
            row("Breast", [1.0, 0.0, 0.0, 0.0]),
            row("Melanoma", [1.0, 0.0, 0.0, 0.0]),
            row("Lung", [2.0, 0.0, 0.0, 0.0]),
        ];
        let graph = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap();

        let colors: Vec<_> = graph.edges().iter().map(|e| e.color.as_str()).collect();
        // Lung → a, Breast → b, Melanoma wraps to a
        assert_eq!(colors, vec!["a", "b", "a", "a", "a"]);
    }

    #[test]
    fn test_colors_independent_of_values() {
        let first = vec![
            row("Lung", [1.0, 1.0, 1.0, 1.0]),
            row("Breast", [2.0, 2.0, 2.0, 2.0]),
        ];
        let second = vec![
            row("Lung", [9.0, 9.0, 9.0, 9.0]),
            row("Breast", [4.0, 4.0, 4.0, 4.0]),
        ];

        let colors = |rows: &[AggregatedRow]| -> Vec<Color> {
            build(rows, &SOURCES, &TARGETS, &palette())
                .unwrap()
                .edges()
                .iter()
                .map(|e| e.color.clone())
                .collect()
        };
        assert_eq!(colors(&first), colors(&second));
    }

    #[test]
    fn test_empty_rows_give_empty_graph() {
        let graph = build(&[], &SOURCES, &TARGETS, &[]).unwrap();
        assert!(graph.nodes().is_empty());
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_negative_measure_rejected() {
        let rows = vec![
            row("Lung", [1.0, 1.0, 1.0, 1.0]),
            row("Breast", [1.0, -1.0, 1.0, 1.0]),
        ];
        let err = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap_err();
        assert!(matches!(
            err,
            ApcError::InvalidMeasure { ref category, ref measure, value }
                if category == "Breast" && measure == "Female" && value == -1.0
        ));
    }

    #[test]
    fn test_non_finite_measure_rejected() {
        let rows = vec![row("Lung", [1.0, 1.0, f64::NAN, 1.0])];
        let err = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap_err();
        assert!(matches!(err, ApcError::InvalidMeasure { .. }));
    }

    #[test]
    fn test_missing_measure_rejected() {
        let rows = vec![AggregatedRow::new("Lung").with_value("Male", 1.0)];
        let err = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap_err();
        assert!(matches!(
            err,
            ApcError::MissingMeasure { ref measure, .. } if measure == "Female"
        ));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let rows = vec![row("Male", [1.0, 1.0, 1.0, 1.0])];
        let err = build(&rows, &SOURCES, &TARGETS, &palette()).unwrap_err();
        assert!(matches!(err, ApcError::DuplicateLabel { ref label } if label == "Male"));

        let rows = vec![row("Lung", [1.0, 1.0, 1.0, 1.0])];
        let err = build(&rows, &SOURCES, &["Emergency", "Male"], &palette()).unwrap_err();
        assert!(matches!(err, ApcError::DuplicateLabel { ref label } if label == "Male"));
    }

    #[test]
    fn test_empty_category_and_palette_rejected() {
        let rows = vec![row("", [1.0, 1.0, 1.0, 1.0])];
        assert!(matches!(
            build(&rows, &SOURCES, &TARGETS, &palette()),
            Err(ApcError::EmptyCategory)
        ));

        let rows = vec![row("Lung", [1.0, 1.0, 1.0, 1.0])];
        assert!(matches!(
            build(&rows, &SOURCES, &TARGETS, &[]),
            Err(ApcError::EmptyPalette)
        ));
    }

    #[test]
    fn test_builder_build_many() {
        let builder = FlowGraphBuilder::new(FlowDimensions::new(SOURCES, TARGETS), palette());
        let sets = vec![
            vec![row("Lung", [1.0, 0.0, 1.0, 0.0])],
            vec![],
            vec![row("Lung", [-1.0, 0.0, 0.0, 0.0])],
        ];

        let results = builder.build_many(&sets);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().edges().len(), 2);
        assert!(results[1].as_ref().unwrap().is_empty());
        assert!(results[2].is_err());
    }

    #[test]
    fn test_admissions_builder() {
        let builder = FlowGraphBuilder::admissions();
        assert_eq!(builder.dimensions().source_measures.len(), 2);
        assert_eq!(builder.palette().len(), 9);
    }
}
