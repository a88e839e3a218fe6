//! plotly Sankey figure serialization.
//!
//! plotly takes a Sankey diagram as parallel arrays: node labels and colours,
//! and link source/target/value/colour. These are derived from the
//! [`FlowGraph`] edge records at this boundary only.

use std::io::Write;

use apc_types::{Color, FlowGraph};
use serde::Serialize;

/// Node arrays of a Sankey trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNodes {
    /// Labels in node-index order.
    pub label: Vec<String>,
    /// Colours in node-index order.
    pub color: Vec<String>,
}

/// Link arrays of a Sankey trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLinks {
    /// Source node indices.
    pub source: Vec<usize>,
    /// Target node indices.
    pub target: Vec<usize>,
    /// Link weights.
    pub value: Vec<f64>,
    /// Link colours.
    pub color: Vec<String>,
}

/// A plotly `sankey` trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyTrace {
    /// Always `"sankey"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Node arrays.
    pub node: SankeyNodes,
    /// Link arrays.
    pub link: SankeyLinks,
}

impl SankeyTrace {
    /// Converts a graph, colouring nodes by cycling the palette.
    pub fn from_graph(graph: &FlowGraph, palette: &[Color]) -> Self {
        let edges = graph.edges();

        Self {
            kind: "sankey",
            node: SankeyNodes {
                label: graph.labels().map(str::to_string).collect(),
                color: graph
                    .node_colors(palette)
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            },
            link: SankeyLinks {
                source: edges.iter().map(|e| e.source).collect(),
                target: edges.iter().map(|e| e.target).collect(),
                value: edges.iter().map(|e| e.weight).collect(),
                color: edges.iter().map(|e| e.color.as_str().to_string()).collect(),
            },
        }
    }
}

/// Title block of a figure layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// Title text.
    pub text: String,
}

/// Font block of a figure layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    /// Font size in points.
    pub size: u32,
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Figure title.
    pub title: Title,
    /// Base font.
    pub font: Font,
}

/// A complete plotly figure holding one Sankey trace.
///
/// # Example
///
/// ```
/// use apc_sankey::SankeyFigure;
/// use apc_types::{well_known, FlowGraph};
///
/// let figure = SankeyFigure::new(&FlowGraph::empty(), &well_known::pastel_palette(), "Empty");
/// let json = serde_json::to_value(&figure).unwrap();
/// assert_eq!(json["data"][0]["type"], "sankey");
/// assert_eq!(json["layout"]["title"]["text"], "Empty");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyFigure {
    /// Traces; always exactly one.
    pub data: Vec<SankeyTrace>,
    /// Layout.
    pub layout: Layout,
}

impl SankeyFigure {
    /// Font size used for figure text.
    pub const FONT_SIZE: u32 = 10;

    /// Wraps a graph in a titled figure.
    pub fn new(graph: &FlowGraph, palette: &[Color], title: impl Into<String>) -> Self {
        Self {
            data: vec![SankeyTrace::from_graph(graph, palette)],
            layout: Layout {
                title: Title { text: title.into() },
                font: Font {
                    size: Self::FONT_SIZE,
                },
            },
        }
    }

    /// Writes the figure as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}
