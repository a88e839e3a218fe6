//! Flow graph types.
//!
//! A [`FlowGraph`] is a weighted directed multigraph laid out in three tiers:
//! source measures, categories, and target measures. Edges refer to nodes by
//! index into the node sequence and are never merged, so two edges may join
//! the same pair of nodes.

use std::fmt;

/// The tier a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tier {
    /// Source-dimension measure (e.g. `Male`).
    Source,
    /// Category label (e.g. `Lung Cancer`).
    Category,
    /// Target-dimension measure (e.g. `Emergency`).
    Target,
}

/// A colour string in whatever notation the renderer accepts.
///
/// # Examples
///
/// ```
/// use apc_types::Color;
///
/// let color = Color::new("rgba(255,179,186,0.7)");
/// assert_eq!(color.as_str(), "rgba(255,179,186,0.7)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Color(String);

impl Color {
    /// Wraps a colour string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the colour string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A labelled node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Display label, unique within the graph.
    pub label: String,
    /// Tier the node sits in.
    pub tier: Tier,
}

impl Node {
    /// Creates a node.
    pub fn new(label: impl Into<String>, tier: Tier) -> Self {
        Self {
            label: label.into(),
            tier,
        }
    }
}

/// A weighted, coloured edge between two node indices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Index of the source node.
    pub source: usize,
    /// Index of the target node.
    pub target: usize,
    /// Flow quantity, never negative.
    pub weight: f64,
    /// Colour of the category this edge touches.
    pub color: Color,
}

/// Nodes and edges of a two-level flow diagram.
///
/// # Examples
///
/// ```
/// use apc_types::{Color, Edge, FlowGraph, Node, Tier};
///
/// let graph = FlowGraph::new(
///     vec![Node::new("Male", Tier::Source), Node::new("Melanoma", Tier::Category)],
///     vec![Edge { source: 0, target: 1, weight: 4.0, color: Color::new("red") }],
/// );
///
/// assert_eq!(graph.index_of("Melanoma"), Some(1));
/// assert_eq!(graph.total_weight(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl FlowGraph {
    /// Creates a graph from parts.
    ///
    /// Every edge must reference an index inside `nodes`.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        debug_assert!(edges
            .iter()
            .all(|e| e.source < nodes.len() && e.target < nodes.len()));
        Self { nodes, edges }
    }

    /// The graph with no nodes and no edges.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in index order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in emission order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the node at an index.
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Node labels in index order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.label.as_str())
    }

    /// Returns the index of the node with the given label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.label == label)
    }

    /// Nodes belonging to one tier, in index order.
    pub fn nodes_in(&self, tier: Tier) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.tier == tier)
    }

    /// Edges leaving a node.
    pub fn edges_from(&self, index: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.source == index)
    }

    /// Edges entering a node.
    pub fn edges_into(&self, index: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.target == index)
    }

    /// Sum of all edge weights.
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Node colours formed by repeating the palette over the node sequence.
    ///
    /// Returns an empty list for an empty palette.
    pub fn node_colors(&self, palette: &[Color]) -> Vec<Color> {
        if palette.is_empty() {
            return Vec::new();
        }
        (0..self.nodes.len())
            .map(|i| palette[i % palette.len()].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: usize, target: usize, weight: f64) -> Edge {
        Edge {
            source,
            target,
            weight,
            color: Color::new("c"),
        }
    }

    fn sample() -> FlowGraph {
        FlowGraph::new(
            vec![
                Node::new("Male", Tier::Source),
                Node::new("Female", Tier::Source),
                Node::new("Lung Cancer", Tier::Category),
                Node::new("Emergency", Tier::Target),
            ],
            vec![edge(0, 2, 5.0), edge(1, 2, 3.0), edge(0, 2, 2.0), edge(2, 3, 10.0)],
        )
    }

    #[test]
    fn test_lookups() {
        let graph = sample();
        assert_eq!(graph.index_of("Emergency"), Some(3));
        assert_eq!(graph.index_of("Planned"), None);
        assert_eq!(graph.node(2).map(|n| n.tier), Some(Tier::Category));
        assert_eq!(
            graph.labels().collect::<Vec<_>>(),
            vec!["Male", "Female", "Lung Cancer", "Emergency"]
        );
        assert_eq!(graph.nodes_in(Tier::Source).count(), 2);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let graph = sample();
        assert_eq!(graph.edges_from(0).count(), 2);
        assert_eq!(graph.edges_into(2).count(), 3);
        assert_eq!(graph.edges_from(2).count(), 1);
        assert_eq!(graph.total_weight(), 20.0);
    }

    #[test]
    fn test_node_colors_cycle() {
        let graph = sample();
        let palette = [Color::new("a"), Color::new("b"), Color::new("c")];
        let colors = graph.node_colors(&palette);
        let names: Vec<_> = colors.iter().map(Color::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c", "a"]);
        assert!(graph.node_colors(&[]).is_empty());
    }

    #[test]
    fn test_empty() {
        let graph = FlowGraph::empty();
        assert!(graph.is_empty());
        assert!(graph.edges().is_empty());
        assert_eq!(graph.total_weight(), 0.0);
    }
}
