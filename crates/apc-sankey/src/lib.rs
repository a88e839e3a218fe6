//! # apc-sankey
//!
//! Builds plotly Sankey figures from NHS England admitted patient care
//! exports.
//!
//! This crate wires the [`apc_loader`] pipeline to environment settings and
//! serializes the resulting flow graph as a plotly figure.

#![warn(missing_docs)]

mod pipeline;
mod plotly;
mod settings;

pub use pipeline::{run, PipelineReport};
pub use plotly::{Font, Layout, SankeyFigure, SankeyLinks, SankeyNodes, SankeyTrace, Title};
pub use settings::{InputKind, Settings, SettingsError};
