//! Layered (Sugiyama-style) layout for directed graphs, including compound graphs.
//!
//! [`layout`] runs the whole pipeline on a [`LayoutGraph`]: cycle breaking, nesting expansion,
//! ranking, crossing minimization and coordinate assignment. The individual passes are public so
//! they can be exercised (and benchmarked) on their own.

#![forbid(unsafe_code)]

pub use stratum_graph as graph;

pub mod acyclic;
pub mod add_border_segments;
pub mod coordinate_system;
mod error;
pub mod greedy_fas;
pub mod model;
pub mod nesting;
pub mod normalize;
pub mod options;
pub mod order;
pub mod parent_dummy_chains;
mod pipeline;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

pub use error::{Error, Result};
pub use model::{
    BorderSide, Dummy, EdgeLabel, LabelPos, LayoutExtent, MAX_MINLEN, NodeLabel, Point, SelfEdge,
};
pub use options::{
    Acyclicer, Align, LayoutConfig, LayoutOptions, RankDir, Ranker, Separation, SeparationFn,
};
pub use pipeline::layout;

/// The graph every pass works on.
pub type LayoutGraph = stratum_graph::Graph<NodeLabel, EdgeLabel>;
