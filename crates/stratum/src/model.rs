//! Node and edge data carried through the layout passes, plus geometry primitives.
//!
//! Callers fill in sizes and constraints; the passes use the remaining fields as scratch space on
//! the working graph and `layout` copies the results back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Kind of a synthetic node. Real nodes carry no tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dummy {
    /// Subgraph border: top/bottom from nesting, left/right per-rank segments.
    Border,
    /// Interior point of a long edge.
    Edge,
    /// Interior point of a long edge that also carries the edge label.
    EdgeLabel,
    /// Rank placeholder for an edge label, only alive during ranking.
    EdgeProxy,
    /// Space reserved for a self-loop next to its node.
    SelfEdge,
    /// The nesting root.
    Root,
}

impl Dummy {
    pub fn as_str(self) -> &'static str {
        match self {
            Dummy::Border => "border",
            Dummy::Edge => "edge",
            Dummy::EdgeLabel => "edge-label",
            Dummy::EdgeProxy => "edge-proxy",
            Dummy::SelfEdge => "selfedge",
            Dummy::Root => "root",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelPos {
    #[serde(rename = "l")]
    L,
    #[serde(rename = "c")]
    C,
    #[default]
    #[serde(rename = "r")]
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Left,
    Right,
}

/// A self-loop parked on its node while the rest of the graph is laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub id: String,
    pub label: EdgeLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    /// Requested layer, honoured as far as edge lengths allow.
    pub layer: Option<u32>,
    pub dummy: Option<Dummy>,
    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    /// Left/right border segments, indexed by `rank - min_rank`.
    pub border_left: Vec<String>,
    pub border_right: Vec<String>,
    pub border_side: Option<BorderSide>,
    /// Edge this dummy belongs to.
    pub edge_id: Option<String>,
    /// Original edge data, kept on the first dummy of a chain and on self-edge dummies.
    pub edge_label: Option<EdgeLabel>,
    pub labelpos: Option<LabelPos>,
    pub self_edges: Vec<SelfEdge>,
}

impl Default for NodeLabel {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            x: None,
            y: None,
            rank: None,
            order: None,
            layer: None,
            dummy: None,
            min_rank: None,
            max_rank: None,
            border_top: None,
            border_bottom: None,
            border_left: Vec::new(),
            border_right: Vec::new(),
            border_side: None,
            edge_id: None,
            edge_label: None,
            labelpos: None,
            self_edges: Vec::new(),
        }
    }
}

impl NodeLabel {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }
}

/// Largest `minlen` [`crate::layout`] accepts.
pub const MAX_MINLEN: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub weight: f64,
    /// At most [`MAX_MINLEN`].
    pub minlen: usize,
    /// Label box; a zero-sized label takes no space.
    pub width: f64,
    pub height: f64,
    pub labelpos: LabelPos,
    pub labeloffset: f64,
    pub label_rank: Option<i32>,
    /// Label center after layout.
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,
    pub reversed: bool,
    /// Constraint edge added by the nesting pass.
    pub nesting: bool,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            weight: 1.0,
            minlen: 1,
            width: 0.0,
            height: 0.0,
            labelpos: LabelPos::R,
            labeloffset: 10.0,
            label_rank: None,
            x: None,
            y: None,
            points: Vec::new(),
            reversed: false,
            nesting: false,
        }
    }
}

impl EdgeLabel {
    pub fn new(weight: f64, minlen: usize) -> Self {
        Self {
            weight,
            minlen,
            ..Default::default()
        }
    }

    pub fn has_label(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Size of the finished drawing, margins included.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutExtent {
    pub width: f64,
    pub height: f64,
}
