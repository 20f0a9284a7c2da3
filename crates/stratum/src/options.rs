//! Layout options and their serializable configuration form.

use crate::error::{Error, Result};
use crate::model::NodeLabel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::LR | RankDir::RL)
    }
}

/// One of the four Brandes–Köpf alignments: vertical direction (up/down) then horizontal bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

impl Align {
    pub const ALL: [Align; 4] = [Align::UL, Align::UR, Align::DL, Align::DR];

    pub fn is_up(self) -> bool {
        matches!(self, Align::UL | Align::UR)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Align::UL | Align::DL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acyclicer {
    /// Weighted greedy feedback arc set.
    Greedy,
    /// Reverse the back edges of a depth-first search.
    #[default]
    Dfs,
}

pub type SeparationFn = Arc<dyn Fn(&str, &NodeLabel) -> f64 + Send + Sync>;

/// A separation distance, either global or computed per node.
#[derive(Clone)]
pub enum Separation {
    Fixed(f64),
    PerNode(SeparationFn),
}

impl Separation {
    pub fn per_node(f: impl Fn(&str, &NodeLabel) -> f64 + Send + Sync + 'static) -> Self {
        Separation::PerNode(Arc::new(f))
    }

    /// Separation for one node. Non-finite or negative results count as zero.
    pub fn resolve(&self, id: &str, node: &NodeLabel) -> f64 {
        let value = match self {
            Separation::Fixed(v) => *v,
            Separation::PerNode(f) => f(id, node),
        };
        if value.is_finite() { value.max(0.0) } else { 0.0 }
    }

    pub fn fixed(&self) -> Option<f64> {
        match self {
            Separation::Fixed(v) => Some(*v),
            Separation::PerNode(_) => None,
        }
    }
}

impl fmt::Debug for Separation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separation::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Separation::PerNode(_) => f.write_str("PerNode(..)"),
        }
    }
}

impl From<f64> for Separation {
    fn from(value: f64) -> Self {
        Separation::Fixed(value)
    }
}

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub rankdir: RankDir,
    /// Keep a single Brandes–Köpf alignment instead of balancing all four.
    pub align: Option<Align>,
    pub nodesep: Separation,
    pub ranksep: Separation,
    pub edgesep: f64,
    pub marginx: f64,
    pub marginy: f64,
    /// Reserve a rank between every pair of real ranks for edge labels.
    pub edge_label_space: bool,
    pub keep_node_order: bool,
    pub node_order: Vec<String>,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,
    /// Keep every bend point; when false, collinear points are dropped.
    pub control_points: bool,
    /// Run Brandes–Köpf alignment; when false, ranks are packed left to right.
    pub straighten: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            nodesep: Separation::Fixed(50.0),
            ranksep: Separation::Fixed(50.0),
            edgesep: 20.0,
            marginx: 0.0,
            marginy: 0.0,
            edge_label_space: true,
            keep_node_order: false,
            node_order: Vec::new(),
            acyclicer: Acyclicer::Dfs,
            ranker: Ranker::NetworkSimplex,
            control_points: true,
            straighten: true,
        }
    }
}

impl LayoutOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        let opts = LayoutOptions::from(config);
        opts.validate()?;
        Ok(opts)
    }

    /// Checks the graph-independent options.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("nodesep", self.nodesep.fixed()),
            ("ranksep", self.ranksep.fixed()),
            ("edgesep", Some(self.edgesep)),
            ("marginx", Some(self.marginx)),
            ("marginy", Some(self.marginy)),
        ];
        for (name, value) in named {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::InvalidConfig {
                        message: format!("{name} must be a finite non-negative number, got {v}"),
                    });
                }
            }
        }

        let mut seen = rustc_hash::FxHashSet::default();
        for id in &self.node_order {
            if !seen.insert(id.as_str()) {
                return Err(Error::InvalidConfig {
                    message: format!("node order lists {id} more than once"),
                });
            }
        }
        Ok(())
    }
}

/// Plain-data form of [`LayoutOptions`], suitable for JSON configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub rankdir: RankDir,
    pub align: Option<Align>,
    pub nodesep: f64,
    pub ranksep: f64,
    pub edgesep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub edge_label_space: bool,
    pub keep_node_order: bool,
    pub node_order: Vec<String>,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,
    pub control_points: bool,
    pub straighten: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let opts = LayoutOptions::default();
        Self {
            rankdir: opts.rankdir,
            align: opts.align,
            nodesep: 50.0,
            ranksep: 50.0,
            edgesep: opts.edgesep,
            marginx: opts.marginx,
            marginy: opts.marginy,
            edge_label_space: opts.edge_label_space,
            keep_node_order: opts.keep_node_order,
            node_order: opts.node_order,
            acyclicer: opts.acyclicer,
            ranker: opts.ranker,
            control_points: opts.control_points,
            straighten: opts.straighten,
        }
    }
}

impl From<LayoutConfig> for LayoutOptions {
    fn from(c: LayoutConfig) -> Self {
        Self {
            rankdir: c.rankdir,
            align: c.align,
            nodesep: Separation::Fixed(c.nodesep),
            ranksep: Separation::Fixed(c.ranksep),
            edgesep: c.edgesep,
            marginx: c.marginx,
            marginy: c.marginy,
            edge_label_space: c.edge_label_space,
            keep_node_order: c.keep_node_order,
            node_order: c.node_order,
            acyclicer: c.acyclicer,
            ranker: c.ranker,
            control_points: c.control_points,
            straighten: c.straighten,
        }
    }
}
