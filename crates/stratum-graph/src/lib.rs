//! Directed multigraph with a containment forest.
//!
//! This is the working graph the `stratum` layout passes mutate: string node ids, edges keyed by
//! their own ids (parallel edges and self-loops allowed) and an optional parent per node.

#![forbid(unsafe_code)]

pub mod alg;
mod error;
mod graph;

pub use error::{GraphError, Result};
pub use graph::{Direction, EdgeRef, Graph};
