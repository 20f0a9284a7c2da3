//! The `Graph` container.
//!
//! Nodes and edges live in insertion-ordered maps keyed by their string ids, so every traversal
//! is deterministic. Two independent indices sit on top of that storage: the adjacency index
//! (per-node in/out edge id lists) and the forest index (parent pointer plus ordered children).
//! Mutating one never touches the other.

use crate::error::{GraphError, Result};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type OrderedMap<K, V> = IndexMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    Both,
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    data: N,
    in_edges: Vec<String>,
    out_edges: Vec<String>,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    source: String,
    target: String,
    data: E,
}

/// Borrowed view of one edge.
#[derive(Debug)]
pub struct EdgeRef<'a, E> {
    pub id: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub data: &'a E,
}

impl<E> Clone for EdgeRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EdgeRef<'_, E> {}

#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: OrderedMap<String, NodeEntry<N>>,
    edges: OrderedMap<String, EdgeEntry<E>>,
    parent: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,
    next_id: usize,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self {
            nodes: OrderedMap::default(),
            edges: OrderedMap::default(),
            parent: HashMap::default(),
            children: HashMap::default(),
            next_id: 0,
        }
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- nodes ----

    /// Inserts a node, or replaces the data of an existing one (its edges and parent are kept).
    pub fn add_node(&mut self, id: impl Into<String>, data: N) -> &mut Self {
        let id = id.into();
        match self.nodes.get_mut(&id) {
            Some(entry) => entry.data = data,
            None => {
                self.nodes.insert(
                    id,
                    NodeEntry {
                        data,
                        in_edges: Vec::new(),
                        out_edges: Vec::new(),
                    },
                );
            }
        }
        self
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id).map(|n| &n.data)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.nodes.get_mut(id).map(|n| &mut n.data)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (&str, &N)> {
        self.nodes.iter().map(|(id, n)| (id.as_str(), &n.data))
    }

    pub fn iter_nodes_mut(&mut self) -> impl Iterator<Item = (&str, &mut N)> {
        self.nodes
            .iter_mut()
            .map(|(id, n)| (id.as_str(), &mut n.data))
    }

    /// Removes a node together with its incident edges. Its children become top-level nodes.
    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let entry = self.nodes.shift_remove(id)?;
        for eid in entry.in_edges.iter().chain(entry.out_edges.iter()) {
            if let Some(edge) = self.edges.shift_remove(eid) {
                self.unlink_edge(eid, &edge.source, &edge.target);
            }
        }
        self.detach(id);
        if let Some(children) = self.children.remove(id) {
            for child in children {
                self.parent.remove(&child);
            }
        }
        Some(entry.data)
    }

    /// Returns an id starting with `prefix` that is not used by any node yet.
    pub fn unique_node_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("{prefix}{}", self.next_id);
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    // ---- edges ----

    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source: &str,
        target: &str,
        data: E,
    ) -> Result<()> {
        let id = id.into();
        for endpoint in [source, target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::MissingNode {
                    id: endpoint.to_string(),
                });
            }
        }
        if self.edges.contains_key(&id) {
            return Err(GraphError::DuplicateEdge { id });
        }
        if let Some(n) = self.nodes.get_mut(source) {
            n.out_edges.push(id.clone());
        }
        if let Some(n) = self.nodes.get_mut(target) {
            n.in_edges.push(id.clone());
        }
        self.edges.insert(
            id,
            EdgeEntry {
                source: source.to_string(),
                target: target.to_string(),
                data,
            },
        );
        Ok(())
    }

    /// Adds an edge under a freshly generated id and returns that id.
    pub fn add_edge_auto(&mut self, source: &str, target: &str, data: E) -> Result<String> {
        let id = loop {
            self.next_id += 1;
            let candidate = format!("_e{}", self.next_id);
            if !self.edges.contains_key(&candidate) {
                break candidate;
            }
        };
        self.add_edge(id.clone(), source, target, data)?;
        Ok(id)
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn edge(&self, id: &str) -> Option<&E> {
        self.edges.get(id).map(|e| &e.data)
    }

    pub fn edge_mut(&mut self, id: &str) -> Option<&mut E> {
        self.edges.get_mut(id).map(|e| &mut e.data)
    }

    pub fn edge_ref(&self, id: &str) -> Option<EdgeRef<'_, E>> {
        self.edges.get_key_value(id).map(|(id, e)| EdgeRef {
            id: id.as_str(),
            source: e.source.as_str(),
            target: e.target.as_str(),
            data: &e.data,
        })
    }

    pub fn endpoints(&self, id: &str) -> Option<(&str, &str)> {
        self.edges
            .get(id)
            .map(|e| (e.source.as_str(), e.target.as_str()))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, E>> {
        self.edges.iter().map(|(id, e)| EdgeRef {
            id: id.as_str(),
            source: e.source.as_str(),
            target: e.target.as_str(),
            data: &e.data,
        })
    }

    pub fn edge_ids(&self) -> Vec<String> {
        self.edges.keys().cloned().collect()
    }

    pub fn iter_edges_mut(&mut self) -> impl Iterator<Item = (&str, &mut E)> {
        self.edges
            .iter_mut()
            .map(|(id, e)| (id.as_str(), &mut e.data))
    }

    pub fn remove_edge(&mut self, id: &str) -> Option<E> {
        let edge = self.edges.shift_remove(id)?;
        self.unlink_edge(id, &edge.source, &edge.target);
        Some(edge.data)
    }

    /// Swaps the endpoints of an edge in place. The id and data are kept.
    pub fn reverse_edge(&mut self, id: &str) -> bool {
        let Some(edge) = self.edges.get_mut(id) else {
            return false;
        };
        std::mem::swap(&mut edge.source, &mut edge.target);
        let (source, target) = (edge.source.clone(), edge.target.clone());
        if source == target {
            return true;
        }
        // Old source is now the target and vice versa.
        self.unlink_edge(id, &target, &source);
        if let Some(n) = self.nodes.get_mut(&source) {
            n.out_edges.push(id.to_string());
        }
        if let Some(n) = self.nodes.get_mut(&target) {
            n.in_edges.push(id.to_string());
        }
        true
    }

    fn unlink_edge(&mut self, id: &str, source: &str, target: &str) {
        if let Some(n) = self.nodes.get_mut(source) {
            n.out_edges.retain(|e| e != id);
        }
        if let Some(n) = self.nodes.get_mut(target) {
            n.in_edges.retain(|e| e != id);
        }
    }

    // ---- adjacency ----

    pub fn in_edges<'a>(
        &'a self,
        id: &str,
    ) -> impl Iterator<Item = EdgeRef<'a, E>> + use<'a, N, E> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|n| n.in_edges.iter())
            .filter_map(move |eid| self.edge_ref(eid))
    }

    pub fn out_edges<'a>(
        &'a self,
        id: &str,
    ) -> impl Iterator<Item = EdgeRef<'a, E>> + use<'a, N, E> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|n| n.out_edges.iter())
            .filter_map(move |eid| self.edge_ref(eid))
    }

    pub fn related_edges(&self, id: &str, direction: Direction) -> Vec<EdgeRef<'_, E>> {
        match direction {
            Direction::In => self.in_edges(id).collect(),
            Direction::Out => self.out_edges(id).collect(),
            Direction::Both => {
                let mut out: Vec<EdgeRef<'_, E>> = self.out_edges(id).collect();
                // A self-loop is already listed as an out-edge.
                out.extend(self.in_edges(id).filter(|e| e.source != e.target));
                out
            }
        }
    }

    pub fn successors(&self, id: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for e in self.out_edges(id) {
            if !out.contains(&e.target) {
                out.push(e.target);
            }
        }
        out
    }

    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for e in self.in_edges(id) {
            if !out.contains(&e.source) {
                out.push(e.source);
            }
        }
        out
    }

    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let mut out = self.successors(id);
        for v in self.predecessors(id) {
            if !out.contains(&v) {
                out.push(v);
            }
        }
        out
    }

    /// Ids of every edge going from `source` to `target`.
    pub fn edges_between(&self, source: &str, target: &str) -> Vec<&str> {
        self.out_edges(source)
            .filter(|e| e.target == target)
            .map(|e| e.id)
            .collect()
    }

    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.in_edges.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.out_edges.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    // ---- forest ----

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.parent.get(id).map(String::as_str)
    }

    /// Moves `id` under `parent`, or to the top level when `parent` is `None`.
    pub fn set_parent(&mut self, id: &str, parent: Option<&str>) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(GraphError::MissingNode { id: id.to_string() });
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(p) {
                return Err(GraphError::MissingNode { id: p.to_string() });
            }
            let mut cursor = Some(p);
            while let Some(c) = cursor {
                if c == id {
                    return Err(GraphError::ParentCycle {
                        node: id.to_string(),
                        parent: p.to_string(),
                    });
                }
                cursor = self.parent(c);
            }
        }

        self.detach(id);
        if let Some(p) = parent {
            self.parent.insert(id.to_string(), p.to_string());
            self.children
                .entry(p.to_string())
                .or_default()
                .push(id.to_string());
        }
        Ok(())
    }

    fn detach(&mut self, id: &str) {
        if let Some(prev) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(&prev) {
                siblings.retain(|c| c != id);
                if siblings.is_empty() {
                    self.children.remove(&prev);
                }
            }
        }
    }

    pub fn children<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a, N, E> {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.children.get(id).is_some_and(|c| !c.is_empty())
    }

    /// Nodes without a parent, in insertion order.
    pub fn top_level(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .keys()
            .filter(|id| !self.parent.contains_key(id.as_str()))
            .map(String::as_str)
    }

    /// Parent, grandparent, ... up to the top level.
    pub fn ancestors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + use<'a, N, E> {
        let mut cursor = self.parent(id);
        std::iter::from_fn(move || {
            let current = cursor?;
            cursor = self.parent(current);
            Some(current)
        })
    }

    /// Number of ancestors; top-level nodes have depth 0.
    pub fn depth(&self, id: &str) -> usize {
        self.ancestors(id).count()
    }
}
