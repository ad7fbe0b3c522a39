pub mod annotate;
pub mod config;
pub mod error;
pub mod model;
pub mod persist;
pub mod shapes;
pub mod table;
pub mod geometry {
    pub mod intersect;
    pub mod limits;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod boundaries;
    pub mod components;
    pub mod projection;
}
mod json;
mod svg;

pub use algorithms::components::Components;
pub use config::ProjectionOptions;
pub use error::{DualGraphError, Result};
pub use model::{Attrs, Crs, Edge, EdgeId, KeyPair, Node, NodeId, Value};
pub use shapes::{ShapeRecord, ShapeTable};
pub use table::EdgeTable;

use std::collections::HashMap;

/// Undirected dual graph: nodes are regions, edges are adjacencies.
///
/// Node and edge ids are slot indices; iteration is in ascending id order, which
/// makes lookup and traversal deterministic. No parallel edges, no self-loops.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Option<Node>>,            // id is index
    pub(crate) edges: Vec<Option<Edge>>,            // id is index
    pub(crate) adjacency: Vec<Vec<NodeId>>,         // by node id, insertion order
    pub(crate) edge_index: HashMap<(NodeId, NodeId), EdgeId>, // (min, max) -> edge
}

#[inline]
fn canon(u: NodeId, v: NodeId) -> (NodeId, NodeId) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    // Nodes
    pub fn add_node(&mut self, attrs: Attrs) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.add_named_node(Value::from(id), attrs)
    }
    pub fn add_named_node(&mut self, name: Value, attrs: Attrs) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Some(Node { name, attrs }));
        self.adjacency.push(Vec::new());
        id
    }
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize).and_then(|n| n.as_ref())
    }
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id as usize).and_then(|n| n.as_mut())
    }
    pub fn node_attr(&self, id: NodeId, attr: &str) -> Option<&Value> {
        self.node(id).and_then(|n| n.attrs.get(attr))
    }
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (i as NodeId, n)))
    }
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().map(|(id, _)| id)
    }
    pub fn node_count(&self) -> u32 {
        self.nodes.iter().filter(|n| n.is_some()).count() as u32
    }
    pub(crate) fn node_slots(&self) -> usize {
        self.nodes.len()
    }

    // Edges
    /// Adds the undirected edge `u`-`v`, or returns the existing one.
    /// `None` for self-loops and unknown endpoints.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        if u == v || self.node(u).is_none() || self.node(v).is_none() {
            return None;
        }
        if let Some(&id) = self.edge_index.get(&canon(u, v)) {
            return Some(id);
        }
        let id = self.edges.len() as EdgeId;
        self.edges.push(Some(Edge {
            u,
            v,
            attrs: Attrs::new(),
        }));
        self.edge_index.insert(canon(u, v), id);
        self.adjacency[u as usize].push(v);
        self.adjacency[v as usize].push(u);
        Some(id)
    }
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let id = match self.edge_index.remove(&canon(u, v)) {
            Some(id) => id,
            None => return false,
        };
        if let Some(slot) = self.edges.get_mut(id as usize) {
            *slot = None;
        }
        self.adjacency[u as usize].retain(|&n| n != v);
        self.adjacency[v as usize].retain(|&n| n != u);
        true
    }
    pub fn find_edge(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        self.edge_index.get(&canon(u, v)).copied()
    }
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edge_index.contains_key(&canon(u, v))
    }
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id as usize).and_then(|e| e.as_ref())
    }
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id as usize).and_then(|e| e.as_mut())
    }
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i as EdgeId, e)))
    }
    pub fn edge_count(&self) -> u32 {
        self.edge_index.len() as u32
    }
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(id as usize)
            .into_iter()
            .flat_map(|adj| adj.iter().copied())
    }

    // Lookup by attribute
    /// First node, in id order, whose `attr` equals `target`.
    ///
    /// Attribute values used this way are expected to be unique across nodes.
    pub fn find_node_by_attr(&self, attr: &str, target: &Value) -> Option<NodeId> {
        self.nodes()
            .find(|(_, n)| n.attrs.get(attr) == Some(target))
            .map(|(id, _)| id)
    }

    fn resolve_pair(&self, u_val: &Value, v_val: &Value, attr: &str) -> Result<(NodeId, NodeId)> {
        let u = self
            .find_node_by_attr(attr, u_val)
            .ok_or_else(|| DualGraphError::lookup(attr, u_val, 0))?;
        let v = self
            .find_node_by_attr(attr, v_val)
            .ok_or_else(|| DualGraphError::lookup(attr, v_val, 0))?;
        Ok((u, v))
    }

    /// Adds an edge between the nodes whose `attr` equals `u_val` and `v_val`.
    /// Returns whether the graph changed; an existing edge is left as is.
    pub fn add_edge_by_attr(
        &mut self,
        u_val: impl Into<Value>,
        v_val: impl Into<Value>,
        attr: &str,
    ) -> Result<bool> {
        let (u, v) = self.resolve_pair(&u_val.into(), &v_val.into(), attr)?;
        if u == v {
            return Err(DualGraphError::SelfLoop(u));
        }
        let existed = self.has_edge(u, v);
        self.add_edge(u, v);
        if !existed {
            log::debug!("added edge {}-{} by {}", u, v, attr);
        }
        Ok(!existed)
    }

    /// Removes the edge between the nodes whose `attr` equals `u_val` and `v_val`.
    /// A missing edge is a no-op; unresolved values are an error.
    pub fn remove_edge_by_attr(
        &mut self,
        u_val: impl Into<Value>,
        v_val: impl Into<Value>,
        attr: &str,
    ) -> Result<bool> {
        let (u, v) = self.resolve_pair(&u_val.into(), &v_val.into(), attr)?;
        let removed = self.remove_edge(u, v);
        if removed {
            log::debug!("removed edge {}-{} by {}", u, v, attr);
        }
        Ok(removed)
    }

    // JSON
    /// Reads a networkx adjacency (or node-link) document.
    pub fn from_json_value(v: serde_json::Value) -> Result<Graph> {
        json::from_json_impl(v)
    }
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }
}

impl EdgeTable {
    /// One `M x -y L x -y` path per row, for quick rendering.
    pub fn to_svg_paths(&self) -> Vec<String> {
        svg::to_svg_paths_impl(self)
    }
}
