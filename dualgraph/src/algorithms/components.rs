use std::collections::{HashMap, VecDeque};

use crate::error::{DualGraphError, Result};
use crate::model::{EdgeId, NodeId, Value};
use crate::shapes::ShapeTable;
use crate::Graph;

/// Component label of one edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeLabel {
    pub edge: EdgeId,
    pub component: usize,
    pub in_largest: bool,
}

/// Connected-component partition of a graph.
///
/// Components are numbered in discovery order: a breadth-first sweep seeded
/// from nodes in ascending id order. The largest component is the one with the
/// most nodes; on ties, the first discovered.
#[derive(Clone, Debug)]
pub struct Components {
    labels: Vec<Option<usize>>, // by node slot
    members: Vec<Vec<NodeId>>,  // traversal order
    largest: Option<usize>,
}

pub fn connected_components(g: &Graph) -> Components {
    let mut labels: Vec<Option<usize>> = vec![None; g.node_slots()];
    let mut members: Vec<Vec<NodeId>> = Vec::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for seed in g.node_ids() {
        if labels[seed as usize].is_some() {
            continue;
        }
        let comp = members.len();
        let mut nodes = Vec::new();
        labels[seed as usize] = Some(comp);
        queue.push_back(seed);
        while let Some(n) = queue.pop_front() {
            nodes.push(n);
            for m in g.neighbors(n) {
                let slot = &mut labels[m as usize];
                if slot.is_none() {
                    *slot = Some(comp);
                    queue.push_back(m);
                }
            }
        }
        members.push(nodes);
    }
    let mut largest: Option<usize> = None;
    for (i, m) in members.iter().enumerate() {
        if largest.map_or(true, |l| m.len() > members[l].len()) {
            largest = Some(i);
        }
    }
    let comps = Components {
        labels,
        members,
        largest,
    };
    log::info!("component sizes: {:?}", comps.sizes());
    comps
}

impl Components {
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn sizes(&self) -> Vec<usize> {
        self.members.iter().map(|m| m.len()).collect()
    }
    pub fn members(&self, component: usize) -> &[NodeId] {
        self.members.get(component).map(|m| m.as_slice()).unwrap_or(&[])
    }
    /// Index of the largest component; `None` only for an empty graph.
    pub fn largest(&self) -> Option<usize> {
        self.largest
    }
    pub fn component_of(&self, node: NodeId) -> Option<usize> {
        self.labels.get(node as usize).copied().flatten()
    }
    pub fn is_largest(&self, node: NodeId) -> bool {
        self.largest.is_some() && self.component_of(node) == self.largest
    }

    /// Label of every edge, in graph edge order. Both endpoints share a component.
    pub fn edge_labels(&self, g: &Graph) -> Vec<EdgeLabel> {
        g.edges()
            .filter_map(|(id, e)| {
                self.component_of(e.u).map(|c| EdgeLabel {
                    edge: id,
                    component: c,
                    in_largest: Some(c) == self.largest,
                })
            })
            .collect()
    }

    /// Nodes outside the largest component, component by component.
    pub fn problem_nodes(&self) -> Vec<NodeId> {
        self.members
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.largest)
            .flat_map(|(_, m)| m.iter().copied())
            .collect()
    }

    /// `key` values of every node outside the largest component.
    pub fn problem_keys(&self, g: &Graph, key: &str) -> Result<Vec<Value>> {
        self.problem_nodes()
            .into_iter()
            .map(|n| {
                g.node_attr(n, key)
                    .cloned()
                    .ok_or_else(|| DualGraphError::MissingAttribute {
                        node: n,
                        attr: key.to_string(),
                    })
            })
            .collect()
    }

    fn key_labels<'g>(&self, g: &'g Graph, key: &str) -> HashMap<&'g Value, usize> {
        g.nodes()
            .filter_map(|(id, n)| Some((n.attrs.get(key)?, self.component_of(id)?)))
            .collect()
    }

    /// Component of each shape record, in shape order, joined on `key`.
    /// `None` for shapes no node refers to.
    pub fn shape_labels(&self, g: &Graph, shapes: &ShapeTable, key: &str) -> Vec<Option<usize>> {
        let by_key = self.key_labels(g, key);
        shapes
            .records()
            .iter()
            .map(|r| r.attr(key).and_then(|k| by_key.get(k).copied()))
            .collect()
    }

    /// Per shape record, whether it belongs to a node outside the largest component.
    pub fn problem_mask(&self, g: &Graph, shapes: &ShapeTable, key: &str) -> Vec<bool> {
        self.shape_labels(g, shapes, key)
            .into_iter()
            .map(|c| matches!(c, Some(c) if Some(c) != self.largest))
            .collect()
    }
}

impl Graph {
    pub fn components(&self) -> Components {
        connected_components(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attrs;

    fn path(g: &mut Graph, n: usize) -> Vec<NodeId> {
        let ids: Vec<NodeId> = (0..n).map(|_| g.add_node(Attrs::new())).collect();
        for w in ids.windows(2) {
            g.add_edge(w[0], w[1]);
        }
        ids
    }

    #[test]
    fn ties_go_to_first_discovered() {
        let mut g = Graph::new();
        path(&mut g, 3);
        path(&mut g, 3);
        let c = connected_components(&g);
        assert_eq!(c.sizes(), vec![3, 3]);
        assert_eq!(c.largest(), Some(0));
        assert_eq!(c.problem_nodes(), vec![3, 4, 5]);
    }

    #[test]
    fn empty_graph_has_no_largest() {
        let c = connected_components(&Graph::new());
        assert!(c.is_empty());
        assert_eq!(c.largest(), None);
        assert!(!c.is_largest(0));
    }
}
