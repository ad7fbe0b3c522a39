use crate::error::{DualGraphError, Result};
use crate::geometry::limits::IngestCaps;
use crate::model::{Attrs, NodeId, Value};
use crate::Graph;
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use std::collections::HashMap;

type Record = Map<String, Json>;

#[derive(Deserialize)]
struct DocDe {
    #[serde(default)]
    directed: bool,
    #[serde(default)]
    multigraph: bool,
    nodes: Vec<Record>,
    adjacency: Option<Vec<Vec<Record>>>,
    #[serde(alias = "edges")]
    links: Option<Vec<Record>>,
}

fn scalar_attrs(rec: Record, skip: &[&str], ctx: &str) -> Attrs {
    let mut attrs = Attrs::new();
    for (k, v) in rec {
        if skip.contains(&k.as_str()) {
            continue;
        }
        match Value::from_json(&v) {
            Some(val) => {
                attrs.insert(k, val);
            }
            None => log::debug!("{}: skipping non-scalar attribute {:?}", ctx, k),
        }
    }
    attrs
}

fn id_of(rec: &Record, field: &str, ctx: &str) -> Result<Value> {
    rec.get(field)
        .and_then(Value::from_json)
        .ok_or_else(|| DualGraphError::InvalidGraph(format!("{} lacks a scalar {:?}", ctx, field)))
}

pub fn from_json_impl(v: Json) -> Result<Graph> {
    read_graph(v, &IngestCaps::DEFAULT)
}

fn read_graph(v: Json, caps: &IngestCaps) -> Result<Graph> {
    let doc: DocDe = serde_json::from_value(v)?;
    if doc.directed || doc.multigraph {
        return Err(DualGraphError::InvalidGraph(
            "dual graphs must be undirected simple graphs".into(),
        ));
    }
    if doc.nodes.len() > caps.nodes {
        return Err(DualGraphError::LimitExceeded {
            what: "nodes",
            limit: caps.nodes,
        });
    }
    let mut g = Graph::new();
    let mut by_name: HashMap<Value, NodeId> = HashMap::with_capacity(doc.nodes.len());
    let mut order: Vec<NodeId> = Vec::with_capacity(doc.nodes.len());
    for (i, rec) in doc.nodes.into_iter().enumerate() {
        let ctx = format!("node {}", i);
        let name = id_of(&rec, "id", &ctx)?;
        if by_name.contains_key(&name) {
            return Err(DualGraphError::InvalidGraph(format!("duplicate node id {}", name)));
        }
        let attrs = scalar_attrs(rec, &["id"], &ctx);
        let id = g.add_named_node(name.clone(), attrs);
        by_name.insert(name, id);
        order.push(id);
    }

    // (source, target, attrs) in document order
    let mut pairs: Vec<(NodeId, Value, Record)> = Vec::new();
    match (doc.adjacency, doc.links) {
        (Some(adjacency), _) => {
            if adjacency.len() != order.len() {
                return Err(DualGraphError::InvalidGraph(format!(
                    "adjacency has {} rows for {} nodes",
                    adjacency.len(),
                    order.len()
                )));
            }
            for (row, nbrs) in adjacency.into_iter().enumerate() {
                for rec in nbrs {
                    let target = id_of(&rec, "id", &format!("adjacency row {}", row))?;
                    pairs.push((order[row], target, rec));
                }
            }
        }
        (None, Some(links)) => {
            for (i, rec) in links.into_iter().enumerate() {
                let ctx = format!("link {}", i);
                let source = id_of(&rec, "source", &ctx)?;
                let target = id_of(&rec, "target", &ctx)?;
                match by_name.get(&source) {
                    Some(&s) => pairs.push((s, target, rec)),
                    None => log::warn!("{}: unknown source node {}, skipped", ctx, source),
                }
            }
        }
        (None, None) => {
            return Err(DualGraphError::InvalidGraph(
                "document has neither adjacency nor links/edges".into(),
            ))
        }
    }

    for (u, target, rec) in pairs {
        let v = match by_name.get(&target) {
            Some(&v) => v,
            None => {
                log::warn!("edge from node {} to unknown node {}, skipped", u, target);
                continue;
            }
        };
        if u == v {
            log::warn!("self-loop on node {} skipped", u);
            continue;
        }
        if g.has_edge(u, v) {
            // adjacency lists every undirected edge from both ends
            continue;
        }
        if g.edge_count() as usize >= caps.edges {
            return Err(DualGraphError::LimitExceeded {
                what: "edges",
                limit: caps.edges,
            });
        }
        if let Some(eid) = g.add_edge(u, v) {
            let attrs = scalar_attrs(rec, &["id", "source", "target"], "edge");
            if let Some(e) = g.edge_mut(eid) {
                e.attrs = attrs;
            }
        }
    }
    log::debug!(
        "read graph with {} nodes and {} edges",
        g.node_count(),
        g.edge_count()
    );
    Ok(g)
}

fn with_attrs(id: Json, attrs: &Attrs) -> Json {
    let mut m = Map::new();
    m.insert("id".into(), id);
    for (k, v) in attrs {
        m.insert(k.clone(), v.to_json());
    }
    Json::Object(m)
}

pub fn to_json_impl(g: &Graph) -> Json {
    let mut nodes = Vec::new();
    let mut adjacency = Vec::new();
    for (id, n) in g.nodes() {
        nodes.push(with_attrs(n.name.to_json(), &n.attrs));
        let mut row = Vec::new();
        for nbr in g.neighbors(id) {
            let (name, attrs) = match (g.node(nbr), g.find_edge(id, nbr).and_then(|e| g.edge(e))) {
                (Some(m), Some(e)) => (m.name.to_json(), &e.attrs),
                _ => continue,
            };
            row.push(with_attrs(name, attrs));
        }
        adjacency.push(Json::Array(row));
    }
    serde_json::json!({
        "directed": false,
        "multigraph": false,
        "graph": [],
        "nodes": nodes,
        "adjacency": adjacency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn caps(nodes: usize, edges: usize) -> IngestCaps {
        IngestCaps { nodes, edges, ..IngestCaps::DEFAULT }
    }

    fn triangle() -> Json {
        json!({
            "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
            "links": [
                {"source": "a", "target": "b"},
                {"source": "b", "target": "c"},
                {"source": "c", "target": "a"}
            ]
        })
    }

    #[test]
    fn edge_cap_counts_distinct_edges() {
        assert_eq!(read_graph(triangle(), &caps(3, 3)).unwrap().edge_count(), 3);
        match read_graph(triangle(), &caps(3, 2)) {
            Err(DualGraphError::LimitExceeded { what: "edges", limit: 2 }) => {}
            other => panic!("expected edge cap, got {:?}", other.map(|g| g.edge_count())),
        }
        // both directions of one edge count once
        let doc = json!({
            "nodes": [{"id": 0}, {"id": 1}],
            "adjacency": [[{"id": 1}], [{"id": 0}]]
        });
        assert_eq!(read_graph(doc, &caps(2, 1)).unwrap().edge_count(), 1);
    }

    #[test]
    fn node_cap_uses_given_limit() {
        assert!(matches!(
            read_graph(triangle(), &caps(2, 10)),
            Err(DualGraphError::LimitExceeded { what: "nodes", limit: 2 })
        ));
    }
}
