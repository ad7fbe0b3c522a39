#![allow(dead_code)]

use dualgraph::model::{Attrs, Crs, NodeId, Value};
use dualgraph::{Graph, ShapeTable};
use geo::polygon;

pub const KEY: &str = "GEOID10";

pub fn attrs(pairs: &[(&str, Value)]) -> Attrs {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Square of side 2 centred on `(cx, cy)`.
pub fn square(cx: f64, cy: f64) -> geo::Polygon<f64> {
    polygon![
        (x: cx - 1.0, y: cy - 1.0), (x: cx + 1.0, y: cy - 1.0),
        (x: cx + 1.0, y: cy + 1.0), (x: cx - 1.0, y: cy + 1.0), (x: cx - 1.0, y: cy - 1.0)
    ]
}

/// Nodes A, B, C over shapes centred at (0,0), (1,0), (2,0); edges A-B, B-C.
pub fn abc() -> (Graph, ShapeTable, [NodeId; 3]) {
    let mut g = Graph::new();
    let mut shapes = ShapeTable::new(Crs::new("EPSG:3857"));
    let mut ids = [0; 3];
    for (i, k) in ["A", "B", "C"].iter().enumerate() {
        let a = attrs(&[(KEY, Value::from(*k)), ("region", Value::from(i as i64 + 1))]);
        shapes.push(square(i as f64, 0.0), attrs(&[(KEY, Value::from(*k))]));
        ids[i] = g.add_node(a);
    }
    g.add_edge(ids[0], ids[1]);
    g.add_edge(ids[1], ids[2]);
    (g, shapes, ids)
}

/// Disjoint paths with the given node counts; keys are "n0", "n1", ...
pub fn paths(sizes: &[usize]) -> (Graph, ShapeTable) {
    let mut g = Graph::new();
    let mut shapes = ShapeTable::new(Crs::new("EPSG:3857"));
    let mut next = 0usize;
    for (row, &n) in sizes.iter().enumerate() {
        let mut prev: Option<NodeId> = None;
        for i in 0..n {
            let key = Value::from(format!("n{}", next));
            next += 1;
            shapes.push(square(i as f64 * 2.0, row as f64 * 4.0), attrs(&[(KEY, key.clone())]));
            let id = g.add_node(attrs(&[(KEY, key)]));
            if let Some(p) = prev {
                g.add_edge(p, id);
            }
            prev = Some(id);
        }
    }
    (g, shapes)
}
