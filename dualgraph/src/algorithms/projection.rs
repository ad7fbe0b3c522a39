use geo::{Coord, LineString};

use crate::config::ProjectionOptions;
use crate::error::{DualGraphError, Result};
use crate::model::{Crs, EdgeId, NodeId, Value};
use crate::shapes::{ShapeIndex, ShapeTable};
use crate::table::{EdgeTable, Reproject, ENDPOINT_U, ENDPOINT_V};
use crate::Graph;

/// Geometry of one graph edge: the segment from `u`'s centroid to `v`'s.
#[derive(Clone, Debug)]
pub struct EdgeGeometry {
    pub edge: EdgeId,
    pub u: NodeId,
    pub v: NodeId,
    pub line: LineString<f64>,
    pub endpoints: Option<(Value, Value)>,
}

/// Builder output, still in the shapes' CRS.
#[derive(Clone, Debug)]
pub struct EdgeGeometries {
    pub crs: Crs,
    pub items: Vec<EdgeGeometry>,
    /// Endpoint identifiers were requested; every item carries them.
    pub with_endpoints: bool,
}

fn join_value<'g>(g: &'g Graph, node: NodeId, key: &str) -> Result<&'g Value> {
    g.node_attr(node, key)
        .ok_or_else(|| DualGraphError::MissingAttribute {
            node,
            attr: key.to_string(),
        })
}

// Node attribute first, then the node's shape record.
fn endpoint_value(g: &Graph, index: &ShapeIndex<'_>, node: NodeId, key: &Value, attr: &str) -> Result<Value> {
    if let Some(v) = g.node_attr(node, attr) {
        return Ok(v.clone());
    }
    index
        .record(key)?
        .attr(attr)
        .cloned()
        .ok_or_else(|| DualGraphError::MissingAttribute {
            node,
            attr: attr.to_string(),
        })
}

/// Builds one centroid-to-centroid segment per edge, in graph edge order.
///
/// Aborts on the first endpoint whose shape cannot be resolved.
pub fn build_edge_geometries(
    g: &Graph,
    shapes: &ShapeTable,
    key: &str,
    endpoints: Option<&str>,
) -> Result<EdgeGeometries> {
    let index = shapes.index(key);
    let mut items = Vec::with_capacity(g.edge_count() as usize);
    for (id, e) in g.edges() {
        let ku = join_value(g, e.u, key)?;
        let kv = join_value(g, e.v, key)?;
        let cu = index.centroid(ku)?;
        let cv = index.centroid(kv)?;
        let line = LineString::new(vec![Coord::from(cu), Coord::from(cv)]);
        let ends = match endpoints {
            Some(attr) => Some((
                endpoint_value(g, &index, e.u, ku, attr)?,
                endpoint_value(g, &index, e.v, kv, attr)?,
            )),
            None => None,
        };
        items.push(EdgeGeometry {
            edge: id,
            u: e.u,
            v: e.v,
            line,
            endpoints: ends,
        });
    }
    log::debug!("built {} edge geometries keyed by {}", items.len(), key);
    Ok(EdgeGeometries {
        crs: shapes.crs().clone(),
        items,
        with_endpoints: endpoints.is_some(),
    })
}

/// Packages builder output as a table in `target` (the source CRS when `None`).
///
/// A differing target needs a reprojector; without one the call fails with `CrsMismatch`.
/// Endpoint columns are present, even for an empty graph, when the builder recorded them.
pub fn assemble_edge_table(
    geoms: EdgeGeometries,
    target: Option<&Crs>,
    reproject: Option<&dyn Reproject>,
) -> Result<EdgeTable> {
    let EdgeGeometries {
        crs,
        items,
        with_endpoints,
    } = geoms;
    let mut table = EdgeTable::with_capacity(crs, items.len());
    let mut us = Vec::new();
    let mut vs = Vec::new();
    for it in items {
        table.edges.push((it.u, it.v));
        table.geometry.push(it.line);
        let (a, b) = it.endpoints.unwrap_or((Value::Null, Value::Null));
        us.push(a);
        vs.push(b);
    }
    if with_endpoints {
        table.set_column(ENDPOINT_U, us);
        table.set_column(ENDPOINT_V, vs);
    }
    match target {
        Some(t) if t != table.crs() => match reproject {
            Some(r) => table.to_crs(t, r),
            None => Err(DualGraphError::CrsMismatch {
                from: table.crs().clone(),
                to: t.clone(),
            }),
        },
        _ => Ok(table),
    }
}

/// Builder and assembler in one step.
pub fn edges_to_table(
    g: &Graph,
    shapes: &ShapeTable,
    opts: &ProjectionOptions,
    reproject: Option<&dyn Reproject>,
) -> Result<EdgeTable> {
    let geoms = build_edge_geometries(g, shapes, &opts.key, opts.endpoints.as_deref())?;
    assemble_edge_table(geoms, opts.target_crs.as_ref(), reproject)
}

impl Graph {
    pub fn to_edge_table(&self, shapes: &ShapeTable, opts: &ProjectionOptions) -> Result<EdgeTable> {
        edges_to_table(self, shapes, opts, None)
    }
}
