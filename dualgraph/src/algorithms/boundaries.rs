use geo::{Line, LineString, MultiLineString, Polygon};

use crate::error::Result;
use crate::geometry::intersect::{collinear_overlap, point_at};
use crate::geometry::tolerance::{EPS_OVERLAP, EPS_POS};
use crate::model::{Crs, Value};
use crate::shapes::ShapeTable;
use crate::table::{EdgeTable, ENDPOINT_U, ENDPOINT_V};

/// Boundary crossed by one edge row.
#[derive(Clone, Debug)]
pub struct BoundaryRow {
    pub endpoint_u: Value,
    pub endpoint_v: Value,
    pub geometry: MultiLineString<f64>,
}

/// Shared boundaries aligned row-for-row with the source edge table.
#[derive(Clone, Debug)]
pub struct SharedBoundaries {
    pub crs: Crs,
    pub rows: Vec<BoundaryRow>,
}

fn ring_lines(polys: &[&Polygon<f64>]) -> Vec<Line<f64>> {
    let mut out = Vec::new();
    for p in polys {
        out.extend(p.exterior().lines());
        for r in p.interiors() {
            out.extend(r.lines());
        }
    }
    out
}

/// Pieces of `a`'s ring segments that run along `b`'s.
fn shared_boundary(a: &[Line<f64>], b: &[Line<f64>]) -> MultiLineString<f64> {
    let mut parts = Vec::new();
    for &sa in a {
        for &sb in b {
            if let Some((t0, t1)) = collinear_overlap(sa, sb, EPS_POS, EPS_OVERLAP) {
                parts.push(LineString::new(vec![point_at(sa, t0), point_at(sa, t1)]));
            }
        }
    }
    MultiLineString::new(parts)
}

/// Boundary shared by the two shapes of every row.
///
/// The endpoint columns must hold `key` values of the shape table, i.e. the
/// table was built with `endpoints == key`. Rows whose shapes only touch at a
/// point get an empty geometry.
pub fn shared_boundaries(table: &EdgeTable, shapes: &ShapeTable, key: &str) -> Result<SharedBoundaries> {
    // fail fast on a table without endpoint columns
    table.endpoint_pairs()?;
    let us = table.column(ENDPOINT_U).unwrap_or(&[]);
    let vs = table.column(ENDPOINT_V).unwrap_or(&[]);
    let index = shapes.index(key);
    let mut rows = Vec::with_capacity(table.len());
    for (u, v) in us.iter().zip(vs.iter()) {
        let a = ring_lines(&index.record(u)?.polygons());
        let b = ring_lines(&index.record(v)?.polygons());
        rows.push(BoundaryRow {
            endpoint_u: u.clone(),
            endpoint_v: v.clone(),
            geometry: shared_boundary(&a, &b),
        });
    }
    log::debug!("computed {} shared boundaries", rows.len());
    Ok(SharedBoundaries {
        crs: shapes.crs().clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn adjacent_squares_share_one_side() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)];
        // split along the shared side differently
        let b = polygon![(x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.5), (x: 1.0, y: 0.0)];
        let shared = shared_boundary(&ring_lines(&[&a]), &ring_lines(&[&b]));
        let total: f64 = shared
            .0
            .iter()
            .map(|ls| {
                let (p, q) = (ls.0[0], ls.0[1]);
                ((q.x - p.x).powi(2) + (q.y - p.y).powi(2)).sqrt()
            })
            .sum();
        assert_eq!(shared.0.len(), 2);
        assert!((total - 1.0).abs() < 1e-12);
    }
}
