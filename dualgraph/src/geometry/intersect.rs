// Collinear overlap between two segments, used to recover the boundary two
// adjacent polygons share. Neighbouring shapes in a shapefile repeat each
// other's vertices, but the shared edges need not be split identically.

use geo::{Coord, Line};

use super::tolerance::{near_zero, EPS_LEN};

#[inline]
fn orient(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[inline]
fn dist_to_line(a: Coord<f64>, b: Coord<f64>, len: f64, p: Coord<f64>) -> f64 {
    orient(a, b, p).abs() / len
}

/// Parameter range `[t0, t1]` along `ab` covered by `cd` when both lie on one line.
///
/// Returns `None` for non-collinear segments, for spans shorter than `min_span`
/// (a shared vertex only), and for degenerate `ab`.
pub fn collinear_overlap(ab: Line<f64>, cd: Line<f64>, eps_pos: f64, min_span: f64) -> Option<(f64, f64)> {
    let (a, b) = (ab.start, ab.end);
    let (c, d) = (cd.start, cd.end);
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if near_zero(len, EPS_LEN) {
        return None;
    }
    if dist_to_line(a, b, len, c) > eps_pos || dist_to_line(a, b, len, d) > eps_pos {
        return None;
    }
    // Project C/D onto AB in t-space
    let tc = ((c.x - a.x) * dx + (c.y - a.y) * dy) / (len * len);
    let td = ((d.x - a.x) * dx + (d.y - a.y) * dy) / (len * len);
    let lo = tc.min(td).max(0.0);
    let hi = tc.max(td).min(1.0);
    if hi - lo <= min_span {
        return None;
    }
    Some((lo, hi))
}

/// Point at parameter `t` along `line`.
#[inline]
pub fn point_at(line: Line<f64>, t: f64) -> Coord<f64> {
    Coord {
        x: line.start.x + t * (line.end.x - line.start.x),
        y: line.start.y + t * (line.end.y - line.start.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EP: f64 = 1e-9;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line<f64> {
        Line::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 })
    }

    #[test]
    fn partial_overlap() {
        let r = collinear_overlap(line(0.0, 0.0, 3.0, 0.0), line(2.0, 0.0, 1.0, 0.0), EP, EP);
        let (t0, t1) = r.expect("overlap");
        assert!((t0 - 1.0 / 3.0).abs() < 1e-12 && (t1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn shared_vertex_only_is_not_overlap() {
        let r = collinear_overlap(line(0.0, 0.0, 1.0, 0.0), line(1.0, 0.0, 2.0, 0.0), EP, EP);
        assert!(r.is_none());
    }

    #[test]
    fn parallel_offset_is_not_overlap() {
        let r = collinear_overlap(line(0.0, 0.0, 1.0, 0.0), line(0.0, 0.5, 1.0, 0.5), EP, EP);
        assert!(r.is_none());
    }

    #[test]
    fn point_at_midpoint() {
        let p = point_at(line(0.0, 0.0, 2.0, 4.0), 0.5);
        assert_eq!((p.x, p.y), (1.0, 2.0));
    }
}
