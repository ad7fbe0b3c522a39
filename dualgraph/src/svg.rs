use crate::table::EdgeTable;

pub fn to_svg_paths_impl(t: &EdgeTable) -> Vec<String> {
    let mut paths = Vec::with_capacity(t.len());
    for line in t.geometries() {
        let mut pts = line.0.iter();
        let first = match pts.next() {
            Some(c) => c,
            None => continue,
        };
        // SVG's y axis points down
        let mut d = format!("M {} {}", first.x, -first.y);
        for c in pts {
            d.push_str(&format!(" L {} {}", c.x, -c.y));
        }
        paths.push(d);
    }
    paths
}
