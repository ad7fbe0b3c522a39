use dualgraph::model::{Attrs, Crs, NodeId, Value};
use dualgraph::{Graph, ProjectionOptions, ShapeTable};
use geo::polygon;
use std::time::Instant;

// w x h grid of unit squares with rook adjacency
fn build_grid(w: usize, h: usize) -> (Graph, ShapeTable) {
    let mut g = Graph::new();
    let mut shapes = ShapeTable::new(Crs::new("EPSG:3857"));
    let mut ids: Vec<NodeId> = Vec::with_capacity(w * h);
    for j in 0..h {
        for i in 0..w {
            let key = Value::from(format!("{:05}{:05}", i, j));
            let mut attrs = Attrs::new();
            attrs.insert("GEOID10".into(), key);
            let (x, y) = (i as f64, j as f64);
            shapes.push(
                polygon![(x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0), (x: x, y: y)],
                attrs.clone(),
            );
            ids.push(g.add_node(attrs));
        }
    }
    for j in 0..h {
        for i in 0..w {
            if i + 1 < w { g.add_edge(ids[j * w + i], ids[j * w + i + 1]); }
            if j + 1 < h { g.add_edge(ids[j * w + i], ids[(j + 1) * w + i]); }
        }
    }
    (g, shapes)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut side = 100usize;
    let mut rounds = 5usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--side=") { if let Ok(v) = val.parse() { side = v; } }
        else if let Some(val) = a.strip_prefix("--rounds=") { if let Ok(v) = val.parse() { rounds = v; } }
        else if let Some(val) = a.strip_prefix("--assert-ms=") { if let Ok(v) = val.parse() { assert_ms = Some(v); } }
    }

    let (g, shapes) = build_grid(side, side);
    let opts = ProjectionOptions::default().with_endpoints("GEOID10");
    let mut times_ms: Vec<f64> = Vec::with_capacity(rounds);
    let mut rows = 0usize;
    for _ in 0..rounds.max(1) {
        let t0 = Instant::now();
        let mut table = match g.to_edge_table(&shapes, &opts) {
            Ok(t) => t,
            Err(e) => { eprintln!("build failed: {}", e); std::process::exit(1); }
        };
        // mark every other row
        let marks: Vec<(Value, Value)> = (0..table.len())
            .step_by(2)
            .filter_map(|r| Some((table.value(r, "endpoint_v")?.clone(), table.value(r, "endpoint_u")?.clone())))
            .collect();
        if let Err(e) = table.mark_edges(marks, "marked", 1) { eprintln!("mark failed: {}", e); std::process::exit(1); }
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
        rows = table.len();
    }
    let comps = g.components();
    times_ms.sort_by(|a, b| a.total_cmp(b));
    let med = times_ms[times_ms.len() / 2];
    println!("side={} nodes={} rows={} components={} median_ms={:.3}", side, g.node_count(), rows, comps.len(), med);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.3} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
