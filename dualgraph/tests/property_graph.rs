use dualgraph::model::{Attrs, Crs, KeyPair, Value};
use dualgraph::{Graph, ProjectionOptions, ShapeTable};
use geo::polygon;
use proptest::prelude::*;
use std::collections::HashSet;

const KEY: &str = "GEOID10";

#[derive(Clone, Debug)]
enum Op {
    AddEdge { a: u16, b: u16 },
    RemoveEdge { a: u16, b: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::AddEdge { a, b }),
        1 => (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::RemoveEdge { a, b }),
    ]
}

fn build(n: usize, ops: &[Op]) -> (Graph, ShapeTable) {
    let mut g = Graph::new();
    let mut shapes = ShapeTable::new(Crs::new("EPSG:3857"));
    for i in 0..n {
        let mut attrs = Attrs::new();
        attrs.insert(KEY.into(), Value::from(format!("k{}", i)));
        let x = (i % 16) as f64 * 3.0;
        let y = (i / 16) as f64 * 3.0;
        shapes.push(
            polygon![(x: x, y: y), (x: x + 2.0, y: y), (x: x + 2.0, y: y + 2.0), (x: x, y: y + 2.0), (x: x, y: y)],
            attrs.clone(),
        );
        g.add_node(attrs);
    }
    for op in ops {
        match *op {
            Op::AddEdge { a, b } => {
                let _ = g.add_edge(a as u32 % n as u32, b as u32 % n as u32);
            }
            Op::RemoveEdge { a, b } => {
                let _ = g.remove_edge(a as u32 % n as u32, b as u32 % n as u32);
            }
        }
    }
    (g, shapes)
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (1usize..40, prop::collection::vec(op_strategy(), 0..80))
}

const CASES: u32 = if cfg!(feature = "long-tests") { 10_000 } else { 256 };

proptest! {
    #![proptest_config(ProptestConfig { cases: CASES, .. ProptestConfig::default() })]

    #[test]
    fn components_partition_nodes((n, ops) in graph_strategy()) {
        let (g, _) = build(n, &ops);
        let c = g.components();
        let mut seen = HashSet::new();
        for i in 0..c.len() {
            for &node in c.members(i) {
                prop_assert!(seen.insert(node));
            }
        }
        prop_assert_eq!(seen.len(), g.node_count() as usize);
        let largest = c.largest().unwrap();
        prop_assert!(c.sizes().iter().all(|&s| s <= c.sizes()[largest]));
        prop_assert!(c.sizes()[..largest].iter().all(|&s| s < c.sizes()[largest]));
        for (_, e) in g.edges() {
            prop_assert_eq!(c.component_of(e.u), c.component_of(e.v));
        }
        prop_assert_eq!(c.problem_nodes().len(), n - c.sizes()[largest]);
    }

    #[test]
    fn table_has_one_row_per_edge((n, ops) in graph_strategy()) {
        let (g, shapes) = build(n, &ops);
        let t = g.to_edge_table(&shapes, &ProjectionOptions::default().with_endpoints(KEY)).unwrap();
        prop_assert_eq!(t.len(), g.edge_count() as usize);
        let pairs: HashSet<KeyPair> = t.endpoint_pairs().unwrap().into_iter().collect();
        prop_assert_eq!(pairs.len(), t.len());
    }

    #[test]
    fn marking_ignores_orientation_and_repeats((n, ops) in graph_strategy(), pick in any::<prop::sample::Index>(), flip in any::<bool>()) {
        let (g, shapes) = build(n, &ops);
        prop_assume!(g.edge_count() > 0);
        let opts = ProjectionOptions::default().with_endpoints(KEY);
        let mut t = g.to_edge_table(&shapes, &opts).unwrap();
        let row = pick.index(t.len());
        let u = t.value(row, "endpoint_u").unwrap().clone();
        let v = t.value(row, "endpoint_v").unwrap().clone();
        let mark = if flip { (v, u) } else { (u, v) };
        prop_assert_eq!(t.mark_edges([mark.clone()], "m", 1).unwrap(), 1);
        let once = t.column("m").unwrap().to_vec();
        t.mark_edges([mark], "m", 1).unwrap();
        prop_assert_eq!(t.column("m").unwrap(), once.as_slice());
        for (i, val) in once.iter().enumerate() {
            let expected = if i == row { 1 } else { 0 };
            prop_assert_eq!(val, &Value::Int(expected));
        }
    }
}
