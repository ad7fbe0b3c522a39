mod common;

use std::collections::HashSet;

use common::{attrs, paths, square, KEY};
use dualgraph::algorithms::components::connected_components;
use dualgraph::model::Value;
use dualgraph::DualGraphError;

#[test]
fn largest_of_five_three_three() {
    // put a small component first so the largest is not trivially index 0
    let (g, shapes) = paths(&[3, 5, 3]);
    let c = g.components();
    assert_eq!(c.sizes(), vec![3, 5, 3]);
    assert_eq!(c.largest(), Some(1));

    let problems = c.problem_keys(&g, KEY).unwrap();
    assert_eq!(problems.len(), 6);
    let expected: HashSet<Value> = (0..3).chain(8..11).map(|i| Value::from(format!("n{}", i))).collect();
    assert_eq!(problems.into_iter().collect::<HashSet<_>>(), expected);

    let mask = c.problem_mask(&g, &shapes, KEY);
    assert_eq!(mask.iter().filter(|m| **m).count(), 6);
    assert!(!mask[3] && !mask[7]);
}

#[test]
fn partition_is_complete_and_disjoint() {
    let (mut g, _) = paths(&[4, 1, 2, 6]);
    g.add_edge(0, 5); // join first and third paths
    let c = connected_components(&g);
    let mut seen = HashSet::new();
    for i in 0..c.len() {
        for &n in c.members(i) {
            assert!(seen.insert(n), "node {} in two components", n);
            assert_eq!(c.component_of(n), Some(i));
        }
    }
    assert_eq!(seen.len(), g.node_count() as usize);
    assert_eq!(c.sizes(), vec![6, 1, 6]);
    // first-seen wins the tie
    assert_eq!(c.largest(), Some(0));
    assert!(c.is_largest(5));
    assert!(!c.is_largest(4));
}

#[test]
fn edge_labels_follow_endpoints() {
    let (g, _) = paths(&[2, 3]);
    let c = g.components();
    let labels = c.edge_labels(&g);
    assert_eq!(labels.len(), g.edge_count() as usize);
    for l in &labels {
        let e = g.edge(l.edge).unwrap();
        assert_eq!(c.component_of(e.u), Some(l.component));
        assert_eq!(c.component_of(e.v), Some(l.component));
        assert_eq!(l.in_largest, l.component == 1);
    }
}

#[test]
fn shape_labels_in_shape_order() {
    let (g, mut shapes) = paths(&[1, 2]);
    shapes.push(square(50.0, 50.0), attrs(&[(KEY, Value::from("orphan"))]));
    let c = g.components();
    assert_eq!(c.shape_labels(&g, &shapes, KEY), vec![Some(0), Some(1), Some(1), None]);
    assert_eq!(c.problem_mask(&g, &shapes, KEY), vec![true, false, false, false]);
}

#[test]
fn problem_keys_need_the_key_attribute() {
    let (mut g, _) = paths(&[2]);
    g.add_node(attrs(&[("other", Value::from(1))]));
    let err = g.components().problem_keys(&g, KEY).unwrap_err();
    assert!(matches!(err, DualGraphError::MissingAttribute { node: 2, .. }));
}
