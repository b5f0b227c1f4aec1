//! End-to-end properties of the matrix -> edges -> graph transformation.

use tributary::sankey::{
    build_edges, index_edges, run_pipeline, top_n, FlowMatrix, SankeyParams, TopNLimits,
};

fn demo_matrix() -> FlowMatrix {
    FlowMatrix::from_iter([
        ("Borealis", vec![("CN", 120.0), ("US", 45.0), ("DE", 80.0)]),
        ("Sinopec", vec![("CN", 300.0), ("US", 10.0)]),
        ("Dow", vec![("US", 210.0), ("DE", 15.0), ("BR", 60.0)]),
        ("Exxon", vec![("US", 150.0), ("CN", 90.0)]),
    ])
}

#[test]
fn test_filter_idempotence() {
    let matrix = demo_matrix();
    let limits = TopNLimits::new(Some(3), Some(2));
    let once = top_n(&matrix, &limits);
    let twice = top_n(&once, &limits);
    assert_eq!(once, twice);

    // same with larger limits
    let looser = top_n(&once, &TopNLimits::new(Some(10), Some(10)));
    assert_eq!(once, looser);
}

#[test]
fn test_threshold_monotonicity() {
    let matrix = demo_matrix();
    let loose = build_edges(&matrix, 20.0);
    let tight = build_edges(&matrix, 100.0);

    assert!(tight.len() <= loose.len());
    for edge in &tight {
        assert!(
            loose
                .iter()
                .any(|e| e.source == edge.source && e.target == edge.target),
            "edge {} -> {} appeared only under the tighter threshold",
            edge.source,
            edge.target
        );
    }
}

#[test]
fn test_index_range_invariant() {
    let matrix = demo_matrix();
    let graph = run_pipeline(&matrix, &SankeyParams::default()).unwrap();

    let s = graph.source_labels.len();
    let t = graph.target_labels.len();
    assert_eq!(graph.source.len(), graph.target.len());
    assert_eq!(graph.source.len(), graph.value.len());
    for &i in &graph.source {
        assert!(i < s);
    }
    for &i in &graph.target {
        assert!((s..s + t).contains(&i));
    }
}

#[test]
fn test_label_ordering() {
    // scrambled input order must not leak into the label lists
    let matrix = FlowMatrix::from_iter([
        ("Zeta", vec![("gamma", 1.0)]),
        ("Alpha", vec![("beta", 2.0), ("alpha", 3.0)]),
        ("Mid", vec![("gamma", 4.0)]),
    ]);
    let graph = run_pipeline(&matrix, &SankeyParams::default()).unwrap();

    for labels in [&graph.source_labels, &graph.target_labels] {
        let mut sorted = labels.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(labels, &sorted);
    }
    assert_eq!(graph.source_labels, vec!["Alpha", "Mid", "Zeta"]);
    assert_eq!(graph.target_labels, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn test_total_preservation_without_filtering() {
    let matrix = demo_matrix();
    let graph = run_pipeline(&matrix, &SankeyParams::default()).unwrap();
    let emitted: f64 = graph.value.iter().sum();
    assert!((emitted - matrix.grand_total()).abs() < 1e-9);
}

#[test]
fn test_reference_scenario() {
    let matrix = FlowMatrix::from_iter([
        ("A", vec![("x", 5.0), ("y", 2.0)]),
        ("B", vec![("x", 1.0), ("y", 4.0)]),
    ]);

    let edges = build_edges(&matrix, 2.0);
    assert_eq!(edges.len(), 2);
    assert_eq!(
        (edges[0].source.as_str(), edges[0].source_total, edges[0].target.as_str(), edges[0].value),
        ("A", 5.0, "x", 5.0)
    );
    assert_eq!(
        (edges[1].source.as_str(), edges[1].source_total, edges[1].target.as_str(), edges[1].value),
        ("B", 4.0, "y", 4.0)
    );

    let graph = index_edges(&edges);
    assert_eq!(graph.source_labels, vec!["A", "B"]);
    assert_eq!(graph.target_labels, vec!["x", "y"]);
    assert_eq!(graph.source, vec![0, 1]);
    assert_eq!(graph.target, vec![2, 3]);
    assert_eq!(graph.value, vec![5.0, 4.0]);
}

#[test]
fn test_all_weights_below_threshold() {
    let matrix = demo_matrix();
    let graph = run_pipeline(
        &matrix,
        &SankeyParams {
            min_value: 1e6,
            ..SankeyParams::default()
        },
    )
    .unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.link_count(), 0);
}

#[test]
fn test_tie_break_reproducible() {
    let matrix = FlowMatrix::from_iter([
        ("A", vec![("x", 5.0), ("y", 2.0)]),
        ("B", vec![("x", 1.0), ("y", 4.0)]),
    ]);
    // column totals tie at 6.0
    let first = top_n(&matrix, &TopNLimits::new(None, Some(1)));
    for _ in 0..20 {
        let again = top_n(&matrix, &TopNLimits::new(None, Some(1)));
        assert_eq!(again, first);
    }
    assert_eq!(first.target_labels(), vec!["x"]);
}

#[test]
fn test_source_totals_reflect_surviving_targets_only() {
    // Dropping the CN column must shrink source totals before row ranking
    let matrix = demo_matrix();
    let filtered = top_n(&matrix, &TopNLimits::new(Some(1), Some(1)));
    // column totals: CN 510, US 415, DE 95, BR 60
    assert_eq!(filtered.target_labels(), vec!["CN"]);
    // over the surviving CN column alone, Sinopec (300) leads; Dow has no
    // CN cell even though its all-column total is 285
    assert_eq!(filtered.source_labels(), vec!["Sinopec"]);
}

#[test]
fn test_self_loop_passes_through() {
    // a country shipping waste to itself is kept as a normal link
    let matrix = FlowMatrix::from_iter([("IT", vec![("IT", 7.0), ("GH", 3.0)])]);
    let graph = run_pipeline(&matrix, &SankeyParams::default()).unwrap();
    assert_eq!(graph.source_labels, vec!["IT"]);
    assert_eq!(graph.target_labels, vec!["GH", "IT"]);
    // IT appears once per namespace, with distinct indices
    assert_eq!(graph.node_labels(), vec!["IT", "GH", "IT"]);
    assert_eq!(graph.link_count(), 2);
}
