//! Long-form edge list
//!
//! Flattens a matrix into (source, source_total, target, value) records.
//! Only cells strictly above the threshold survive, and `source_total` is
//! recomputed from the survivors of this build — it is NOT the row's grand
//! total in the unfiltered matrix.

use crate::matrix::FlowMatrix;
use serde::{Deserialize, Serialize};

/// One weighted flow from a source to a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Source node name
    pub source: String,
    /// Sum of this source's surviving values in this build
    pub source_total: f64,
    /// Target node name
    pub target: String,
    /// Raw cell weight, strictly greater than the build threshold
    pub value: f64,
}

/// Flatten `matrix` into edges whose value is strictly greater than
/// `min_value`. Rows with no survivors contribute nothing. Row iteration
/// order and within-row column order are preserved; sorting happens later
/// in the indexer.
pub fn build(matrix: &FlowMatrix, min_value: f64) -> Vec<FlowEdge> {
    let mut edges = Vec::new();
    for (source, row) in matrix.iter() {
        let survivors: Vec<(&String, f64)> = row
            .iter()
            .filter(|(_, weight)| **weight > min_value)
            .map(|(target, weight)| (target, *weight))
            .collect();
        if survivors.is_empty() {
            continue;
        }
        let source_total: f64 = survivors.iter().map(|(_, weight)| weight).sum();
        for (target, value) in survivors {
            edges.push(FlowEdge {
                source: source.clone(),
                source_total,
                target: target.clone(),
                value,
            });
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlowMatrix {
        FlowMatrix::from_iter([
            ("A", vec![("x", 5.0), ("y", 2.0)]),
            ("B", vec![("x", 1.0), ("y", 4.0)]),
        ])
    }

    #[test]
    fn test_threshold_is_strict() {
        // y=2.0 is not strictly greater than 2.0 and must drop out
        let edges = build(&sample(), 2.0);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0], FlowEdge {
            source: "A".into(),
            source_total: 5.0,
            target: "x".into(),
            value: 5.0,
        });
        assert_eq!(edges[1], FlowEdge {
            source: "B".into(),
            source_total: 4.0,
            target: "y".into(),
            value: 4.0,
        });
    }

    #[test]
    fn test_source_total_covers_all_survivors() {
        let edges = build(&sample(), 0.0);
        assert_eq!(edges.len(), 4);
        for edge in edges.iter().filter(|e| e.source == "A") {
            assert_eq!(edge.source_total, 7.0);
        }
        for edge in edges.iter().filter(|e| e.source == "B") {
            assert_eq!(edge.source_total, 5.0);
        }
    }

    #[test]
    fn test_order_follows_matrix() {
        let edges = build(&sample(), 0.0);
        let pairs: Vec<(&str, &str)> = edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "x"), ("A", "y"), ("B", "x"), ("B", "y")]);
    }

    #[test]
    fn test_all_below_threshold_is_empty_not_error() {
        let edges = build(&sample(), 100.0);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let mut m = sample();
        m.touch_row("C");
        let edges = build(&m, 0.0);
        assert!(edges.iter().all(|e| e.source != "C"));
    }

    #[test]
    fn test_monotone_in_threshold() {
        let m = sample();
        let loose = build(&m, 1.0);
        let tight = build(&m, 3.0);
        for edge in &tight {
            assert!(loose
                .iter()
                .any(|e| e.source == edge.source && e.target == edge.target));
        }
    }
}
