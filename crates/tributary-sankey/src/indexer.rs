//! Bipartite Sankey indexing
//!
//! Renderers address nodes by integer index into one flat label array.
//! Sources take `0..S` and targets continue at `S..S+T`, so
//! `source_labels + target_labels` concatenates into that array with no
//! collisions. A name appearing on both sides deliberately gets one index
//! per side: the output graph is bipartite by construction, and collapsing
//! the two identities would change the diagram topology.

use crate::edges::FlowEdge;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Node/link structure for a Sankey renderer.
///
/// `source`, `target` and `value` are parallel arrays with one entry per
/// edge. Every `source[i]` is below `source_labels.len()` and every
/// `target[i]` lies in `source_labels.len()..source_labels.len() +
/// target_labels.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyGraph {
    /// Distinct source names, lexicographically sorted
    pub source_labels: Vec<String>,
    /// Distinct target names, lexicographically sorted
    pub target_labels: Vec<String>,
    /// Per-link source node index
    pub source: Vec<usize>,
    /// Per-link target node index (offset by the source count)
    pub target: Vec<usize>,
    /// Per-link flow magnitude (the edge value, not the source total)
    pub value: Vec<f64>,
}

impl SankeyGraph {
    /// The flat node-label array: sources followed by targets.
    pub fn node_labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.node_count());
        labels.extend(self.source_labels.iter().cloned());
        labels.extend(self.target_labels.iter().cloned());
        labels
    }

    /// Total node count across both namespaces.
    pub fn node_count(&self) -> usize {
        self.source_labels.len() + self.target_labels.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.value.len()
    }

    /// True for the zero-node, zero-link graph.
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }
}

/// Index an edge list into renderer form.
///
/// Duplicate (source, target) pairs come out as separate parallel links;
/// any per-node flow aggregation is the renderer's business. An empty edge
/// list yields the empty graph.
pub fn index(edges: &[FlowEdge]) -> SankeyGraph {
    let source_set: BTreeSet<&str> = edges.iter().map(|e| e.source.as_str()).collect();
    let target_set: BTreeSet<&str> = edges.iter().map(|e| e.target.as_str()).collect();

    let source_labels: Vec<String> = source_set.iter().map(|s| s.to_string()).collect();
    let target_labels: Vec<String> = target_set.iter().map(|t| t.to_string()).collect();

    let source_index: FxHashMap<&str, usize> = source_set
        .iter()
        .enumerate()
        .map(|(i, s)| (*s, i))
        .collect();
    // target indices continue where the source range ends
    let offset = source_labels.len();
    let target_index: FxHashMap<&str, usize> = target_set
        .iter()
        .enumerate()
        .map(|(i, t)| (*t, offset + i))
        .collect();

    let mut source = Vec::with_capacity(edges.len());
    let mut target = Vec::with_capacity(edges.len());
    let mut value = Vec::with_capacity(edges.len());
    for edge in edges {
        source.push(source_index[edge.source.as_str()]);
        target.push(target_index[edge.target.as_str()]);
        value.push(edge.value);
    }

    SankeyGraph {
        source_labels,
        target_labels,
        source,
        target,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: &str, target: &str, value: f64) -> FlowEdge {
        FlowEdge {
            source: source.into(),
            source_total: value,
            target: target.into(),
            value,
        }
    }

    #[test]
    fn test_labels_sorted_and_deduplicated() {
        let edges = vec![
            edge("B", "y", 1.0),
            edge("A", "x", 2.0),
            edge("B", "x", 3.0),
        ];
        let graph = index(&edges);
        assert_eq!(graph.source_labels, vec!["A", "B"]);
        assert_eq!(graph.target_labels, vec!["x", "y"]);
    }

    #[test]
    fn test_target_indices_are_offset() {
        let edges = vec![edge("A", "x", 5.0), edge("B", "y", 4.0)];
        let graph = index(&edges);
        assert_eq!(graph.source, vec![0, 1]);
        assert_eq!(graph.target, vec![2, 3]);
        assert_eq!(graph.value, vec![5.0, 4.0]);
        assert_eq!(graph.node_labels(), vec!["A", "B", "x", "y"]);
    }

    #[test]
    fn test_index_ranges() {
        let edges = vec![
            edge("C", "x", 1.0),
            edge("A", "z", 2.0),
            edge("B", "y", 3.0),
            edge("A", "x", 4.0),
        ];
        let graph = index(&edges);
        let s = graph.source_labels.len();
        let t = graph.target_labels.len();
        for &i in &graph.source {
            assert!(i < s);
        }
        for &i in &graph.target {
            assert!(i >= s && i < s + t);
        }
    }

    #[test]
    fn test_shared_name_gets_two_indices() {
        // "Italy" produces and receives; it must appear once per namespace
        let edges = vec![edge("Italy", "Ghana", 2.0), edge("China", "Italy", 3.0)];
        let graph = index(&edges);
        assert_eq!(graph.source_labels, vec!["China", "Italy"]);
        assert_eq!(graph.target_labels, vec!["Ghana", "Italy"]);
        // link China -> Italy addresses the target-side Italy
        assert_eq!(graph.source[1], 0);
        assert_eq!(graph.target[1], 3);
    }

    #[test]
    fn test_duplicate_edges_stay_parallel() {
        let edges = vec![edge("A", "x", 1.0), edge("A", "x", 2.0)];
        let graph = index(&edges);
        assert_eq!(graph.link_count(), 2);
        assert_eq!(graph.source, vec![0, 0]);
        assert_eq!(graph.target, vec![1, 1]);
    }

    #[test]
    fn test_empty_edges_yield_empty_graph() {
        let graph = index(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.node_labels(), Vec::<String>::new());
    }

    #[test]
    fn test_value_is_edge_value_not_source_total() {
        let edges = vec![FlowEdge {
            source: "A".into(),
            source_total: 9.0,
            target: "x".into(),
            value: 4.0,
        }];
        let graph = index(&edges);
        assert_eq!(graph.value, vec![4.0]);
    }
}
