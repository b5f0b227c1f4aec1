//! Composed transformation pipeline
//!
//! Fixed stage order: top-N filter, then edge build, then bipartite
//! indexing. Every run is a full, independent pass over an immutable input
//! matrix; nothing is reused between runs.

use crate::edges;
use crate::filter::{self, TopNLimits};
use crate::indexer::{self, SankeyGraph};
use crate::matrix::FlowMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SankeyParams {
    /// Keep only the top N sources by total weight (`None` = all)
    pub max_sources: Option<usize>,
    /// Keep only the top N targets by total weight (`None` = all)
    pub max_targets: Option<usize>,
    /// Drop edges whose value is not strictly greater than this
    pub min_value: f64,
    /// Optional ceiling on the output node count. `None` reproduces the
    /// historical unbounded behavior; exceeding a configured ceiling is an
    /// error, never a silent truncation.
    pub max_nodes: Option<usize>,
}

impl Default for SankeyParams {
    fn default() -> Self {
        SankeyParams {
            max_sources: None,
            max_targets: None,
            min_value: 0.0,
            max_nodes: None,
        }
    }
}

impl SankeyParams {
    /// Limits for the filter stage.
    pub fn limits(&self) -> TopNLimits {
        TopNLimits::new(self.max_sources, self.max_targets)
    }
}

/// Errors from a pipeline run. Empty output is not among them: a matrix
/// that filters down to nothing produces an empty graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The minimum-value threshold was negative or non-finite. Callers own
    /// this precondition; out-of-range thresholds are rejected, not clamped.
    #[error("invalid minimum-value threshold {0}: must be finite and non-negative")]
    InvalidThreshold(f64),

    /// The indexed graph would exceed the configured node ceiling.
    #[error("sankey graph has {nodes} nodes, exceeding the configured maximum of {max_nodes}")]
    NodeBudgetExceeded { nodes: usize, max_nodes: usize },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Run the full matrix -> edges -> graph transformation.
pub fn run(matrix: &FlowMatrix, params: &SankeyParams) -> PipelineResult<SankeyGraph> {
    if !params.min_value.is_finite() || params.min_value < 0.0 {
        return Err(PipelineError::InvalidThreshold(params.min_value));
    }

    let filtered = filter::top_n(matrix, &params.limits());
    let edge_list = edges::build(&filtered, params.min_value);
    let graph = indexer::index(&edge_list);

    if let Some(max_nodes) = params.max_nodes {
        let nodes = graph.node_count();
        if nodes > max_nodes {
            return Err(PipelineError::NodeBudgetExceeded { nodes, max_nodes });
        }
    }

    Ok(graph)
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
    fn test_reference_scenario() {
        let graph = run(
            &sample(),
            &SankeyParams {
                min_value: 2.0,
                ..SankeyParams::default()
            },
        )
        .unwrap();

        assert_eq!(graph.source_labels, vec!["A", "B"]);
        assert_eq!(graph.target_labels, vec!["x", "y"]);
        assert_eq!(graph.source, vec![0, 1]);
        assert_eq!(graph.target, vec![2, 3]);
        assert_eq!(graph.value, vec![5.0, 4.0]);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = run(
            &sample(),
            &SankeyParams {
                min_value: -1.0,
                ..SankeyParams::default()
            },
        )
        .unwrap_err();
        assert_eq!(err, PipelineError::InvalidThreshold(-1.0));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let err = run(
            &sample(),
            &SankeyParams {
                min_value: f64::NAN,
                ..SankeyParams::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidThreshold(_)));
    }

    #[test]
    fn test_node_budget() {
        let params = SankeyParams {
            max_nodes: Some(3),
            ..SankeyParams::default()
        };
        let err = run(&sample(), &params).unwrap_err();
        assert_eq!(
            err,
            PipelineError::NodeBudgetExceeded {
                nodes: 4,
                max_nodes: 3
            }
        );

        let ok = run(
            &sample(),
            &SankeyParams {
                max_nodes: Some(4),
                ..SankeyParams::default()
            },
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_everything_filtered_is_empty_graph() {
        let graph = run(
            &sample(),
            &SankeyParams {
                min_value: 99.0,
                ..SankeyParams::default()
            },
        )
        .unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_total_preserved_without_filtering() {
        let matrix = sample();
        let graph = run(&matrix, &SankeyParams::default()).unwrap();
        let emitted: f64 = graph.value.iter().sum();
        assert_eq!(emitted, matrix.grand_total());
    }
}
