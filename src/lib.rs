//! Tributary Flow Visualizer
//!
//! A service that reshapes tabular flow matrices (financing, production,
//! waste trade) into weighted bipartite node/link structures for Sankey
//! rendering, with interactive top-N and minimum-value filtering.
//!
//! # Architecture
//!
//! Three stages, run in order on every parameter change:
//! - Top-N filter: keep the heaviest target columns, then the heaviest
//!   source rows (row totals computed over surviving columns only)
//! - Edge build: flatten to (source, source_total, target, value) records,
//!   dropping values not strictly above the threshold
//! - Bipartite index: sorted label lists per side, target indices offset by
//!   the source count so one flat label array serves the renderer
//!
//! The pure pipeline lives in the `tributary-sankey` crate; this crate adds
//! the dataset catalog, CSV ingestion, the load-once cache and the HTTP
//! visualizer API.
//!
//! ## Example Usage
//!
//! ```rust
//! use tributary::sankey::{FlowMatrix, SankeyParams, run_pipeline};
//!
//! let matrix = FlowMatrix::from_iter([
//!     ("A", vec![("x", 5.0), ("y", 2.0)]),
//!     ("B", vec![("x", 1.0), ("y", 4.0)]),
//! ]);
//!
//! let params = SankeyParams { min_value: 2.0, ..SankeyParams::default() };
//! let graph = run_pipeline(&matrix, &params).unwrap();
//!
//! assert_eq!(graph.node_labels(), vec!["A", "B", "x", "y"]);
//! assert_eq!(graph.value, vec![5.0, 4.0]);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod http;

/// The pure transformation pipeline.
pub use tributary_sankey as sankey;

// Re-export main types for convenience
pub use dataset::{
    load_matrix, DatasetCache, DatasetError, DatasetId, DatasetResult, DatasetSpec,
    UnknownDataset, CATALOG,
};

pub use http::{AppState, HttpServer, SankeyPayload, SankeyQuery, ServerConfig};

pub use tributary_sankey::{
    build_edges, index_edges, run_pipeline, top_n, FlowEdge, FlowMatrix, FlowMatrixStats,
    PipelineError, PipelineResult, SankeyGraph, SankeyParams, TopNLimits,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
