pub mod matrix;
pub mod filter;
pub mod edges;
pub mod indexer;
pub mod pipeline;

pub use matrix::{FlowMatrix, FlowMatrixStats};
pub use filter::{top_n, TopNLimits};
pub use edges::{build as build_edges, FlowEdge};
pub use indexer::{index as index_edges, SankeyGraph};
pub use pipeline::{run as run_pipeline, PipelineError, PipelineResult, SankeyParams};
