//! HTTP handlers for the Sankey API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tributary_sankey::{run_pipeline, PipelineError, SankeyParams};

use crate::dataset::{DatasetCache, DatasetError, DatasetId, DatasetSpec, CATALOG};

/// Shared state for all API routes.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DatasetCache>,
    /// Optional node-count ceiling applied to every pipeline run
    pub max_nodes: Option<usize>,
}

/// Query parameters for the sankey endpoint.
///
/// Top-N values arrive signed so that negative requests can be rejected as
/// a contract violation instead of silently wrapping. Omitted parameters
/// fall back to the dataset defaults; over-large ones are clamped by the
/// pipeline.
#[derive(Debug, Default, Deserialize)]
pub struct SankeyQuery {
    pub max_sources: Option<i64>,
    pub max_targets: Option<i64>,
    pub min_value: Option<f64>,
}

/// Renderer payload: one flat label array plus parallel link arrays.
#[derive(Debug, Serialize)]
pub struct SankeyPayload {
    pub dataset: DatasetId,
    pub title: String,
    pub labels: Vec<String>,
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub value: Vec<f64>,
}

fn error_body(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn non_negative(name: &str, value: Option<i64>) -> Result<Option<usize>, axum::response::Response> {
    match value {
        None => Ok(None),
        Some(v) if v < 0 => Err(error_body(
            StatusCode::BAD_REQUEST,
            format!("{} must be non-negative, got {}", name, v),
        )),
        Some(v) => Ok(Some(v as usize)),
    }
}

fn parse_dataset(raw: &str) -> Result<DatasetId, axum::response::Response> {
    raw.parse::<DatasetId>()
        .map_err(|e| error_body(StatusCode::NOT_FOUND, e.to_string()))
}

/// Handler for the dataset catalog listing.
pub async fn datasets_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut entries = Vec::with_capacity(CATALOG.len());
    for spec in &CATALOG {
        let loaded = state.cache.is_loaded(spec.id).await;
        let stats = if loaded {
            state
                .cache
                .get_or_load(spec.id)
                .await
                .ok()
                .map(|matrix| matrix.stats())
        } else {
            None
        };
        entries.push(json!({
            "id": spec.id,
            "title": spec.title,
            "source_role": spec.source_role,
            "target_role": spec.target_role,
            "default_min_value": spec.default_min_value,
            "default_top_n": spec.default_top_n,
            "loaded": loaded,
            "stats": stats,
        }));
    }
    Json(json!({ "datasets": entries }))
}

/// Handler for the sankey transformation endpoint.
///
/// Runs the full filter -> edges -> index pipeline against the cached base
/// matrix. Every call is an independent re-run; only the matrix is shared.
pub async fn sankey_handler(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
    Query(query): Query<SankeyQuery>,
) -> axum::response::Response {
    let id = match parse_dataset(&dataset) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let spec: &DatasetSpec = id.spec();

    let max_sources = match non_negative("max_sources", query.max_sources) {
        Ok(v) => v,
        Err(response) => return response,
    };
    let max_targets = match non_negative("max_targets", query.max_targets) {
        Ok(v) => v,
        Err(response) => return response,
    };

    let matrix = match state.cache.get_or_load(id).await {
        Ok(matrix) => matrix,
        Err(e) => return dataset_error_response(e),
    };

    let params = SankeyParams {
        max_sources: Some(max_sources.unwrap_or(spec.default_top_n)),
        max_targets: Some(max_targets.unwrap_or(spec.default_top_n)),
        min_value: query.min_value.unwrap_or(spec.default_min_value),
        max_nodes: state.max_nodes,
    };

    match run_pipeline(&matrix, &params) {
        Ok(graph) => Json(SankeyPayload {
            dataset: id,
            title: spec.title.to_string(),
            labels: graph.node_labels(),
            source: graph.source,
            target: graph.target,
            value: graph.value,
        })
        .into_response(),
        Err(e @ PipelineError::InvalidThreshold(_)) => {
            error_body(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ PipelineError::NodeBudgetExceeded { .. }) => {
            error_body(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

/// Handler for system status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut cached = Vec::new();
    for id in DatasetId::ALL {
        if state.cache.is_loaded(id).await {
            cached.push(id);
        }
    }
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "data_dir": state.cache.data_dir().display().to_string(),
        "cached_datasets": cached,
    }))
}

/// Handler for invalidating one cached dataset.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
) -> axum::response::Response {
    let id = match parse_dataset(&dataset) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let dropped = state.cache.invalidate(id).await;
    Json(json!({ "dataset": id, "invalidated": dropped })).into_response()
}

/// Handler for invalidating the whole cache.
pub async fn invalidate_all_handler(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.cache.invalidate_all().await;
    Json(json!({ "invalidated": count }))
}

fn dataset_error_response(error: DatasetError) -> axum::response::Response {
    match error {
        DatasetError::UnknownDataset(e) => error_body(StatusCode::NOT_FOUND, e.to_string()),
        other => error_body(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}
