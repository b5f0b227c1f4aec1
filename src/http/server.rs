//! HTTP server for the Sankey visualizer

use axum::{
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use super::handler::{
    datasets_handler, invalidate_all_handler, invalidate_handler, sankey_handler, status_handler,
    AppState,
};
use crate::dataset::DatasetCache;

#[derive(RustEmbed)]
#[folder = "src/http/static/"]
struct Assets;

async fn static_handler() -> impl IntoResponse {
    match Assets::get("index.html") {
        Some(content) => {
            Html(String::from_utf8_lossy(content.data.as_ref()).into_owned()).into_response()
        }
        None => (
            axum::http::StatusCode::NOT_FOUND,
            "index.html missing from embedded assets",
        )
            .into_response(),
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
    /// Directory holding the dataset CSV files
    pub data_dir: String,
    /// Optional ceiling on rendered node count (None = unbounded)
    pub max_nodes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8780,
            data_dir: "./data".to_string(),
            max_nodes: None,
        }
    }
}

/// Build the API router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(static_handler))
        .route("/api/datasets", get(datasets_handler))
        .route("/api/sankey/:dataset", get(sankey_handler))
        .route("/api/status", get(status_handler))
        .route("/api/invalidate/:dataset", post(invalidate_handler))
        .route("/api/invalidate", post(invalidate_all_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server managing the visualizer API and static page.
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over a dataset cache.
    pub fn new(config: ServerConfig, cache: Arc<DatasetCache>) -> Self {
        let state = AppState {
            cache,
            max_nodes: config.max_nodes,
        };
        Self { config, state }
    }

    /// Start the HTTP server.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.state.clone());

        let addr = format!("{}:{}", self.config.address, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Visualizer available at http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
