use std::sync::Arc;
use tributary::dataset::{DatasetCache, DatasetId};
use tributary::http::{HttpServer, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Tributary Flow Visualizer v{}", tributary::version());
    println!("==========================================");
    println!();

    let config = config_from_env();
    let cache = Arc::new(DatasetCache::new(config.data_dir.clone()));

    warm_cache(&cache).await;

    println!("Serving on http://{}:{}", config.address, config.port);
    println!("  GET /api/datasets");
    println!("  GET /api/sankey/{{dataset}}?max_sources=&max_targets=&min_value=");
    println!("  GET /api/status");
    println!();
    println!("✅ Server ready. Press Ctrl+C to stop.");
    println!();

    let server = HttpServer::new(config, cache);
    if let Err(e) = server.start().await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn config_from_env() -> ServerConfig {
    let mut config = ServerConfig::default();
    if let Ok(address) = std::env::var("TRIBUTARY_ADDRESS") {
        config.address = address;
    }
    if let Ok(port) = std::env::var("TRIBUTARY_PORT") {
        match port.parse() {
            Ok(port) => config.port = port,
            Err(_) => tracing::warn!(%port, "ignoring unparseable TRIBUTARY_PORT"),
        }
    }
    if let Ok(data_dir) = std::env::var("TRIBUTARY_DATA_DIR") {
        config.data_dir = data_dir;
    }
    if let Ok(max_nodes) = std::env::var("TRIBUTARY_MAX_NODES") {
        match max_nodes.parse() {
            Ok(max_nodes) => config.max_nodes = Some(max_nodes),
            Err(_) => tracing::warn!(%max_nodes, "ignoring unparseable TRIBUTARY_MAX_NODES"),
        }
    }
    config
}

/// Preload whatever matrices are present so the first request is warm.
/// Missing files are fine; those datasets load (or fail) on demand.
async fn warm_cache(cache: &DatasetCache) {
    for id in DatasetId::ALL {
        match cache.get_or_load(id).await {
            Ok(matrix) => {
                let stats = matrix.stats();
                println!(
                    "✓ Loaded {}: {} sources x {} targets, total {:.1}",
                    id, stats.rows, stats.columns, stats.total
                );
            }
            Err(e) => {
                tracing::warn!(dataset = %id, error = %e, "dataset not preloaded");
            }
        }
    }
}
