//! HTTP visualizer: API handlers, router and server

pub mod handler;
pub mod server;

pub use handler::{AppState, SankeyPayload, SankeyQuery};
pub use server::{router, HttpServer, ServerConfig};
