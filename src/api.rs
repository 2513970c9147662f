//! HTTP API
//!
//! Streams run events over SSE and accepts document uploads.

mod handlers;
mod sse;
mod types;

pub use handlers::{create_router, safe_filename};
pub use sse::{sse_stream, to_axum_event};
pub use types::*;

use crate::config::ServerConfig;
use crate::runtime::RunLoop;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub run_loop: Arc<RunLoop>,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(run_loop: RunLoop, server: ServerConfig) -> Self {
        Self {
            run_loop: Arc::new(run_loop),
            server,
        }
    }
}

/// Bind the configured port on all interfaces
pub async fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server listening");
    Ok(listener)
}

/// Serve the API on `listener` until the task is dropped
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, create_router(state)).await
}
