//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{ErrorResponse, QueryRequest};
use super::AppState;
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Answer streaming
        .route("/api/stream", get(stream_query).post(stream_query_json))
        // Document upload for later ingestion
        .route("/api/upload", post(upload_file))
        // Version
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================
// Streaming
// ============================================================

async fn stream_query(
    State(state): State<AppState>,
    Query(req): Query<QueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    start_stream(&state, &req.query)
}

async fn stream_query_json(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    start_stream(&state, &req.query)
}

fn start_stream(state: &AppState, query: &str) -> Result<impl IntoResponse, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("query must not be empty".to_string()));
    }

    tracing::info!(chars = query.len(), "Query received");
    Ok(sse_stream(state.run_loop.submit_query(query)))
}

// ============================================================
// Upload
// ============================================================

async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<&'static str, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        let name = safe_filename(&raw_name)
            .ok_or_else(|| AppError::BadRequest(format!("invalid file name: {raw_name:?}")))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let dir = &state.server.upload_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let path = dir.join(&name);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(path = %path.display(), bytes = data.len(), "Stored upload");
        return Ok("done");
    }

    Err(AppError::BadRequest("missing multipart field `file`".to_string()))
}

/// Reduce a client-supplied name to a plain file name.
///
/// Directory components are dropped and spaces become `_`. Names that would
/// resolve outside the upload directory yield `None`.
pub fn safe_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base.replace(' ', "_"))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("omni_agent ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
