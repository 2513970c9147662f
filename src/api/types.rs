//! API request and response types

use serde::{Deserialize, Serialize};

/// Body of `POST /api/stream`, and the query string of `GET /api/stream`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
