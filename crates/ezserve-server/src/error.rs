//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Per-request server error.
///
/// Resolution misses are not errors (they serve the not-found page);
/// this covers faults on files the resolver already vouched for, e.g.
/// permission errors mid-read.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// I/O error reading a resolved file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
