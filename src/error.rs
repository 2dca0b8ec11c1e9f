//! Errors surfaced at the HTTP edge

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::error::Error as _;
use thiserror::Error;

/// Failures a handler cannot degrade around
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        match &self {
            SiteError::Template(e) => {
                // tera nests the useful part in the source chain
                let mut message = e.to_string();
                let mut source = e.source();
                while let Some(inner) = source {
                    message.push_str(&format!(": {}", inner));
                    source = inner.source();
                }
                tracing::error!("Render failed: {}", message);
            }
        }

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
