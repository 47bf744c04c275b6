//! The root!
//!
//! Health check on `/`, and a JSON 404 for everything nobody else handles

use axum::Json;
use axum::http::Uri;
use serde::Serialize;

use crate::api::Error;

#[derive(Debug, Serialize)]
pub struct Health {
    message: &'static str,
}

/// Health check
///
/// As long as the process answers, it is healthy
pub async fn health() -> Json<Health> {
    Json(Health { message: "Healthy" })
}

/// Fallback for all unknown routes
pub async fn fallback(uri: Uri) -> Error {
    tracing::debug!("No route for: {}", uri.path());

    Error::not_found("Not found")
}
