use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
pub struct FormatsResponse {
    /// Canonical ids of the formats `/convert` can produce.
    pub formats: Vec<String>,
}

pub async fn formats(State(state): State<Arc<AppState>>) -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: state
            .supported_formats()
            .into_iter()
            .map(|f| f.as_str().to_string())
            .collect(),
    })
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
