//! Health and queue status endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub processor_running: bool,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        processor_running: !state.processor.is_shutdown(),
    })
}

/// GET /queue/status: pending jobs per priority plus processor metrics.
pub async fn queue_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "pending": state.queue.len(),
        "pending_by_priority": state.queue.pending_by_priority(),
        "ingestions": state.store.len(),
        "metrics": state.processor.metrics(),
        "config": state.config.summary(),
    }))
}
