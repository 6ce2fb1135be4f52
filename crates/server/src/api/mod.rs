//! HTTP endpoint modules.
//!
//! Shared error mapping lives here in mod.rs.

mod health;
mod ingestion;

pub use health::{health, queue_status};
pub use ingestion::{ingest, ingestion_status, ingestions_list};

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

use batchflow_scheduler::SchedulerError;

pub type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

/// Map a scheduler error to an HTTP response.
///
/// Client errors keep the fixed bodies the ingestion endpoints promise;
/// anything else is logged and reported as 500.
pub(crate) fn scheduler_err(e: SchedulerError) -> (StatusCode, Json<Value>) {
    match e {
        SchedulerError::InvalidInput(detail) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid input", "detail": detail })),
        ),
        SchedulerError::NotFound(_) => not_found(),
        other => {
            error!(error = %other, "internal scheduler error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": other.to_string() })),
            )
        }
    }
}

pub(crate) fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Ingestion ID not found" })),
    )
}
