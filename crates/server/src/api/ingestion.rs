//! Handlers for submitting ingestions and querying their progress.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use batchflow_scheduler::{IngestionStatus, IngestionSummary, SchedulerError, Submission};

use super::{not_found, scheduler_err, ApiResult};
use crate::state::AppState;

/// POST /ingest: validate `{ids, priority}` and schedule its batches.
///
/// The body is read raw so malformed JSON gets the same 400 as a bad shape.
pub async fn ingest(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Json<Value>> {
    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "rejecting unparseable ingest body");
        scheduler_err(SchedulerError::InvalidInput(format!("malformed JSON: {}", e)))
    })?;
    let submission = Submission::from_json(&value).map_err(scheduler_err)?;
    let ingestion_id = state.planner.submit(submission).map_err(scheduler_err)?;
    Ok(Json(json!({ "ingestion_id": ingestion_id })))
}

/// GET /status/{ingestion_id}
///
/// Ids that are not UUIDs cannot have been issued, so they are reported as
/// not found rather than as a bad request.
pub async fn ingestion_status(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<IngestionStatus>> {
    let ingestion_id = Uuid::parse_str(&raw_id).map_err(|_| not_found())?;
    let status = state.store.get(&ingestion_id).map_err(scheduler_err)?;
    Ok(Json(status))
}

/// GET /ingestions: every known ingestion, oldest first.
pub async fn ingestions_list(State(state): State<Arc<AppState>>) -> Json<Vec<IngestionSummary>> {
    Json(state.store.list())
}
