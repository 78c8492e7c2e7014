//! `GET /health`: store reachability.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tally_core::{TallyService, store::RecordStore};

/// `GET /health` — 200 `{"status":"ok"}`, or 503 when the store read fails.
pub async fn health<S>(
  State(service): State<Arc<TallyService<S>>>,
) -> (StatusCode, Json<Value>)
where
  S: RecordStore,
{
  match service.check_store().await {
    Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
    Err(e) => {
      tracing::warn!("health check failed: {e}");
      (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": "unavailable", "error": e.to_string() })),
      )
    }
  }
}
