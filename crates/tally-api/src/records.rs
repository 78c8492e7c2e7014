//! Handlers for check-ins and record history.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/checkins` | Body: [`CheckinBody`]; returns 201 + stored record |
//! | `GET`  | `/records` | Newest first; optional `task_id`, `from`, `until`, `limit` |
//! | `GET`  | `/stats` | Totals, 15-day series and current streak |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tally_core::{
  TallyService,
  record::Record,
  service::{RECENT_LIMIT, Stats},
  store::{RecordOrder, RecordQuery, RecordStore},
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Check in ─────────────────────────────────────────────────────────────────

fn one() -> i64 { 1 }

/// JSON body accepted by `POST /checkins`.
#[derive(Debug, Deserialize)]
pub struct CheckinBody {
  pub task_id:      Uuid,
  /// Requested multiplicity; negative values reverse earlier check-ins.
  #[serde(default = "one")]
  pub times:        i64,
  /// Day to attribute the check-in to. Defaults to today.
  pub checkin_date: Option<NaiveDate>,
}

/// `POST /checkins` — returns 201 + the stored [`Record`].
///
/// The stored `times` may be lower than requested when the task's quota is
/// nearly used up. A zero or out-of-range `times` is a 400.
pub async fn checkin<S>(
  State(service): State<Arc<TallyService<S>>>,
  Json(body): Json<CheckinBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let record = service
    .log_checkin(body.task_id, body.times, body.checkin_date, Utc::now())
    .await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── History ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct HistoryParams {
  pub task_id: Option<Uuid>,
  /// Inclusive lower bound on `checkin_date`.
  pub from:    Option<NaiveDate>,
  /// Exclusive upper bound on `checkin_date`.
  pub until:   Option<NaiveDate>,
  pub limit:   Option<usize>,
}

/// `GET /records[?task_id=...][&from=...][&until=...][&limit=...]`
pub async fn history<S>(
  State(service): State<Arc<TallyService<S>>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: RecordStore,
{
  if let (Some(from), Some(until)) = (params.from, params.until)
    && from >= until
  {
    return Err(ApiError::BadRequest(format!(
      "empty range: from {from} is not before until {until}"
    )));
  }

  let query = RecordQuery {
    task_id:       params.task_id,
    checkin_from:  params.from,
    checkin_until: params.until,
    order:         RecordOrder::CreatedDesc,
    limit:         Some(params.limit.unwrap_or(RECENT_LIMIT)),
  };
  Ok(Json(service.records(&query).await?))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// `GET /stats`
pub async fn stats<S>(
  State(service): State<Arc<TallyService<S>>>,
) -> Result<Json<Stats>, ApiError>
where
  S: RecordStore,
{
  Ok(Json(service.stats(Utc::now()).await?))
}
