//! Handlers for `/tasks` and `/board`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tasks` | All tasks, oldest first |
//! | `POST` | `/tasks` | Body: [`CreateBody`]; returns 201 + stored task |
//! | `GET`  | `/tasks/:id` | 404 if not found |
//! | `GET`  | `/tasks/:id/completion` | `{"task_id":..,"state":"active"\|"completed"}` |
//! | `GET`  | `/board` | Every task with its state and current-period total |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{
  TallyService,
  completion::CompletionState,
  service::TaskStatus,
  store::RecordStore,
  task::{FrequencyType, NewTask, Task, UNLIMITED},
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /tasks`
pub async fn list<S>(
  State(service): State<Arc<TallyService<S>>>,
) -> Result<Json<Vec<Task>>, ApiError>
where
  S: RecordStore,
{
  Ok(Json(service.list_tasks().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

fn unlimited() -> i64 { UNLIMITED }

/// JSON body accepted by `POST /tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:           String,
  pub description:    Option<String>,
  pub base_points:    Decimal,
  #[serde(default)]
  pub frequency_type: FrequencyType,
  /// Omitted means unlimited.
  #[serde(default = "unlimited")]
  pub frequency_max:  i64,
  #[serde(default)]
  pub is_consume:     bool,
  pub tags:           Option<String>,
}

impl From<CreateBody> for NewTask {
  fn from(b: CreateBody) -> Self {
    NewTask {
      name:           b.name,
      description:    b.description,
      base_points:    b.base_points,
      frequency_type: b.frequency_type,
      frequency_max:  b.frequency_max,
      is_consume:     b.is_consume,
      tags:           b.tags,
    }
  }
}

/// `POST /tasks` — returns 201 + the stored [`Task`].
pub async fn create<S>(
  State(service): State<Arc<TallyService<S>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let task = service.add_task(NewTask::from(body)).await?;
  Ok((StatusCode::CREATED, Json(task)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /tasks/:id`
pub async fn get_one<S>(
  State(service): State<Arc<TallyService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError>
where
  S: RecordStore,
{
  Ok(Json(service.get_task(id).await?))
}

// ─── Completion ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionBody {
  pub task_id: Uuid,
  pub state:   CompletionState,
}

/// `GET /tasks/:id/completion`
pub async fn completion<S>(
  State(service): State<Arc<TallyService<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CompletionBody>, ApiError>
where
  S: RecordStore,
{
  let task = service.get_task(id).await?;
  let state = service.completion(&task, Utc::now()).await?;
  Ok(Json(CompletionBody { task_id: id, state }))
}

// ─── Board ────────────────────────────────────────────────────────────────────

/// `GET /board`
pub async fn board<S>(
  State(service): State<Arc<TallyService<S>>>,
) -> Result<Json<Vec<TaskStatus>>, ApiError>
where
  S: RecordStore,
{
  Ok(Json(service.board(Utc::now()).await?))
}
