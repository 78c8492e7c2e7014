//! JSON REST API for Tally.
//!
//! Exposes an axum [`Router`] backed by a [`TallyService`] over any
//! [`RecordStore`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod health;
pub mod records;
pub mod tasks;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::{TallyService, store::RecordStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<TallyService<S>>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Tasks
    .route("/tasks", get(tasks::list::<S>).post(tasks::create::<S>))
    .route("/tasks/{id}", get(tasks::get_one::<S>))
    .route("/tasks/{id}/completion", get(tasks::completion::<S>))
    .route("/board", get(tasks::board::<S>))
    // Check-ins
    .route("/checkins", post(records::checkin::<S>))
    .route("/records", get(records::history::<S>))
    .route("/stats", get(records::stats::<S>))
    // Ops
    .route("/health", get(health::health::<S>))
    .with_state(service)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use chrono::{Duration, Utc};
  use serde_json::{Value, json};
  use tally_core::Calendar;
  use tally_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(TallyService::new(store, Calendar::utc())))
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(res: Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create_task(app: &Router, body: Value) -> String {
    let res = send(app, "POST", "/tasks", Some(body)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    json_body(res).await["task_id"].as_str().unwrap().to_owned()
  }

  // ── Tasks ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_list_and_get_task() {
    let app = app().await;
    let id = create_task(
      &app,
      json!({ "name": "Run", "base_points": "10", "frequency_max": 1, "tags": "sport" }),
    )
    .await;

    let list = json_body(send(&app, "GET", "/tasks", None).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let res = send(&app, "GET", &format!("/tasks/{id}"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let task = json_body(res).await;
    assert_eq!(task["name"], "Run");
    assert_eq!(task["frequency_type"], "daily");
    assert_eq!(task["frequency_max"], 1);
  }

  #[tokio::test]
  async fn unknown_task_is_404() {
    let app = app().await;
    let res = send(&app, "GET", &format!("/tasks/{}", uuid::Uuid::new_v4()), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(json_body(res).await["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn invalid_quota_is_400() {
    let app = app().await;
    let res = send(
      &app,
      "POST",
      "/tasks",
      Some(json!({ "name": "Run", "base_points": 1, "frequency_max": -3 })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  }

  // ── Check-ins ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn checkins_clamp_and_complete() {
    let app = app().await;
    let id = create_task(
      &app,
      json!({ "name": "Push-ups", "base_points": 10, "frequency_max": 3 }),
    )
    .await;

    let res = send(&app, "POST", "/checkins", Some(json!({ "task_id": id, "times": 2 }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let first = json_body(res).await;
    assert_eq!(first["times"], 2);
    assert_eq!(first["earned_points"], "20.40");
    assert_eq!(first["buff_value"], "1.02");

    let second = json_body(
      send(&app, "POST", "/checkins", Some(json!({ "task_id": id, "times": 2 }))).await,
    )
    .await;
    assert_eq!(second["times"], 1);

    let completion = json_body(
      send(&app, "GET", &format!("/tasks/{id}/completion"), None).await,
    )
    .await;
    assert_eq!(completion["state"], "completed");

    let board = json_body(send(&app, "GET", "/board", None).await).await;
    assert_eq!(board[0]["state"], "completed");
    assert_eq!(board[0]["period_times"], 3);
  }

  #[tokio::test]
  async fn checkin_validation() {
    let app = app().await;
    let id = create_task(&app, json!({ "name": "Read", "base_points": 1 })).await;

    let zero = send(&app, "POST", "/checkins", Some(json!({ "task_id": id, "times": 0 }))).await;
    assert_eq!(zero.status(), StatusCode::BAD_REQUEST);

    let missing = send(
      &app,
      "POST",
      "/checkins",
      Some(json!({ "task_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn oversized_times_are_400() {
    let app = app().await;
    let id = create_task(
      &app,
      json!({ "name": "Push-ups", "base_points": 10, "frequency_max": 3 }),
    )
    .await;
    let first = send(&app, "POST", "/checkins", Some(json!({ "task_id": id, "times": 1 }))).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let huge = send(
      &app,
      "POST",
      "/checkins",
      Some(json!({ "task_id": id, "times": i64::MAX })),
    )
    .await;
    assert_eq!(huge.status(), StatusCode::BAD_REQUEST);

    let board = json_body(send(&app, "GET", "/board", None).await).await;
    assert_eq!(board[0]["period_times"], 1);
  }

  #[tokio::test]
  async fn oversized_base_points_are_400() {
    let app = app().await;
    let res = send(
      &app,
      "POST",
      "/tasks",
      Some(json!({ "name": "Jackpot", "base_points": "50000000000000000000000000000" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn health_reports_ok() {
    let app = app().await;
    let res = send(&app, "GET", "/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["status"], "ok");
  }

  #[tokio::test]
  async fn history_is_newest_first_and_filterable() {
    let app = app().await;
    let a = create_task(&app, json!({ "name": "A", "base_points": 1 })).await;
    let b = create_task(&app, json!({ "name": "B", "base_points": 1 })).await;
    let yesterday = (Utc::now() - Duration::days(1)).date_naive();

    for (task, times) in [(&a, 1), (&b, 2), (&a, 3)] {
      let body = json!({ "task_id": task, "times": times, "checkin_date": yesterday });
      assert_eq!(send(&app, "POST", "/checkins", Some(body)).await.status(), StatusCode::CREATED);
    }

    let all = json_body(send(&app, "GET", "/records", None).await).await;
    let times: Vec<_> = all.as_array().unwrap().iter().map(|r| r["times"].as_i64().unwrap()).collect();
    assert_eq!(times, [3, 2, 1]);

    let only_a = json_body(send(&app, "GET", &format!("/records?task_id={a}&limit=1"), None).await).await;
    assert_eq!(only_a.as_array().unwrap().len(), 1);
    assert_eq!(only_a[0]["times"], 3);

    let bad = send(&app, "GET", "/records?from=2026-01-02&until=2026-01-01", None).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn stats_on_empty_store() {
    let app = app().await;
    let stats = json_body(send(&app, "GET", "/stats", None).await).await;
    assert_eq!(stats["total_points"], "0");
    assert_eq!(stats["today_count"], 0);
    assert_eq!(stats["streak_days"], 0);
    assert_eq!(stats["series"].as_array().unwrap().len(), 15);
  }
}
