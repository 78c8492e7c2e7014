//! Async HTTP client wrapping the tally JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::{Serialize, de::DeserializeOwned};
use tally_core::{
  record::Record,
  service::{Stats, TaskStatus},
  task::{FrequencyType, Task},
};
use uuid::Uuid;

/// Request body for `POST /api/tasks`.
#[derive(Debug, Serialize)]
pub struct CreateTask {
  pub name:           String,
  pub description:    Option<String>,
  pub base_points:    Decimal,
  pub frequency_type: FrequencyType,
  pub frequency_max:  i64,
  pub is_consume:     bool,
  pub tags:           Option<String>,
}

#[derive(Debug, Serialize)]
struct Checkin {
  task_id:      Uuid,
  times:        i64,
  checkin_date: Option<NaiveDate>,
}

/// Async HTTP client for the tally JSON REST API.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `GET /api/tasks`
  pub async fn list_tasks(&self) -> Result<Vec<Task>> {
    let resp = self
      .client
      .get(self.url("/tasks"))
      .send()
      .await
      .context("GET /tasks failed")?;
    decode(resp, "GET /tasks").await
  }

  /// `POST /api/tasks`
  pub async fn create_task(&self, body: &CreateTask) -> Result<Task> {
    let resp = self
      .client
      .post(self.url("/tasks"))
      .json(body)
      .send()
      .await
      .context("POST /tasks failed")?;
    decode(resp, "POST /tasks").await
  }

  /// `POST /api/checkins`
  pub async fn checkin(
    &self,
    task_id: Uuid,
    times: i64,
    checkin_date: Option<NaiveDate>,
  ) -> Result<Record> {
    let resp = self
      .client
      .post(self.url("/checkins"))
      .json(&Checkin { task_id, times, checkin_date })
      .send()
      .await
      .context("POST /checkins failed")?;
    decode(resp, "POST /checkins").await
  }

  /// `GET /api/board`
  pub async fn board(&self) -> Result<Vec<TaskStatus>> {
    let resp = self
      .client
      .get(self.url("/board"))
      .send()
      .await
      .context("GET /board failed")?;
    decode(resp, "GET /board").await
  }

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<Stats> {
    let resp = self
      .client
      .get(self.url("/stats"))
      .send()
      .await
      .context("GET /stats failed")?;
    decode(resp, "GET /stats").await
  }

  /// `GET /api/records?limit=<n>`
  pub async fn history(&self, limit: usize) -> Result<Vec<Record>> {
    let resp = self
      .client
      .get(self.url("/records"))
      .query(&[("limit", limit.to_string())])
      .send()
      .await
      .context("GET /records failed")?;
    decode(resp, "GET /records").await
  }
}

/// Deserialise a success body, or surface the server's `{"error": ..}`
/// message alongside the status.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
      .unwrap_or_default();
    return Err(anyhow!("{what} → {status} {message}"));
  }
  resp.json().await.with_context(|| format!("deserialising {what}"))
}
