//! The `RecordStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `tally-store-sqlite`
//! and the in-process [`crate::memory::MemoryStore`]). The scoring engine
//! and the HTTP layer depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  period::DateWindow,
  record::{NewRecord, Record},
  task::{NewTask, Task},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Result ordering for [`RecordStore::query_records`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrder {
  /// Oldest check-in date first; ties broken by insertion time.
  #[default]
  CheckinAsc,
  /// Most recently inserted first.
  CreatedDesc,
}

/// Parameters for [`RecordStore::query_records`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
  pub task_id:       Option<Uuid>,
  /// Inclusive lower bound on `checkin_date`.
  pub checkin_from:  Option<NaiveDate>,
  /// Exclusive upper bound on `checkin_date`.
  pub checkin_until: Option<NaiveDate>,
  pub order:         RecordOrder,
  pub limit:         Option<usize>,
}

impl RecordQuery {
  /// Every record of every task.
  pub fn all() -> Self { Self::default() }

  /// Records of all tasks inside `window`.
  pub fn within(window: DateWindow) -> Self {
    Self {
      checkin_from: Some(window.start),
      checkin_until: Some(window.end),
      ..Self::default()
    }
  }

  /// Records of `task_id` inside `window`.
  pub fn task_within(task_id: Uuid, window: DateWindow) -> Self {
    Self { task_id: Some(task_id), ..Self::within(window) }
  }

  /// Whether `record` passes the filters (ordering and limit aside).
  pub fn matches(&self, record: &Record) -> bool {
    self.task_id.is_none_or(|id| id == record.task_id)
      && self.checkin_from.is_none_or(|d| record.checkin_date >= d)
      && self.checkin_until.is_none_or(|d| record.checkin_date < d)
  }
}

// ─── Conditional writes ──────────────────────────────────────────────────────

/// Precondition for [`RecordStore::insert_record_guarded`]: the sum of
/// `times` already stored for the record's task and check-in date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaGuard {
  pub expected_times: i64,
}

/// Outcome of a guarded insert.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardedInsert {
  Inserted(Record),
  /// The day's total no longer matched the guard; nothing was written.
  Stale { current_times: i64 },
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Tally storage backend.
///
/// Records are append-only: no method updates or deletes one. All methods
/// return `Send` futures so the trait can be used in multi-threaded async
/// runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Tasks ─────────────────────────────────────────────────────────────

  /// Persist a new task. `task_id` and `created_at` are set by the store.
  fn add_task(
    &self,
    input: NewTask,
  ) -> impl Future<Output = Result<Task, Self::Error>> + Send + '_;

  /// Retrieve a task by UUID. Returns `None` if not found.
  fn get_task(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Task>, Self::Error>> + Send + '_;

  /// All tasks, oldest first.
  fn list_tasks(
    &self,
  ) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send + '_;

  // ── Records ───────────────────────────────────────────────────────────

  fn query_records<'a>(
    &'a self,
    query: &'a RecordQuery,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// Append a record unconditionally.
  fn insert_record(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Append a record only if the stored `times` total for
  /// `(input.task_id, input.checkin_date)` still equals
  /// `guard.expected_times`. The check and the write are atomic.
  fn insert_record_guarded(
    &self,
    input: NewRecord,
    guard: QuotaGuard,
  ) -> impl Future<Output = Result<GuardedInsert, Self::Error>> + Send + '_;
}
