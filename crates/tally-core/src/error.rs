//! Error types for `tally-core`.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("task not found: {0}")]
  TaskNotFound(Uuid),

  #[error("invalid task: {0}")]
  InvalidTask(String),

  #[error("invalid check-in: {0}")]
  InvalidCheckin(String),

  /// A point sum or product left the range `Decimal` can represent.
  #[error("point arithmetic overflowed")]
  PointsOverflow,

  /// The day's running total kept changing underneath a quota check-in.
  #[error("check-in for task {task_id} on {date} lost the quota race repeatedly")]
  Contention { task_id: Uuid, date: NaiveDate },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
