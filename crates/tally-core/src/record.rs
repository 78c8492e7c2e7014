//! Check-in records.
//!
//! A record is written once by the check-in path and never updated or
//! deleted. Every statistic is recomputed from records on read.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged occurrence of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub record_id:     Uuid,
  pub task_id:       Uuid,
  /// The calendar day the check-in counts towards. May be in the past.
  pub checkin_date:  NaiveDate,
  /// Server-assigned insertion time; display ordering only.
  pub created_at:    DateTime<Utc>,
  pub times:         i64,
  pub earned_points: Decimal,
  pub buff_value:    Decimal,
}

/// Input to [`crate::store::RecordStore::insert_record`].
/// `record_id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
  pub task_id:       Uuid,
  pub checkin_date:  NaiveDate,
  pub times:         i64,
  pub earned_points: Decimal,
  pub buff_value:    Decimal,
}

/// Sum of `times` over `records`, saturating at the `i64` bounds.
pub fn total_times<'a>(records: impl IntoIterator<Item = &'a Record>) -> i64 {
  records
    .into_iter()
    .fold(0_i64, |acc, r| acc.saturating_add(r.times))
}
