//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so they sort
//! lexically. Check-in dates are `YYYY-MM-DD`. Decimals are stored as their
//! canonical string form. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use tally_core::{
  record::Record,
  task::{FrequencyType, Task},
};
use tracing::warn;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> { Ok(s.trim().parse()?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `tasks` row.
pub struct RawTask {
  pub task_id:        String,
  pub name:           String,
  pub description:    Option<String>,
  pub base_points:    String,
  pub frequency_type: String,
  pub frequency_max:  i64,
  pub is_consume:     bool,
  pub tags:           Option<String>,
  pub created_at:     String,
}

impl RawTask {
  pub const COLUMNS: &'static str = "task_id, name, description, base_points, \
    frequency_type, frequency_max, is_consume, tags, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      task_id:        row.get(0)?,
      name:           row.get(1)?,
      description:    row.get(2)?,
      base_points:    row.get(3)?,
      frequency_type: row.get(4)?,
      frequency_max:  row.get(5)?,
      is_consume:     row.get(6)?,
      tags:           row.get(7)?,
      created_at:     row.get(8)?,
    })
  }

  /// Tasks are edited outside this store, so a non-numeric `base_points` is
  /// tolerated and surfaces as `None` rather than failing the read.
  pub fn into_task(self) -> Result<Task> {
    let task_id = decode_uuid(&self.task_id)?;
    let base_points = match decode_decimal(&self.base_points) {
      Ok(points) => Some(points),
      Err(e) => {
        warn!(%task_id, raw = %self.base_points, "unreadable base_points: {e}");
        None
      }
    };

    Ok(Task {
      task_id,
      name: self.name,
      description: self.description,
      base_points,
      frequency_type: FrequencyType::parse(&self.frequency_type),
      frequency_max: self.frequency_max,
      is_consume: self.is_consume,
      tags: self.tags,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `checkin_records` row.
pub struct RawRecord {
  pub record_id:     String,
  pub task_id:       String,
  pub checkin_date:  String,
  pub created_at:    String,
  pub times:         i64,
  pub earned_points: String,
  pub buff_value:    String,
}

impl RawRecord {
  pub const COLUMNS: &'static str =
    "record_id, task_id, checkin_date, created_at, times, earned_points, buff_value";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:     row.get(0)?,
      task_id:       row.get(1)?,
      checkin_date:  row.get(2)?,
      created_at:    row.get(3)?,
      times:         row.get(4)?,
      earned_points: row.get(5)?,
      buff_value:    row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      record_id:     decode_uuid(&self.record_id)?,
      task_id:       decode_uuid(&self.task_id)?,
      checkin_date:  decode_date(&self.checkin_date)?,
      created_at:    decode_dt(&self.created_at)?,
      times:         self.times,
      earned_points: decode_decimal(&self.earned_points)?,
      buff_value:    decode_decimal(&self.buff_value)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let a = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    let b = a + chrono::Duration::microseconds(120);
    assert_eq!(encode_dt(a), "2026-01-02T03:04:05.000000Z");
    assert_eq!(encode_dt(a).len(), encode_dt(b).len());
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn dates_and_decimals() {
    let d = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
    assert_eq!(encode_date(d), "2026-03-09");
    assert_eq!(decode_date("2026-03-09").unwrap(), d);
    assert!(decode_date("09/03/2026").is_err());

    let p: Decimal = "-10.71".parse().unwrap();
    assert_eq!(decode_decimal(&encode_decimal(p)).unwrap(), p);
    assert!(decode_decimal("ten").is_err());
  }
}
