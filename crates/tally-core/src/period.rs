//! Calendar boundaries in an explicit reference timezone.
//!
//! Every "today", "yesterday" and "this week" in the engine is resolved
//! through a [`Calendar`], never through the host's local clock, so the same
//! inputs always land in the same windows.

use chrono::{
  DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime,
  Offset as _, Utc,
};
use serde::{Deserialize, Serialize};

use crate::task::FrequencyType;

// ─── Calendar ────────────────────────────────────────────────────────────────

/// The reference timezone used to turn instants into calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
  offset: FixedOffset,
}

impl Calendar {
  pub fn new(offset: FixedOffset) -> Self { Self { offset } }

  pub fn utc() -> Self { Self { offset: Utc.fix() } }

  pub fn offset(&self) -> FixedOffset { self.offset }

  /// The calendar date `at` falls on in the reference timezone.
  pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&self.offset).date_naive()
  }

  /// Same as [`Self::date_of`]; reads better at call sites that pass `now`.
  pub fn today(&self, now: DateTime<Utc>) -> NaiveDate { self.date_of(now) }

  /// `[start, end)` of `date` as instants in the reference timezone.
  ///
  /// The engine itself works on dates; this is the inverse of
  /// [`Self::date_of`] for callers that need to query instant-stamped data
  /// (such as `created_at`) by calendar day.
  pub fn day_bounds(
    &self,
    date: NaiveDate,
  ) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    (self.midnight(date), self.midnight(date + Duration::days(1)))
  }

  fn midnight(&self, date: NaiveDate) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local - Duration::seconds(i64::from(self.offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, self.offset)
  }
}

impl Default for Calendar {
  fn default() -> Self { Self::utc() }
}

// ─── Windows ─────────────────────────────────────────────────────────────────

/// A right-exclusive range of calendar dates: `start <= d < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateWindow {
  /// The single day `date`.
  pub fn day(date: NaiveDate) -> Self {
    Self { start: date, end: date + Duration::days(1) }
  }

  /// The day before `date`.
  pub fn previous_day(date: NaiveDate) -> Self {
    Self::day(date - Duration::days(1))
  }

  /// The Monday-to-Sunday week containing `date`.
  pub fn week_of(date: NaiveDate) -> Self {
    let start = week_start(date);
    Self { start, end: start + Duration::days(7) }
  }

  /// The calendar month containing `date`.
  pub fn month_of(date: NaiveDate) -> Self {
    let start = date - Duration::days(i64::from(date.day0()));
    let end = start
      .checked_add_months(Months::new(1))
      .unwrap_or(NaiveDate::MAX);
    Self { start, end }
  }

  /// Smallest window covering both `self` and `other`.
  pub fn span(self, other: Self) -> Self {
    Self {
      start: self.start.min(other.start),
      end:   self.end.max(other.end),
    }
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date < self.end
  }

  /// Number of days in the window.
  pub fn days(&self) -> i64 { (self.end - self.start).num_days() }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
  date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

// ─── Period resolution ───────────────────────────────────────────────────────

/// Maps a date to the quota period containing it.
pub trait PeriodResolver {
  fn window(&self, date: NaiveDate) -> DateWindow;
}

impl PeriodResolver for FrequencyType {
  /// Only the daily period is defined. Weekly, monthly and unspecified tasks
  /// are evaluated against the same day window until their boundaries are
  /// settled.
  fn window(&self, date: NaiveDate) -> DateWindow {
    match self {
      FrequencyType::Daily
      | FrequencyType::Weekly
      | FrequencyType::Monthly
      | FrequencyType::Unspecified => DateWindow::day(date),
    }
  }
}
