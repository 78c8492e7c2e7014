//! Period-bounded point statistics derived from the record history.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  period::{DateWindow, week_start},
  record::Record,
};

/// Length of the rolling daily series, today included.
pub const SERIES_DAYS: usize = 15;

/// Points earned on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoints {
  pub date:   NaiveDate,
  pub points: Decimal,
}

/// Aggregate view over a record set. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  pub total_points: Decimal,
  /// Points with a check-in date on or after this week's Monday.
  pub week_points:  Decimal,
  pub today_points: Decimal,
  pub today_count:  usize,
  /// [`SERIES_DAYS`] entries, oldest first, ending with `today`.
  pub series:       Vec<DailyPoints>,
}

fn add(acc: Decimal, points: Decimal) -> Result<Decimal> {
  acc.checked_add(points).ok_or(Error::PointsOverflow)
}

/// Summarise `records` relative to `today`.
///
/// Fails with [`Error::PointsOverflow`] rather than panicking when a sum
/// leaves `Decimal`'s range.
pub fn aggregate(records: &[Record], today: NaiveDate) -> Result<Summary> {
  let monday = week_start(today);
  let today_window = DateWindow::day(today);

  let mut total_points = Decimal::ZERO;
  let mut week_points = Decimal::ZERO;
  let mut today_points = Decimal::ZERO;
  let mut today_count = 0;

  for r in records {
    total_points = add(total_points, r.earned_points)?;
    if r.checkin_date >= monday {
      week_points = add(week_points, r.earned_points)?;
    }
    if today_window.contains(r.checkin_date) {
      today_points = add(today_points, r.earned_points)?;
      today_count += 1;
    }
  }

  Ok(Summary {
    total_points,
    week_points,
    today_points,
    today_count,
    series: daily_series(records, today, SERIES_DAYS)?,
  })
}

/// Per-day point sums for the `days` days ending at `today`, oldest first.
///
/// Each day is summed on its own; a day without records yields zero.
pub fn daily_series(
  records: &[Record],
  today: NaiveDate,
  days: usize,
) -> Result<Vec<DailyPoints>> {
  (0..days as i64)
    .rev()
    .map(|offset| {
      let date = today - Duration::days(offset);
      let window = DateWindow::day(date);
      let points = records
        .iter()
        .filter(|r| window.contains(r.checkin_date))
        .try_fold(Decimal::ZERO, |acc, r| add(acc, r.earned_points))?;
      Ok(DailyPoints { date, points })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{date, record, task};

  fn dec(s: &str) -> Decimal { s.parse().unwrap() }

  #[test]
  fn empty_history_is_all_zero() {
    let s = aggregate(&[], date(2026, 1, 7)).unwrap();
    assert_eq!(s.total_points, Decimal::ZERO);
    assert_eq!(s.week_points, Decimal::ZERO);
    assert_eq!(s.today_points, Decimal::ZERO);
    assert_eq!(s.today_count, 0);
    assert_eq!(s.series.len(), SERIES_DAYS);
    assert!(s.series.iter().all(|d| d.points.is_zero()));
  }

  #[test]
  fn sums_by_period() {
    // 2026-01-07 is a Wednesday; the week starts on Monday the 5th.
    let today = date(2026, 1, 7);
    let t = task(10, -1);
    let records = vec![
      record(&t, date(2026, 1, 7), 1, 10),
      record(&t, date(2026, 1, 7), 2, 20),
      record(&t, date(2026, 1, 5), 1, 10),
      record(&t, date(2026, 1, 4), 1, 10),
      record(&t, date(2025, 11, 1), 1, 10),
    ];
    let s = aggregate(&records, today).unwrap();
    assert_eq!(s.total_points, Decimal::from(60));
    assert_eq!(s.week_points, Decimal::from(40));
    assert_eq!(s.today_points, Decimal::from(30));
    assert_eq!(s.today_count, 2);
  }

  #[test]
  fn series_is_oldest_first_and_keeps_empty_days() {
    let today = date(2026, 1, 7);
    let t = task(10, -1);
    let records = vec![
      record(&t, today, 1, 10),
      record(&t, date(2026, 1, 5), 1, 7),
      record(&t, date(2025, 12, 24), 1, 3),
      // Outside the window on both sides.
      record(&t, date(2025, 12, 23), 1, 100),
      record(&t, date(2026, 1, 8), 1, 100),
    ];
    let s = aggregate(&records, today).unwrap();
    assert_eq!(s.series.first().unwrap().date, date(2025, 12, 24));
    assert_eq!(s.series.first().unwrap().points, Decimal::from(3));
    assert_eq!(s.series.last().unwrap().date, today);
    assert_eq!(s.series.last().unwrap().points, Decimal::from(10));
    assert_eq!(s.series[13].points, Decimal::ZERO);
    assert_eq!(s.series[12].points, Decimal::from(7));
  }

  #[test]
  fn fractional_points_are_exact() {
    let today = date(2026, 1, 7);
    let t = task(10, -1);
    let mut a = record(&t, today, 1, 0);
    a.earned_points = dec("10.2");
    let mut b = record(&t, today, 1, 0);
    b.earned_points = dec("0.1");
    let mut c = record(&t, today, 1, 0);
    c.earned_points = dec("-3.05");
    let s = aggregate(&[a, b, c], today).unwrap();
    assert_eq!(s.today_points, dec("7.25"));
    assert_eq!(s.total_points.to_string(), "7.25");
  }

  #[test]
  fn overflowing_sums_are_an_error() {
    let today = date(2026, 1, 7);
    let t = task(10, -1);
    let mut a = record(&t, today, 1, 0);
    a.earned_points = dec("50000000000000000000000000000");
    let b = a.clone();
    assert!(matches!(aggregate(&[a.clone(), b.clone()], today), Err(Error::PointsOverflow)));
    assert!(matches!(daily_series(&[a, b], today, 1), Err(Error::PointsOverflow)));
  }
}
