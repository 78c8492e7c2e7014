//! Consecutive-day activity streaks.

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Length of the unbroken run of active days ending at `today`.
///
/// Duplicate dates count once. A run that stopped before `today` yields 0.
pub fn current_streak(
  dates: impl IntoIterator<Item = NaiveDate>,
  today: NaiveDate,
) -> u32 {
  let days: BTreeSet<NaiveDate> = dates.into_iter().collect();
  let mut descending = days.into_iter().rev();

  if descending.next() != Some(today) {
    return 0;
  }

  let mut streak = 1;
  let mut previous = today;
  for date in descending {
    if (previous - date).num_days() != 1 {
      break;
    }
    streak += 1;
    previous = date;
  }
  streak
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;
  use crate::testing::date;

  fn days_ago(today: NaiveDate, n: i64) -> NaiveDate { today - Duration::days(n) }

  #[test]
  fn consecutive_run_ending_today() {
    let today = date(2026, 3, 10);
    let dates = [today, days_ago(today, 1), days_ago(today, 2)];
    assert_eq!(current_streak(dates, today), 3);
  }

  #[test]
  fn missing_today_breaks_the_streak() {
    let today = date(2026, 3, 10);
    let dates = [days_ago(today, 2), days_ago(today, 3)];
    assert_eq!(current_streak(dates, today), 0);
    assert_eq!(current_streak([days_ago(today, 1)], today), 0);
  }

  #[test]
  fn today_alone() {
    let today = date(2026, 3, 10);
    assert_eq!(current_streak([today], today), 1);
  }

  #[test]
  fn empty_is_zero() {
    assert_eq!(current_streak(Vec::new(), date(2026, 3, 10)), 0);
  }

  #[test]
  fn duplicates_and_order_do_not_matter() {
    let today = date(2026, 3, 1);
    let dates = [
      days_ago(today, 1),
      today,
      days_ago(today, 1),
      today,
      days_ago(today, 2),
    ];
    assert_eq!(current_streak(dates, today), 3);
  }

  #[test]
  fn first_gap_ends_the_walk() {
    let today = date(2026, 3, 10);
    let dates = [
      today,
      days_ago(today, 1),
      days_ago(today, 3),
      days_ago(today, 4),
      days_ago(today, 5),
    ];
    assert_eq!(current_streak(dates, today), 2);
  }

  #[test]
  fn crosses_month_boundaries() {
    let today = date(2026, 3, 1);
    let dates = [today, date(2026, 2, 28), date(2026, 2, 27)];
    assert_eq!(current_streak(dates, today), 3);
  }
}
