//! Completion state: whether a task's quota is met for the current period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  period::PeriodResolver as _,
  record::{Record, total_times},
  task::Task,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
  /// More check-ins are still accepted (or the task has no quota).
  Active,
  /// The period's quota has been reached.
  Completed,
}

impl CompletionState {
  pub fn is_completed(&self) -> bool { matches!(self, Self::Completed) }
}

/// Evaluate `task` against `records` for the period containing `today`.
///
/// Records belonging to other tasks or falling outside the period are
/// ignored, so callers may pass a wider slice than strictly needed.
pub fn evaluate(
  task: &Task,
  records: &[Record],
  today: NaiveDate,
) -> CompletionState {
  let Some(quota) = task.quota() else {
    return CompletionState::Active;
  };

  let window = task.frequency_type.window(today);
  let done = total_times(
    records
      .iter()
      .filter(|r| r.task_id == task.task_id && window.contains(r.checkin_date)),
  );

  if done >= quota {
    CompletionState::Completed
  } else {
    CompletionState::Active
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;
  use crate::{
    task::FrequencyType,
    testing::{date, record, task},
  };

  #[test]
  fn unlimited_tasks_never_complete() {
    let t = task(10, -1);
    let today = date(2026, 4, 1);
    let records: Vec<_> = (0..500).map(|_| record(&t, today, 5, 50)).collect();
    assert_eq!(evaluate(&t, &records, today), CompletionState::Active);
  }

  #[test]
  fn completes_exactly_at_quota() {
    let t = task(10, 3);
    let today = date(2026, 4, 1);
    let two = vec![record(&t, today, 1, 10), record(&t, today, 1, 10)];
    assert_eq!(evaluate(&t, &two, today), CompletionState::Active);

    let mut three = two.clone();
    three.push(record(&t, today, 1, 10));
    assert_eq!(evaluate(&t, &three, today), CompletionState::Completed);

    three.push(record(&t, today, 2, 20));
    assert!(evaluate(&t, &three, today).is_completed());
  }

  #[test]
  fn zero_quota_is_completed_immediately() {
    let t = task(10, 0);
    assert!(evaluate(&t, &[], date(2026, 4, 1)).is_completed());
  }

  #[test]
  fn ignores_other_days_and_other_tasks() {
    let t = task(10, 2);
    let other = task(10, 2);
    let today = date(2026, 4, 1);
    let records = vec![
      record(&t, today - Duration::days(1), 5, 50),
      record(&t, today + Duration::days(1), 5, 50),
      record(&other, today, 5, 50),
      record(&t, today, 1, 10),
    ];
    assert_eq!(evaluate(&t, &records, today), CompletionState::Active);
  }

  #[test]
  fn weekly_tasks_use_the_day_window() {
    let mut t = task(10, 2);
    t.frequency_type = FrequencyType::Weekly;
    let today = date(2026, 4, 1);
    let records = vec![
      record(&t, today - Duration::days(1), 1, 10),
      record(&t, today, 1, 10),
    ];
    assert_eq!(evaluate(&t, &records, today), CompletionState::Active);
  }

  #[test]
  fn negative_times_reopen_the_quota() {
    let t = task(10, 2);
    let today = date(2026, 4, 1);
    let records = vec![record(&t, today, 2, 20), record(&t, today, -1, -10)];
    assert_eq!(evaluate(&t, &records, today), CompletionState::Active);
  }
}
