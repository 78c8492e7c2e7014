//! Points and multiplier ("buff") for a single check-in.
//!
//! The calculation is a pure function of the task, the requested
//! multiplicity, the target date and the task's records on the target day and
//! the day before it. Fetching that history and writing the result are the
//! caller's job (see [`crate::service::TallyService`]).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  period::DateWindow,
  record::{NewRecord, Record, total_times},
  task::Task,
};

/// Applied when the task earned positive points on the previous day.
pub const STREAK_BONUS: Decimal = Decimal::from_parts(105, 0, 0, false, 2);

/// Applied when the target day's running total catches up with the previous
/// day's.
pub const OVERTAKE_BONUS: Decimal = Decimal::from_parts(102, 0, 0, false, 2);

/// The values to record for a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkin {
  /// Requested multiplicity after quota clamping.
  pub effective_times: i64,
  pub buff_value:      Decimal,
  pub earned_points:   Decimal,
}

impl Checkin {
  pub fn into_new_record(self, task_id: Uuid, checkin_date: NaiveDate) -> NewRecord {
    NewRecord {
      task_id,
      checkin_date,
      times: self.effective_times,
      earned_points: self.earned_points,
      buff_value: self.buff_value,
    }
  }
}

/// Largest multiplicity a single check-in may request, in either direction.
pub const MAX_CHECKIN_TIMES: i64 = 1_000_000;

/// Reject a zero or out-of-range requested multiplicity.
pub fn validate_times(requested_times: i64) -> Result<()> {
  if requested_times == 0 {
    return Err(Error::InvalidCheckin("times must not be zero".into()));
  }
  if !(-MAX_CHECKIN_TIMES..=MAX_CHECKIN_TIMES).contains(&requested_times) {
    return Err(Error::InvalidCheckin(format!(
      "times must be within ±{MAX_CHECKIN_TIMES}, got {requested_times}"
    )));
  }
  Ok(())
}

/// Compute the check-in of `requested_times` units of `task` on
/// `target_date`.
///
/// `history` must contain at least the task's records for `target_date` and
/// the day before; anything else in it is ignored. Fails with
/// [`Error::PointsOverflow`] when the points leave `Decimal`'s range.
pub fn compute_checkin(
  task: &Task,
  requested_times: i64,
  target_date: NaiveDate,
  history: &[Record],
) -> Result<Checkin> {
  let Some(base_points) = task.base_points else {
    return Ok(Checkin {
      effective_times: requested_times,
      buff_value:      Decimal::ONE,
      earned_points:   Decimal::ONE,
    });
  };

  let target = DateWindow::day(target_date);
  let prior = DateWindow::previous_day(target_date);
  let own = || history.iter().filter(|r| r.task_id == task.task_id);

  let mut buff_value = Decimal::ONE;
  if own()
    .filter(|r| prior.contains(r.checkin_date))
    .any(|r| r.earned_points > Decimal::ZERO)
  {
    buff_value *= STREAK_BONUS;
  }

  let yesterday_times = total_times(own().filter(|r| prior.contains(r.checkin_date)));
  let today_times = total_times(own().filter(|r| target.contains(r.checkin_date)));

  let effective_times = clamp_to_quota(task.quota(), today_times, requested_times);

  if today_times.saturating_add(effective_times) >= yesterday_times {
    buff_value *= OVERTAKE_BONUS;
  }

  let earned_points = base_points
    .checked_mul(Decimal::from(effective_times))
    .and_then(|p| p.checked_mul(buff_value))
    .ok_or(Error::PointsOverflow)?;

  Ok(Checkin { effective_times, buff_value, earned_points })
}

/// Cut `requested` down to what is left of `quota` after `done` units.
///
/// Never raises the request. An exhausted (or already overrun) quota leaves
/// nothing for positive requests.
pub fn clamp_to_quota(quota: Option<i64>, done: i64, requested: i64) -> i64 {
  match quota {
    Some(max) if done.saturating_add(requested) > max => {
      max.saturating_sub(done).max(0).min(requested)
    }
    _ => requested,
  }
}
