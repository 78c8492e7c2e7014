//! Task definitions, the recurring activities check-ins are logged against.
//!
//! Tasks are managed outside the scoring engine and are treated as immutable
//! for the duration of any single evaluation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// `frequency_max` value meaning "no quota".
pub const UNLIMITED: i64 = -1;

/// Largest per-unit point value, positive or negative, a task may carry.
pub const MAX_BASE_POINTS: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

// ─── Frequency ───────────────────────────────────────────────────────────────

/// How often a task's quota resets.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyType {
  #[default]
  Daily,
  Weekly,
  Monthly,
  Unspecified,
}

impl FrequencyType {
  /// The discriminant string stored in the `frequency_type` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Daily => "daily",
      Self::Weekly => "weekly",
      Self::Monthly => "monthly",
      Self::Unspecified => "unspecified",
    }
  }

  /// Inverse of [`Self::as_str`]; unknown strings map to `Unspecified`.
  pub fn parse(s: &str) -> Self {
    match s {
      "daily" => Self::Daily,
      "weekly" => Self::Weekly,
      "monthly" => Self::Monthly,
      _ => Self::Unspecified,
    }
  }
}

// ─── Task ────────────────────────────────────────────────────────────────────

/// A recurring activity with a point value and an optional quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  pub task_id:        Uuid,
  pub name:           String,
  pub description:    Option<String>,
  /// Points per unit. Negative for consumption tasks. `None` when the stored
  /// value could not be read as a number.
  pub base_points:    Option<Decimal>,
  pub frequency_type: FrequencyType,
  /// Units allowed per period; [`UNLIMITED`] disables the quota.
  pub frequency_max:  i64,
  pub is_consume:     bool,
  /// Category label for display.
  pub tags:           Option<String>,
  pub created_at:     DateTime<Utc>,
}

impl Task {
  /// The per-period quota, or `None` for unlimited tasks.
  ///
  /// Only `-1` is ever written, but any negative value reads as unlimited.
  pub fn quota(&self) -> Option<i64> {
    (self.frequency_max >= 0).then_some(self.frequency_max)
  }

  pub fn is_unlimited(&self) -> bool { self.quota().is_none() }
}

// ─── NewTask ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::add_task`].
#[derive(Debug, Clone)]
pub struct NewTask {
  pub name:           String,
  pub description:    Option<String>,
  pub base_points:    Decimal,
  pub frequency_type: FrequencyType,
  pub frequency_max:  i64,
  pub is_consume:     bool,
  pub tags:           Option<String>,
}

impl NewTask {
  /// Daily, unlimited task worth `base_points` per unit.
  pub fn new(name: impl Into<String>, base_points: Decimal) -> Self {
    Self {
      name: name.into(),
      description: None,
      base_points,
      frequency_type: FrequencyType::Daily,
      frequency_max: UNLIMITED,
      is_consume: false,
      tags: None,
    }
  }

  /// Builder-style quota setter.
  pub fn with_quota(mut self, frequency_max: i64) -> Self {
    self.frequency_max = frequency_max;
    self
  }

  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::InvalidTask("name must not be empty".into()));
    }
    if self.base_points.abs() > MAX_BASE_POINTS {
      return Err(Error::InvalidTask(format!(
        "base_points must be within ±{MAX_BASE_POINTS}, got {}",
        self.base_points
      )));
    }
    if self.frequency_max < UNLIMITED {
      return Err(Error::InvalidTask(format!(
        "frequency_max must be -1 or non-negative, got {}",
        self.frequency_max
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn negative_one_is_unlimited() {
    let task = Task {
      task_id:        Uuid::new_v4(),
      name:           "read".into(),
      description:    None,
      base_points:    Some(Decimal::TEN),
      frequency_type: FrequencyType::Daily,
      frequency_max:  UNLIMITED,
      is_consume:     false,
      tags:           None,
      created_at:     Utc::now(),
    };
    assert!(task.is_unlimited());
    assert_eq!(Task { frequency_max: 0, ..task.clone() }.quota(), Some(0));
    assert_eq!(Task { frequency_max: 3, ..task }.quota(), Some(3));
  }

  #[test]
  fn validate_rejects_bad_quota_and_blank_name() {
    assert!(NewTask::new("run", Decimal::ONE).with_quota(-2).validate().is_err());
    assert!(NewTask::new("  ", Decimal::ONE).validate().is_err());
    assert!(NewTask::new("run", Decimal::ONE).with_quota(0).validate().is_ok());
  }

  #[test]
  fn validate_bounds_base_points() {
    assert!(NewTask::new("spend", -MAX_BASE_POINTS).validate().is_ok());
    assert!(NewTask::new("big", MAX_BASE_POINTS + Decimal::ONE).validate().is_err());
    let huge: Decimal = "50000000000000000000000000000".parse().unwrap();
    assert!(matches!(
      NewTask::new("huge", huge).validate(),
      Err(Error::InvalidTask(_))
    ));
  }

  #[test]
  fn frequency_type_strings_roundtrip() {
    for f in [
      FrequencyType::Daily,
      FrequencyType::Weekly,
      FrequencyType::Monthly,
      FrequencyType::Unspecified,
    ] {
      assert_eq!(FrequencyType::parse(f.as_str()), f);
    }
    assert_eq!(FrequencyType::parse("yearly"), FrequencyType::Unspecified);
  }
}
