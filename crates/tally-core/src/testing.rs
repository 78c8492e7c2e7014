//! Shared fixtures for unit tests.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
  record::Record,
  task::{FrequencyType, Task},
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn task(base_points: i64, frequency_max: i64) -> Task {
  Task {
    task_id: Uuid::new_v4(),
    name: "test task".into(),
    description: None,
    base_points: Some(Decimal::from(base_points)),
    frequency_type: FrequencyType::Daily,
    frequency_max,
    is_consume: base_points < 0,
    tags: None,
    created_at: Utc::now(),
  }
}

pub fn record(task: &Task, on: NaiveDate, times: i64, points: i64) -> Record {
  Record {
    record_id:     Uuid::new_v4(),
    task_id:       task.task_id,
    checkin_date:  on,
    created_at:    Utc::now(),
    times,
    earned_points: Decimal::from(points),
    buff_value:    Decimal::ONE,
  }
}
