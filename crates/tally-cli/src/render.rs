//! Plain-text rendering of API responses.

use std::{collections::HashMap, fmt::Write as _};

use tally_core::{
  completion::CompletionState,
  record::Record,
  service::{Stats, TaskStatus},
  task::Task,
};
use uuid::Uuid;

fn quota(task: &Task) -> String {
  match task.quota() {
    Some(max) => max.to_string(),
    None => "∞".to_string(),
  }
}

fn points(task: &Task) -> String {
  task
    .base_points
    .map(|p| p.to_string())
    .unwrap_or_else(|| "?".to_string())
}

pub fn tasks(tasks: &[Task]) -> String {
  let mut out = String::new();
  if tasks.is_empty() {
    out.push_str("no tasks\n");
    return out;
  }
  for task in tasks {
    let _ = writeln!(
      out,
      "{:<24} {:>8} pts  quota {:>3}  {}  {}",
      task.name,
      points(task),
      quota(task),
      task.frequency_type.as_str(),
      task.task_id,
    );
  }
  out
}

pub fn board(board: &[TaskStatus]) -> String {
  let mut out = String::new();
  for status in board {
    let mark = match status.state {
      CompletionState::Completed => "x",
      CompletionState::Active => " ",
    };
    let _ = writeln!(
      out,
      "[{mark}] {:<24} {}/{}",
      status.task.name,
      status.period_times,
      quota(&status.task),
    );
  }
  out
}

pub fn checkin(task: &Task, record: &Record) -> String {
  let mut out = format!(
    "{} ×{} on {}: {} pts (buff {})\n",
    task.name, record.times, record.checkin_date, record.earned_points, record.buff_value,
  );
  if record.times == 0 {
    out.push_str("quota already reached; nothing earned\n");
  }
  out
}

pub fn stats(stats: &Stats) -> String {
  let summary = &stats.summary;
  let mut out = String::new();
  let _ = writeln!(out, "total   {}", summary.total_points);
  let _ = writeln!(out, "week    {}", summary.week_points);
  let _ = writeln!(
    out,
    "today   {} ({} check-ins)",
    summary.today_points, summary.today_count
  );
  let _ = writeln!(out, "streak  {} days", stats.streak_days);
  out.push('\n');
  for day in &summary.series {
    let _ = writeln!(out, "{}  {:>8}", day.date, day.points);
  }
  out
}

pub fn history(tasks: &[Task], records: &[Record]) -> String {
  let names: HashMap<Uuid, &str> =
    tasks.iter().map(|t| (t.task_id, t.name.as_str())).collect();
  let mut out = String::new();
  for record in records {
    let name = names.get(&record.task_id).copied().unwrap_or("(unknown)");
    let _ = writeln!(
      out,
      "{}  {:<24} ×{:<3} {:>8} pts",
      record.checkin_date, name, record.times, record.earned_points,
    );
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};
  use rust_decimal::Decimal;
  use tally_core::task::{FrequencyType, UNLIMITED};

  use super::*;

  fn task(frequency_max: i64) -> Task {
    Task {
      task_id:        Uuid::new_v4(),
      name:           "Read".into(),
      description:    None,
      base_points:    Some(Decimal::new(5, 0)),
      frequency_type: FrequencyType::Daily,
      frequency_max,
      is_consume:     false,
      tags:           None,
      created_at:     Utc::now(),
    }
  }

  #[test]
  fn board_marks_completed_tasks() {
    let rows = vec![
      TaskStatus {
        task:         task(2),
        state:        CompletionState::Completed,
        period_times: 2,
      },
      TaskStatus {
        task:         task(UNLIMITED),
        state:        CompletionState::Active,
        period_times: 4,
      },
    ];
    let out = board(&rows);
    let lines: Vec<_> = out.lines().collect();
    assert!(lines[0].starts_with("[x] Read"));
    assert!(lines[0].ends_with("2/2"));
    assert!(lines[1].starts_with("[ ] Read"));
    assert!(lines[1].ends_with("4/∞"));
  }

  #[test]
  fn zero_times_checkin_is_explained() {
    let t = task(1);
    let record = Record {
      record_id:     Uuid::new_v4(),
      task_id:       t.task_id,
      checkin_date:  NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
      created_at:    Utc::now(),
      times:         0,
      earned_points: Decimal::ZERO,
      buff_value:    Decimal::ONE,
    };
    assert!(checkin(&t, &record).contains("quota already reached"));
  }

  #[test]
  fn history_falls_back_for_unknown_tasks() {
    let record = Record {
      record_id:     Uuid::new_v4(),
      task_id:       Uuid::new_v4(),
      checkin_date:  NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
      created_at:    Utc::now(),
      times:         1,
      earned_points: Decimal::new(5, 0),
      buff_value:    Decimal::ONE,
    };
    assert!(history(&[], &[record]).contains("(unknown)"));
  }
}
