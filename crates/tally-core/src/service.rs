//! [`TallyService`] — the store-facing half of the scoring engine.
//!
//! The rules themselves are pure functions in [`crate::buff`],
//! [`crate::completion`], [`crate::stats`] and [`crate::streak`]. This type
//! fetches exactly the history each rule needs, runs it, and performs the
//! single write a check-in requires.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  buff::{Checkin, compute_checkin, validate_times},
  completion::{CompletionState, evaluate},
  period::{Calendar, DateWindow, PeriodResolver as _},
  record::{Record, total_times},
  stats::{Summary, aggregate},
  store::{GuardedInsert, QuotaGuard, RecordOrder, RecordQuery, RecordStore},
  streak::current_streak,
  task::{NewTask, Task},
};

/// How many times a quota check-in is re-planned after losing a race.
pub const MAX_CHECKIN_ATTEMPTS: usize = 3;

/// Default size of the recent-history listing.
pub const RECENT_LIMIT: usize = 50;

// ─── Views ───────────────────────────────────────────────────────────────────

/// A task with its completion state for the current period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
  pub task:         Task,
  pub state:        CompletionState,
  /// Units checked in so far in the current period.
  pub period_times: i64,
}

/// Statistics plus the current daily streak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
  #[serde(flatten)]
  pub summary:     Summary,
  pub streak_days: u32,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// The scoring engine bound to a store and a reference timezone.
#[derive(Debug, Clone)]
pub struct TallyService<S> {
  store:    S,
  calendar: Calendar,
}

impl<S: RecordStore> TallyService<S> {
  pub fn new(store: S, calendar: Calendar) -> Self { Self { store, calendar } }

  pub fn store(&self) -> &S { &self.store }

  pub fn calendar(&self) -> Calendar { self.calendar }

  // ── Tasks ─────────────────────────────────────────────────────────────

  pub async fn add_task(&self, input: NewTask) -> Result<Task> {
    input.validate()?;
    self.store.add_task(input).await.map_err(Error::store)
  }

  pub async fn get_task(&self, task_id: Uuid) -> Result<Task> {
    self
      .store
      .get_task(task_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::TaskNotFound(task_id))
  }

  pub async fn list_tasks(&self) -> Result<Vec<Task>> {
    self.store.list_tasks().await.map_err(Error::store)
  }

  // ── Check-ins ─────────────────────────────────────────────────────────

  /// Work out what a check-in would record, without writing anything.
  pub async fn plan_checkin(
    &self,
    task: &Task,
    requested_times: i64,
    date: NaiveDate,
  ) -> Result<Checkin> {
    let (checkin, _) = self.plan(task, requested_times, date).await?;
    Ok(checkin)
  }

  /// Returns the planned check-in and the target day's running total it was
  /// planned against.
  async fn plan(
    &self,
    task: &Task,
    requested_times: i64,
    date: NaiveDate,
  ) -> Result<(Checkin, i64)> {
    let mut history = self
      .records(&RecordQuery::task_within(task.task_id, DateWindow::previous_day(date)))
      .await?;
    let target_day = self
      .records(&RecordQuery::task_within(task.task_id, DateWindow::day(date)))
      .await?;
    let day_times = total_times(&target_day);
    history.extend(target_day);

    let checkin = compute_checkin(task, requested_times, date, &history)?;
    if checkin.effective_times != requested_times {
      debug!(
        task_id = %task.task_id,
        %date,
        requested_times,
        effective_times = checkin.effective_times,
        "check-in clamped to quota"
      );
    }
    Ok((checkin, day_times))
  }

  /// Log `requested_times` units of `task_id` on `date` (today when `None`).
  ///
  /// `requested_times` must be non-zero and within
  /// [`crate::buff::MAX_CHECKIN_TIMES`].
  ///
  /// Quota tasks are written with a guard on the day's running total; if
  /// another check-in lands first, the plan is recomputed from fresh history
  /// up to [`MAX_CHECKIN_ATTEMPTS`] times.
  pub async fn log_checkin(
    &self,
    task_id: Uuid,
    requested_times: i64,
    date: Option<NaiveDate>,
    now: DateTime<Utc>,
  ) -> Result<Record> {
    validate_times(requested_times)?;
    let task = self.get_task(task_id).await?;
    let date = date.unwrap_or_else(|| self.calendar.today(now));

    if task.is_unlimited() {
      let (checkin, _) = self.plan(&task, requested_times, date).await?;
      let record = self
        .store
        .insert_record(checkin.into_new_record(task_id, date))
        .await
        .map_err(Error::store)?;
      debug!(%task_id, %date, points = %record.earned_points, "check-in recorded");
      return Ok(record);
    }

    for attempt in 1..=MAX_CHECKIN_ATTEMPTS {
      let (checkin, day_times) = self.plan(&task, requested_times, date).await?;
      let guard = QuotaGuard { expected_times: day_times };

      match self
        .store
        .insert_record_guarded(checkin.into_new_record(task_id, date), guard)
        .await
        .map_err(Error::store)?
      {
        GuardedInsert::Inserted(record) => {
          debug!(%task_id, %date, points = %record.earned_points, "check-in recorded");
          return Ok(record);
        }
        GuardedInsert::Stale { current_times } => {
          warn!(
            %task_id,
            %date,
            attempt,
            expected = day_times,
            current_times,
            "day total changed during check-in; re-planning"
          );
        }
      }
    }

    Err(Error::Contention { task_id, date })
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn records(&self, query: &RecordQuery) -> Result<Vec<Record>> {
    self.store.query_records(query).await.map_err(Error::store)
  }

  /// The newest `limit` records by insertion time.
  pub async fn recent_records(&self, limit: usize) -> Result<Vec<Record>> {
    self
      .records(&RecordQuery {
        order: RecordOrder::CreatedDesc,
        limit: Some(limit),
        ..RecordQuery::all()
      })
      .await
  }

  /// Completion state of `task` for the period containing `now`.
  pub async fn completion(
    &self,
    task: &Task,
    now: DateTime<Utc>,
  ) -> Result<CompletionState> {
    let today = self.calendar.today(now);
    let window = task.frequency_type.window(today);
    let records = self
      .records(&RecordQuery::task_within(task.task_id, window))
      .await?;
    Ok(evaluate(task, &records, today))
  }

  /// Every task with its completion state and current-period total.
  ///
  /// One read covers the union of every task's current period.
  pub async fn board(&self, now: DateTime<Utc>) -> Result<Vec<TaskStatus>> {
    let today = self.calendar.today(now);
    let tasks = self.list_tasks().await?;
    let Some(span) = tasks
      .iter()
      .map(|t| t.frequency_type.window(today))
      .reduce(DateWindow::span)
    else {
      return Ok(Vec::new());
    };
    let records = self.records(&RecordQuery::within(span)).await?;

    Ok(
      tasks
        .into_iter()
        .map(|task| {
          let window = task.frequency_type.window(today);
          let period_times = total_times(
            records
              .iter()
              .filter(|r| r.task_id == task.task_id && window.contains(r.checkin_date)),
          );
          TaskStatus {
            state: evaluate(&task, &records, today),
            period_times,
            task,
          }
        })
        .collect(),
    )
  }

  /// Cheap read to confirm the store is reachable.
  pub async fn check_store(&self) -> Result<()> {
    self
      .records(&RecordQuery { limit: Some(1), ..RecordQuery::all() })
      .await?;
    Ok(())
  }

  /// Point statistics and streak over the full history.
  ///
  /// A single read backs the whole result; if it fails nothing is returned.
  pub async fn stats(&self, now: DateTime<Utc>) -> Result<Stats> {
    let today = self.calendar.today(now);
    let records = self.records(&RecordQuery::all()).await?;
    Ok(Stats {
      summary:     aggregate(&records, today)?,
      streak_days: current_streak(records.iter().map(|r| r.checkin_date), today),
    })
  }
}
