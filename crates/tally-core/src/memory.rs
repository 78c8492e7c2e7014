//! [`MemoryStore`] — an in-process [`RecordStore`] for tests and embedding.

use std::{
  convert::Infallible,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  record::{NewRecord, Record, total_times},
  store::{GuardedInsert, QuotaGuard, RecordOrder, RecordQuery, RecordStore},
  task::{NewTask, Task},
};

#[derive(Debug, Default)]
struct Inner {
  tasks:   Vec<Task>,
  records: Vec<Record>,
}

/// A store that keeps everything in memory behind a mutex.
///
/// Cloning is cheap and clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn append(inner: &mut Inner, input: NewRecord) -> Record {
    let record = Record {
      record_id:     Uuid::new_v4(),
      task_id:       input.task_id,
      checkin_date:  input.checkin_date,
      created_at:    Utc::now(),
      times:         input.times,
      earned_points: input.earned_points,
      buff_value:    input.buff_value,
    };
    inner.records.push(record.clone());
    record
  }
}

impl RecordStore for MemoryStore {
  type Error = Infallible;

  async fn add_task(&self, input: NewTask) -> Result<Task, Infallible> {
    let task = Task {
      task_id:        Uuid::new_v4(),
      name:           input.name,
      description:    input.description,
      base_points:    Some(input.base_points),
      frequency_type: input.frequency_type,
      frequency_max:  input.frequency_max,
      is_consume:     input.is_consume,
      tags:           input.tags,
      created_at:     Utc::now(),
    };
    self.lock().tasks.push(task.clone());
    Ok(task)
  }

  async fn get_task(&self, id: Uuid) -> Result<Option<Task>, Infallible> {
    Ok(self.lock().tasks.iter().find(|t| t.task_id == id).cloned())
  }

  async fn list_tasks(&self) -> Result<Vec<Task>, Infallible> {
    Ok(self.lock().tasks.clone())
  }

  async fn query_records(
    &self,
    query: &RecordQuery,
  ) -> Result<Vec<Record>, Infallible> {
    let mut records: Vec<Record> = self
      .lock()
      .records
      .iter()
      .filter(|r| query.matches(r))
      .cloned()
      .collect();

    // `records` is in insertion order, which the stable sorts keep for ties.
    match query.order {
      RecordOrder::CheckinAsc => records.sort_by_key(|r| r.checkin_date),
      RecordOrder::CreatedDesc => records.reverse(),
    }
    if let Some(limit) = query.limit {
      records.truncate(limit);
    }
    Ok(records)
  }

  async fn insert_record(&self, input: NewRecord) -> Result<Record, Infallible> {
    Ok(Self::append(&mut self.lock(), input))
  }

  async fn insert_record_guarded(
    &self,
    input: NewRecord,
    guard: QuotaGuard,
  ) -> Result<GuardedInsert, Infallible> {
    let mut inner = self.lock();
    let current_times = total_times(inner.records.iter().filter(|r| {
      r.task_id == input.task_id && r.checkin_date == input.checkin_date
    }));

    if current_times != guard.expected_times {
      return Ok(GuardedInsert::Stale { current_times });
    }
    Ok(GuardedInsert::Inserted(Self::append(&mut inner, input)))
  }
}
