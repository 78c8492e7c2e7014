//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use tally_core::{
  record::{NewRecord, Record},
  store::{GuardedInsert, QuotaGuard, RecordOrder, RecordQuery, RecordStore},
  task::{NewTask, Task},
};

use crate::{
  Result,
  encode::{
    RawRecord, RawTask, encode_date, encode_decimal, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

/// Column values for one `checkin_records` insert, already encoded.
struct RecordRow {
  record_id:     String,
  task_id:       String,
  checkin_date:  String,
  created_at:    String,
  times:         i64,
  earned_points: String,
  buff_value:    String,
}

impl RecordRow {
  fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute(
      "INSERT INTO checkin_records (
         record_id, task_id, checkin_date, created_at,
         times, earned_points, buff_value
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
      rusqlite::params![
        self.record_id,
        self.task_id,
        self.checkin_date,
        self.created_at,
        self.times,
        self.earned_points,
        self.buff_value,
      ],
    )?;
    Ok(())
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Build the stored form of `input` with a fresh id and timestamp.
  fn new_record(input: NewRecord) -> (Record, RecordRow) {
    let record = Record {
      record_id:     Uuid::new_v4(),
      task_id:       input.task_id,
      checkin_date:  input.checkin_date,
      created_at:    Utc::now(),
      times:         input.times,
      earned_points: input.earned_points,
      buff_value:    input.buff_value,
    };
    let row = RecordRow {
      record_id:     encode_uuid(record.record_id),
      task_id:       encode_uuid(record.task_id),
      checkin_date:  encode_date(record.checkin_date),
      created_at:    encode_dt(record.created_at),
      times:         record.times,
      earned_points: encode_decimal(record.earned_points),
      buff_value:    encode_decimal(record.buff_value),
    };
    (record, row)
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Tasks ─────────────────────────────────────────────────────────────────

  async fn add_task(&self, input: NewTask) -> Result<Task> {
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

    let id_str      = encode_uuid(task.task_id);
    let name        = task.name.clone();
    let description = task.description.clone();
    let points_str  = encode_decimal(input.base_points);
    let freq_str    = task.frequency_type.as_str();
    let freq_max    = task.frequency_max;
    let is_consume  = task.is_consume;
    let tags        = task.tags.clone();
    let at_str      = encode_dt(task.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tasks (
             task_id, name, description, base_points,
             frequency_type, frequency_max, is_consume, tags, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            name,
            description,
            points_str,
            freq_str,
            freq_max,
            is_consume,
            tags,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(task)
  }

  async fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTask> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM tasks WHERE task_id = ?1", RawTask::COLUMNS),
            rusqlite::params![id_str],
            RawTask::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTask::into_task).transpose()
  }

  async fn list_tasks(&self) -> Result<Vec<Task>> {
    let raws: Vec<RawTask> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM tasks ORDER BY created_at, rowid",
          RawTask::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawTask::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTask::into_task).collect()
  }

  // ── Records ───────────────────────────────────────────────────────────────

  async fn query_records(&self, query: &RecordQuery) -> Result<Vec<Record>> {
    let task_str  = query.task_id.map(encode_uuid);
    let from_str  = query.checkin_from.map(encode_date);
    let until_str = query.checkin_until.map(encode_date);
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val = query
      .limit
      .map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    let order_by  = match query.order {
      RecordOrder::CheckinAsc => "checkin_date ASC, rowid ASC",
      RecordOrder::CreatedDesc => "created_at DESC, rowid DESC",
    };

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {columns}
           FROM checkin_records
           WHERE (?1 IS NULL OR task_id = ?1)
             AND (?2 IS NULL OR checkin_date >= ?2)
             AND (?3 IS NULL OR checkin_date < ?3)
           ORDER BY {order_by}
           LIMIT ?4",
          columns = RawRecord::COLUMNS,
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![task_str, from_str, until_str, limit_val],
            RawRecord::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn insert_record(&self, input: NewRecord) -> Result<Record> {
    let (record, row) = Self::new_record(input);

    self
      .conn
      .call(move |conn| {
        row.insert(conn)?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn insert_record_guarded(
    &self,
    input: NewRecord,
    guard: QuotaGuard,
  ) -> Result<GuardedInsert> {
    let (record, row) = Self::new_record(input);

    // `Some(total)` when the guard failed and nothing was written.
    let stale: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current: i64 = tx.query_row(
          "SELECT COALESCE(SUM(times), 0) FROM checkin_records
           WHERE task_id = ?1 AND checkin_date = ?2",
          rusqlite::params![row.task_id, row.checkin_date],
          |r| r.get(0),
        )?;

        if current != guard.expected_times {
          return Ok(Some(current));
        }

        row.insert(&tx)?;
        tx.commit()?;
        Ok(None)
      })
      .await?;

    Ok(match stale {
      Some(current_times) => GuardedInsert::Stale { current_times },
      None => GuardedInsert::Inserted(record),
    })
  }
}
