//! [`SqliteStore`] — the SQLite implementation of [`SeriesStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use fredb_core::{
  log::{LogEntry, NewLogEntry},
  observation::{DateRange, Observation},
  series::Series,
  store::{LogQuery, SeriesStore, StoreStats},
};

use crate::{
  encode::{
    decode_date, encode_date, encode_dt, encode_status, LogRow, ObservationRow, SeriesRow,
  },
  schema::SCHEMA,
  Error, Result,
};

const UPSERT_SERIES: &str = "
  INSERT INTO series_metadata (
    series_id, title, units, frequency, last_updated,
    seasonal_adjustment, observation_start, observation_end, popularity, notes
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
  ON CONFLICT (series_id) DO UPDATE SET
    title               = excluded.title,
    units               = excluded.units,
    frequency           = excluded.frequency,
    last_updated        = excluded.last_updated,
    seasonal_adjustment = excluded.seasonal_adjustment,
    observation_start   = excluded.observation_start,
    observation_end     = excluded.observation_end,
    popularity          = excluded.popularity,
    notes               = excluded.notes";

const UPSERT_OBSERVATION: &str = "
  INSERT INTO observations (series_id, date, value) VALUES (?1, ?2, ?3)
  ON CONFLICT (series_id, date) DO UPDATE SET value = excluded.value";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fredb store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Create any missing tables. Safe to call repeatedly; existing rows are
  /// never touched.
  pub async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn write_series(conn: &rusqlite::Connection, series: &Series) -> rusqlite::Result<()> {
  conn.execute(
    UPSERT_SERIES,
    rusqlite::params![
      series.series_id,
      series.title,
      series.units,
      series.frequency,
      series.last_updated.map(encode_dt),
      series.seasonal_adjustment,
      series.observation_start.map(encode_date),
      series.observation_end.map(encode_date),
      series.popularity,
      series.notes,
    ],
  )?;
  Ok(())
}

fn write_observations(
  conn: &rusqlite::Connection,
  series_id: &str,
  rows: &[(String, Option<f64>)],
) -> rusqlite::Result<usize> {
  let mut stmt = conn.prepare_cached(UPSERT_OBSERVATION)?;
  let mut written = 0;
  for (date, value) in rows {
    written += stmt.execute(rusqlite::params![series_id, date, value])?;
  }
  Ok(written)
}

fn encode_observations(observations: &[Observation]) -> Vec<(String, Option<f64>)> {
  observations
    .iter()
    .map(|o| (encode_date(o.date), o.value))
    .collect()
}

// ─── SeriesStore impl ────────────────────────────────────────────────────────

impl SeriesStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert_series_metadata(&self, series: &Series) -> Result<()> {
    let series = series.clone();

    self
      .conn
      .call(move |conn| {
        write_series(conn, &series)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn upsert_observations(
    &self,
    series_id:    &str,
    observations: &[Observation],
  ) -> Result<usize> {
    let series_id = series_id.to_owned();
    let rows      = encode_observations(observations);

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let written = write_observations(&tx, &series_id, &rows)?;
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  async fn store_series(
    &self,
    series:       &Series,
    observations: &[Observation],
  ) -> Result<usize> {
    let series = series.clone();
    let rows   = encode_observations(observations);

    let written = self
      .conn
      .call(move |conn| {
        // Dropping the transaction without commit rolls everything back.
        let tx = conn.transaction()?;
        write_series(&tx, &series)?;
        let written = write_observations(&tx, &series.series_id, &rows)?;
        tx.commit()?;
        Ok(written)
      })
      .await?;
    Ok(written)
  }

  async fn append_log_entry(&self, entry: NewLogEntry) -> Result<LogEntry> {
    let extracted_at             = Utc::now();
    let at_str                   = encode_dt(extracted_at);
    let (status, count, message) = encode_status(&entry.status);
    let series_id                = entry.series_id.clone();

    let log_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO extraction_log (series_id, extracted_at, status, row_count, error_message)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![series_id, at_str, status, count, message],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(LogEntry {
      log_id,
      series_id: entry.series_id,
      extracted_at,
      status: entry.status,
    })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_series(&self, series_id: &str) -> Result<Option<Series>> {
    let series_id = series_id.to_owned();

    let raw: Option<SeriesRow> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM series_metadata WHERE series_id = ?1",
              SeriesRow::COLUMNS
            ),
            rusqlite::params![series_id],
            SeriesRow::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(SeriesRow::into_series).transpose()
  }

  async fn list_series(&self) -> Result<Vec<Series>> {
    let raws: Vec<SeriesRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM series_metadata ORDER BY series_id",
          SeriesRow::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], SeriesRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(SeriesRow::into_series).collect()
  }

  async fn get_observations(
    &self,
    series_id: &str,
    range:     &DateRange,
  ) -> Result<Vec<Observation>> {
    let series_id = series_id.to_owned();
    let start     = range.start.map(encode_date);
    let end       = range.end.map(encode_date);

    let raws: Vec<ObservationRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT date, value FROM observations
           WHERE series_id = ?1
             AND (?2 IS NULL OR date >= ?2)
             AND (?3 IS NULL OR date <= ?3)
           ORDER BY date",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![series_id, start, end], |row| {
            Ok(ObservationRow { date: row.get(0)?, value: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(ObservationRow::into_observation).collect()
  }

  async fn log_entries(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
    let series_id = query.series_id.clone();
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val = query.limit.map_or(-1, |l| l as i64);

    let raws: Vec<LogRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT log_id, series_id, extracted_at, status, row_count, error_message
           FROM extraction_log
           WHERE (?1 IS NULL OR series_id = ?1)
           ORDER BY log_id DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![series_id, limit_val], |row| {
            Ok(LogRow {
              log_id:        row.get(0)?,
              series_id:     row.get(1)?,
              extracted_at:  row.get(2)?,
              status:        row.get(3)?,
              row_count:     row.get(4)?,
              error_message: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(LogRow::into_entry).collect()
  }

  async fn stats(&self) -> Result<StoreStats> {
    let (series_count, observation_count, first, last): (i64, i64, Option<String>, Option<String>) =
      self
        .conn
        .call(|conn| {
          let series_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM series_metadata", [], |r| r.get(0))?;
          let (count, first, last): (i64, Option<String>, Option<String>) = conn.query_row(
            "SELECT COUNT(*), MIN(date), MAX(date) FROM observations",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
          )?;
          Ok((series_count, count, first, last))
        })
        .await?;

    Ok(StoreStats {
      series_count:      series_count as u64,
      observation_count: observation_count as u64,
      first_date:        first.as_deref().map(decode_date).transpose()?,
      last_date:         last.as_deref().map(decode_date).transpose()?,
    })
  }
}
