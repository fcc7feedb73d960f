//! The `SeriesStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `fredb-store-sqlite`).
//! Orchestration in `fredb-cli` depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  log::{LogEntry, NewLogEntry},
  observation::{DateRange, Observation},
  series::Series,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`SeriesStore::log_entries`].
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
  /// Restrict to a single series.
  pub series_id: Option<String>,
  pub limit:     Option<usize>,
}

/// Summary counts over the whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
  pub series_count:      u64,
  pub observation_count: u64,
  pub first_date:        Option<NaiveDate>,
  pub last_date:         Option<NaiveDate>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a fredb storage backend.
///
/// Series metadata is keyed by series id and observations by
/// (series id, date); both are written with upsert semantics. The extraction
/// log is append-only.
pub trait SeriesStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert the series, or overwrite every non-key field of an existing row.
  fn upsert_series_metadata<'a>(
    &'a self,
    series: &'a Series,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Upsert a batch of observations in a single transaction. Returns the
  /// number of rows written.
  fn upsert_observations<'a>(
    &'a self,
    series_id: &'a str,
    observations: &'a [Observation],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Upsert metadata and observations for one series atomically: either
  /// everything is written or nothing is.
  fn store_series<'a>(
    &'a self,
    series: &'a Series,
    observations: &'a [Observation],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Append an extraction log entry. The store assigns id and timestamp.
  fn append_log_entry(
    &self,
    entry: NewLogEntry,
  ) -> impl Future<Output = Result<LogEntry, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn get_series<'a>(
    &'a self,
    series_id: &'a str,
  ) -> impl Future<Output = Result<Option<Series>, Self::Error>> + Send + 'a;

  /// All series, ordered by id.
  fn list_series(
    &self,
  ) -> impl Future<Output = Result<Vec<Series>, Self::Error>> + Send + '_;

  /// Observations for a series within `range`, ordered by date.
  fn get_observations<'a>(
    &'a self,
    series_id: &'a str,
    range: &'a DateRange,
  ) -> impl Future<Output = Result<Vec<Observation>, Self::Error>> + Send + 'a;

  /// Log entries, newest first.
  fn log_entries<'a>(
    &'a self,
    query: &'a LogQuery,
  ) -> impl Future<Output = Result<Vec<LogEntry>, Self::Error>> + Send + 'a;

  fn stats(&self) -> impl Future<Output = Result<StoreStats, Self::Error>> + Send + '_;
}
