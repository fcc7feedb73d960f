//! Error types for `fredb-core`.
//!
//! [`FetchError`] and [`ValidationError`] are the per-stage failures of an
//! extraction; [`Error`] unifies them with storage failures at the
//! per-series boundary.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to obtain a series from the remote provider.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("unknown series: {0}")]
  UnknownSeries(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("rate limited by provider{}", retry_hint(.retry_after_secs))]
  RateLimited { retry_after_secs: Option<u64> },

  #[error("request timed out: {0}")]
  Timeout(String),

  #[error("network error: {0}")]
  Network(String),

  #[error("HTTP {status}: {message}")]
  Http { status: u16, message: String },

  #[error("unexpected response: {0}")]
  Decode(String),
}

fn retry_hint(secs: &Option<u64>) -> String {
  secs.map(|s| format!(" (retry after {s}s)")).unwrap_or_default()
}

/// A fetched batch that must not be stored.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
  #[error("batch contains no observations")]
  Empty,

  #[error("observation {index} has no date")]
  MissingDate { index: usize },

  #[error("malformed date {date:?} at observation {index}")]
  MalformedDate { index: usize, date: String },

  #[error("non-numeric value {value:?} on {date}")]
  NonNumericValue { date: NaiveDate, value: String },

  #[error("duplicate date {0} in batch")]
  DuplicateDate(NaiveDate),

  #[error("every value in the batch is missing")]
  AllMissing,
}

/// Any failure while extracting a single series.
#[derive(Debug, Error)]
pub enum Error {
  #[error("fetch error: {0}")]
  Fetch(#[from] FetchError),

  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
