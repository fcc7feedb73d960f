//! Error type for `fredb-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column holds a value this version does not understand.
  #[error("invalid column value: {0}")]
  InvalidColumn(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
