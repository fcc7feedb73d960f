//! Extraction log entries.
//!
//! The log is append-only: the application never updates or deletes an
//! entry once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionStatus {
  Success { rows: u64 },
  Failure { message: String },
}

impl ExtractionStatus {
  pub fn is_success(&self) -> bool { matches!(self, Self::Success { .. }) }
}

/// A log entry to be appended; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
  pub series_id: String,
  pub status:    ExtractionStatus,
}

impl NewLogEntry {
  pub fn success(series_id: impl Into<String>, rows: u64) -> Self {
    Self {
      series_id: series_id.into(),
      status:    ExtractionStatus::Success { rows },
    }
  }

  pub fn failure(series_id: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      series_id: series_id.into(),
      status:    ExtractionStatus::Failure { message: message.into() },
    }
  }
}

/// A persisted log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
  pub log_id:       i64,
  pub series_id:    String,
  pub extracted_at: DateTime<Utc>,
  #[serde(flatten)]
  pub status:       ExtractionStatus,
}
