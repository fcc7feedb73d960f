//! Encoding and decoding helpers between fredb domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`.
//! Values are stored as REAL, with NULL for missing observations.

use chrono::{DateTime, NaiveDate, Utc};
use fredb_core::{
  log::{ExtractionStatus, LogEntry},
  observation::Observation,
  series::Series,
  validate::DATE_FORMAT,
};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── ExtractionStatus
// ─────────────────────────────────────────────────────────

/// Split a status into its `(status, row_count, error_message)` columns.
pub fn encode_status(s: &ExtractionStatus) -> (&'static str, Option<i64>, Option<String>) {
  match s {
    ExtractionStatus::Success { rows } => ("success", Some(*rows as i64), None),
    ExtractionStatus::Failure { message } => ("failure", None, Some(message.clone())),
  }
}

pub fn decode_status(
  status: &str,
  row_count: Option<i64>,
  message: Option<String>,
) -> Result<ExtractionStatus> {
  match status {
    "success" => {
      let rows = row_count.unwrap_or(0);
      let rows = u64::try_from(rows)
        .map_err(|_| Error::InvalidColumn(format!("negative row count: {rows}")))?;
      Ok(ExtractionStatus::Success { rows })
    }
    "failure" => Ok(ExtractionStatus::Failure { message: message.unwrap_or_default() }),
    other => Err(Error::InvalidColumn(format!("unknown status: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `series_metadata` row.
pub struct SeriesRow {
  pub series_id:           String,
  pub title:               String,
  pub units:               String,
  pub frequency:           String,
  pub last_updated:        Option<String>,
  pub seasonal_adjustment: Option<String>,
  pub observation_start:   Option<String>,
  pub observation_end:     Option<String>,
  pub popularity:          Option<i64>,
  pub notes:               Option<String>,
}

impl SeriesRow {
  pub const COLUMNS: &'static str = "series_id, title, units, frequency, last_updated, \
     seasonal_adjustment, observation_start, observation_end, popularity, notes";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      series_id:           row.get(0)?,
      title:               row.get(1)?,
      units:               row.get(2)?,
      frequency:           row.get(3)?,
      last_updated:        row.get(4)?,
      seasonal_adjustment: row.get(5)?,
      observation_start:   row.get(6)?,
      observation_end:     row.get(7)?,
      popularity:          row.get(8)?,
      notes:               row.get(9)?,
    })
  }

  pub fn into_series(self) -> Result<Series> {
    Ok(Series {
      series_id:           self.series_id,
      title:               self.title,
      units:               self.units,
      frequency:           self.frequency,
      last_updated:        self.last_updated.as_deref().map(decode_dt).transpose()?,
      seasonal_adjustment: self.seasonal_adjustment,
      observation_start:   self.observation_start.as_deref().map(decode_date).transpose()?,
      observation_end:     self.observation_end.as_deref().map(decode_date).transpose()?,
      popularity:          self.popularity,
      notes:               self.notes,
    })
  }
}

/// Raw values read directly from an `observations` row.
pub struct ObservationRow {
  pub date:  String,
  pub value: Option<f64>,
}

impl ObservationRow {
  pub fn into_observation(self) -> Result<Observation> {
    Ok(Observation { date: decode_date(&self.date)?, value: self.value })
  }
}

/// Raw values read directly from an `extraction_log` row.
pub struct LogRow {
  pub log_id:        i64,
  pub series_id:     String,
  pub extracted_at:  String,
  pub status:        String,
  pub row_count:     Option<i64>,
  pub error_message: Option<String>,
}

impl LogRow {
  pub fn into_entry(self) -> Result<LogEntry> {
    Ok(LogEntry {
      log_id:       self.log_id,
      series_id:    self.series_id,
      extracted_at: decode_dt(&self.extracted_at)?,
      status:       decode_status(&self.status, self.row_count, self.error_message)?,
    })
  }
}
