//! Series metadata — one record per named FRED series.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Descriptive metadata for a series, as published by the provider.
///
/// Keyed solely by `series_id`. Re-fetching a series overwrites every other
/// field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
  /// Provider identifier, e.g. `"GDPC1"`.
  pub series_id:           String,
  pub title:               String,
  pub units:               String,
  pub frequency:           String,
  /// When the provider last revised the series.
  pub last_updated:        Option<DateTime<Utc>>,
  pub seasonal_adjustment: Option<String>,
  pub observation_start:   Option<NaiveDate>,
  pub observation_end:     Option<NaiveDate>,
  pub popularity:          Option<i64>,
  pub notes:               Option<String>,
}

impl Series {
  /// Minimal metadata record; optional fields start empty.
  pub fn new(
    series_id: impl Into<String>,
    title: impl Into<String>,
    units: impl Into<String>,
    frequency: impl Into<String>,
  ) -> Self {
    Self {
      series_id:           series_id.into(),
      title:               title.into(),
      units:               units.into(),
      frequency:           frequency.into(),
      last_updated:        None,
      seasonal_adjustment: None,
      observation_start:   None,
      observation_end:     None,
      popularity:          None,
      notes:               None,
    }
  }
}
