//! JSON shapes returned by the FRED API and their mapping onto core types.

use chrono::{DateTime, NaiveDate, Utc};
use fredb_core::{
  FetchError,
  observation::RawObservation,
  series::Series,
  validate::DATE_FORMAT,
};
use serde::Deserialize;

/// FRED's marker for an observation with no value.
pub const MISSING_MARKER: &str = ".";

/// `last_updated` as FRED sends it, e.g. `2024-03-28 07:51:02-05`.
const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%#z";

// ─── Responses ───────────────────────────────────────────────────────────────

/// `GET /series` and `GET /series/search`.
#[derive(Debug, Deserialize)]
pub struct SeriesResponse {
  #[serde(default)]
  pub seriess: Vec<FredSeries>,
}

#[derive(Debug, Deserialize)]
pub struct FredSeries {
  pub id:                  String,
  #[serde(default)]
  pub title:               String,
  #[serde(default)]
  pub units:               String,
  #[serde(default)]
  pub frequency:           String,
  pub last_updated:        Option<String>,
  pub seasonal_adjustment: Option<String>,
  pub observation_start:   Option<String>,
  pub observation_end:     Option<String>,
  pub popularity:          Option<i64>,
  pub notes:               Option<String>,
}

/// `GET /series/observations`.
#[derive(Debug, Deserialize)]
pub struct ObservationsResponse {
  pub observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
pub struct FredObservation {
  pub date:  String,
  pub value: String,
}

/// Body of a non-success response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
  pub error_message: Option<String>,
}

// ─── Mapping ─────────────────────────────────────────────────────────────────

impl FredSeries {
  pub fn into_series(self) -> Result<Series, FetchError> {
    Ok(Series {
      last_updated:        self
        .last_updated
        .as_deref()
        .map(parse_last_updated)
        .transpose()?,
      observation_start:   self.observation_start.as_deref().map(parse_date).transpose()?,
      observation_end:     self.observation_end.as_deref().map(parse_date).transpose()?,
      seasonal_adjustment: self.seasonal_adjustment,
      popularity:          self.popularity,
      notes:               self.notes,
      series_id:           self.id,
      title:               self.title,
      units:               self.units,
      frequency:           self.frequency,
    })
  }
}

impl From<FredObservation> for RawObservation {
  fn from(o: FredObservation) -> Self {
    let missing = matches!(o.value.trim(), "" | MISSING_MARKER);
    RawObservation { date: o.date, value: (!missing).then_some(o.value) }
  }
}

pub fn parse_last_updated(s: &str) -> Result<DateTime<Utc>, FetchError> {
  DateTime::parse_from_str(s.trim(), LAST_UPDATED_FORMAT)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| FetchError::Decode(format!("last_updated {s:?}: {e}")))
}

fn parse_date(s: &str) -> Result<NaiveDate, FetchError> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| FetchError::Decode(format!("date {s:?}: {e}")))
}
