//! Observation types — the (date, value) points of a series.
//!
//! A [`RawObservation`] is exactly what the provider sent. It becomes an
//! [`Observation`] only by passing [`crate::validate::validate`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::series::Series;

/// One data point as received from the provider, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
  /// Provider date text; expected to be `YYYY-MM-DD`.
  pub date:  String,
  /// Provider value text, or `None` for the provider's "missing" marker.
  pub value: Option<String>,
}

impl RawObservation {
  pub fn new(date: impl Into<String>, value: Option<&str>) -> Self {
    Self { date: date.into(), value: value.map(str::to_owned) }
  }
}

/// A validated data point. `value` stays `None` for missing observations; it
/// is never coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
  pub date:  NaiveDate,
  pub value: Option<f64>,
}

/// Inclusive date bounds for fetching or reading observations. Either side
/// may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
  pub start: Option<NaiveDate>,
  pub end:   Option<NaiveDate>,
}

/// Everything the provider returned for one series.
#[derive(Debug, Clone)]
pub struct FetchedSeries {
  pub series:       Series,
  pub observations: Vec<RawObservation>,
}
