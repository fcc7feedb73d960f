//! Gatekeeping for fetched batches.
//!
//! [`validate`] never alters content or order; it only decides whether a
//! batch may be stored and, if so, hands it back with typed dates and values.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::{
  error::ValidationError,
  observation::{Observation, RawObservation},
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Check a raw batch and return it as typed observations.
///
/// Rejects an empty batch, a missing or malformed date, a present value that
/// is not a finite number, a date repeated within the batch, and a batch in
/// which every value is missing.
pub fn validate(raw: &[RawObservation]) -> Result<Vec<Observation>, ValidationError> {
  if raw.is_empty() {
    return Err(ValidationError::Empty);
  }

  let mut seen = HashSet::with_capacity(raw.len());
  let mut out = Vec::with_capacity(raw.len());

  for (index, obs) in raw.iter().enumerate() {
    let date = parse_date(index, &obs.date)?;
    if !seen.insert(date) {
      return Err(ValidationError::DuplicateDate(date));
    }

    let value = match obs.value.as_deref() {
      None => None,
      Some(text) => Some(parse_value(text).ok_or_else(|| {
        ValidationError::NonNumericValue { date, value: text.to_owned() }
      })?),
    };

    out.push(Observation { date, value });
  }

  if out.iter().all(|o| o.value.is_none()) {
    return Err(ValidationError::AllMissing);
  }

  Ok(out)
}

fn parse_date(index: usize, text: &str) -> Result<NaiveDate, ValidationError> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::MissingDate { index });
  }
  NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
    ValidationError::MalformedDate { index, date: text.to_owned() }
  })
}

fn parse_value(text: &str) -> Option<f64> {
  text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
