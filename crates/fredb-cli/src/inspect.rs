//! Read-side views over the store: `fredb show`, `fredb list` and the
//! results of `fredb search`.

use std::fmt;

use fredb_core::{
  observation::{DateRange, Observation},
  series::Series,
  store::SeriesStore,
};

/// One series with its stored observations.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesView {
  pub series:       Series,
  pub observations: Vec<Observation>,
}

/// Load `series_id` and its observations within `range`. `None` if the
/// series has never been stored.
pub async fn series_view<T: SeriesStore>(
  store: &T,
  series_id: &str,
  range: &DateRange,
) -> Result<Option<SeriesView>, T::Error> {
  let Some(series) = store.get_series(series_id).await? else {
    return Ok(None);
  };
  let observations = store.get_observations(series_id, range).await?;
  Ok(Some(SeriesView { series, observations }))
}

impl fmt::Display for SeriesView {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = &self.series;
    writeln!(f, "{}  {}", s.series_id, s.title)?;
    writeln!(f, "Units:        {}", s.units)?;
    writeln!(f, "Frequency:    {}", s.frequency)?;
    if let Some(adj) = &s.seasonal_adjustment {
      writeln!(f, "Adjustment:   {adj}")?;
    }
    if let Some(at) = s.last_updated {
      writeln!(f, "Last updated: {}", at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    writeln!(f, "Observations: {}", self.observations.len())?;

    if !self.observations.is_empty() {
      writeln!(f)?;
    }
    for o in &self.observations {
      match o.value {
        Some(v) => writeln!(f, "{}  {v}", o.date)?,
        None => writeln!(f, "{}  null", o.date)?,
      }
    }
    Ok(())
  }
}

/// One line per series: id, frequency, title and units.
pub struct SeriesList<'a>(pub &'a [Series]);

impl fmt::Display for SeriesList<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for s in self.0 {
      writeln!(f, "{:<20}  {:<10}  {}  [{}]", s.series_id, s.frequency, s.title, s.units)?;
    }
    Ok(())
  }
}
