//! The extraction run: fetch → validate → store → log, one series at a time.
//!
//! A failure in any stage is confined to its series. It is written to the
//! extraction log and the run moves on to the next identifier.

use std::collections::HashSet;

use fredb_core::{
  Error, Result,
  log::NewLogEntry,
  observation::DateRange,
  source::SeriesSource,
  store::SeriesStore,
  validate::validate,
};
use tracing::{error, info, warn};

use crate::report::{RunSummary, SeriesOutcome};

/// Clean up a list of series identifiers.
///
/// Drops anything after the first whitespace (so `"GDP  # real GDP"` becomes
/// `"GDP"`), skips blank entries and keeps only the first occurrence of each
/// identifier.
pub fn normalize_series_ids<I, S>(ids: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut seen = HashSet::new();
  ids
    .into_iter()
    .filter_map(|id| id.as_ref().split_whitespace().next().map(str::to_owned))
    .filter(|id| !id.starts_with('#'))
    .filter(|id| seen.insert(id.clone()))
    .collect()
}

/// Fetch, validate and store a single series. Returns the number of
/// observations written. Nothing is written unless validation passes.
pub async fn extract_series<S, T>(
  source: &S,
  store: &T,
  series_id: &str,
  range: &DateRange,
) -> Result<usize>
where
  S: SeriesSource,
  T: SeriesStore,
{
  let fetched = source.fetch(series_id, range).await?;
  let observations = validate(&fetched.observations)?;
  store
    .store_series(&fetched.series, &observations)
    .await
    .map_err(Error::storage)
}

/// Run extraction over `series_ids` in order. Never stops early.
pub async fn run<S, T>(
  source: &S,
  store: &T,
  series_ids: &[String],
  range: &DateRange,
) -> RunSummary
where
  S: SeriesSource,
  T: SeriesStore,
{
  let total = series_ids.len();
  let mut summary = RunSummary::default();

  for (i, series_id) in series_ids.iter().enumerate() {
    info!(%series_id, "processing series {}/{total}", i + 1);

    let result = match extract_series(source, store, series_id, range).await {
      Ok(rows) => {
        let entry = NewLogEntry::success(series_id.as_str(), rows as u64);
        match store.append_log_entry(entry).await {
          Ok(_) => {
            info!(%series_id, rows, "stored observations");
            Ok(rows)
          }
          Err(e) => {
            let err = Error::storage(e);
            error!(%series_id, error = %err, "data stored but log entry failed");
            Err(err.to_string())
          }
        }
      }
      Err(err) => {
        warn!(%series_id, error = %err, "extraction failed");
        let entry = NewLogEntry::failure(series_id.as_str(), err.to_string());
        if let Err(log_err) = store.append_log_entry(entry).await {
          error!(%series_id, error = %log_err, "failed to write failure log entry");
        }
        Err(err.to_string())
      }
    };

    summary.outcomes.push(SeriesOutcome { series_id: series_id.clone(), result });
  }

  info!(
    succeeded = summary.succeeded(),
    failed = summary.failed(),
    "extraction complete"
  );
  summary
}
