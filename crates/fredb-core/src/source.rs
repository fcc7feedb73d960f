//! The `SeriesSource` trait — where series come from.
//!
//! Implemented by `fredb-fred` against the live API, and by scripted fakes
//! in tests.

use std::future::Future;

use crate::{
  error::FetchError,
  observation::{DateRange, FetchedSeries},
};

/// A provider that can fetch one named series at a time.
pub trait SeriesSource: Send + Sync {
  /// Fetch metadata and observations for `series_id`, restricted to
  /// `range` where the provider supports it.
  ///
  /// No retries: every failure is surfaced to the caller as a
  /// [`FetchError`].
  fn fetch<'a>(
    &'a self,
    series_id: &'a str,
    range: &'a DateRange,
  ) -> impl Future<Output = Result<FetchedSeries, FetchError>> + Send + 'a;
}
