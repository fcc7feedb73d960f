//! Async client for the FRED (Federal Reserve Economic Data) web API.
//!
//! API: `https://api.stlouisfed.org/fred`
//! Auth: API key via the `api_key` query parameter.
//!
//! [`FredClient`] implements [`fredb_core::source::SeriesSource`]: one
//! metadata call and one observations call per series. Dates and values are
//! handed on as provider text; only the missing marker is interpreted here.

mod client;
mod wire;

pub use client::{FredClient, FredConfig, DEFAULT_BASE_URL, REDACTED};
pub use wire::MISSING_MARKER;

#[cfg(test)]
mod tests;
