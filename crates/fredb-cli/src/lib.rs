//! Extraction runner for fredb.
//!
//! Loads configuration, then drives any [`SeriesSource`] into any
//! [`SeriesStore`] one series at a time. The `fredb` binary wires in the
//! FRED client and the SQLite store.
//!
//! [`SeriesSource`]: fredb_core::source::SeriesSource
//! [`SeriesStore`]: fredb_core::store::SeriesStore

pub mod config;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod report;

pub use error::Error;
