//! Core types and trait definitions for fredb.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! FRED client, the SQLite store and the CLI all depend on it.

pub mod error;
pub mod log;
pub mod observation;
pub mod series;
pub mod source;
pub mod store;
pub mod validate;

pub use error::{Error, FetchError, Result, ValidationError};
