//! Error type for `fredb-cli` startup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error(
    "FRED_API_KEY is not set; get a key at https://fred.stlouisfed.org/docs/api/api_key.html"
  )]
  MissingApiKey,
}
