//! Runtime configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! `FREDB_*` environment variables, then `FRED_API_KEY`. CLI flags are
//! applied on top by the binary.

use std::{collections::BTreeMap, fmt, path::{Path, PathBuf}, time::Duration};

use chrono::NaiveDate;
use fredb_fred::{DEFAULT_BASE_URL, FredConfig, REDACTED};
use serde::Deserialize;

use crate::Error;

pub const API_KEY_VAR: &str = "FRED_API_KEY";

/// Settings for one `fredb` invocation.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
  #[serde(default)]
  pub api_key:              String,
  pub database_path:        PathBuf,
  pub base_url:             String,
  pub request_timeout_secs: u64,
  pub request_delay_ms:     u64,
  /// Default tracing level when `RUST_LOG` is unset.
  pub log_level:            String,
  /// Earliest observation date to request when `--start` is not given.
  #[serde(default)]
  pub start_date:           Option<NaiveDate>,
  /// Series extracted when none are named on the command line.
  #[serde(default)]
  pub series:               Vec<String>,
  /// Named groups of series, e.g. `[categories] labor = ["UNRATE", "PAYEMS"]`.
  #[serde(default)]
  pub categories:           BTreeMap<String, Vec<String>>,
}

impl AppConfig {
  /// Load from `path` (if it exists) and the process environment.
  pub fn load(path: &Path) -> Result<Self, Error> {
    Self::load_with(path, std::env::var(API_KEY_VAR).ok())
  }

  /// Like [`AppConfig::load`], with the API key supplied by the caller.
  pub fn load_with(path: &Path, api_key: Option<String>) -> Result<Self, Error> {
    let settings = config::Config::builder()
      .set_default("database_path", "data/fred_data.db")?
      .set_default("base_url", DEFAULT_BASE_URL)?
      .set_default("request_timeout_secs", 30)?
      .set_default("request_delay_ms", 100)?
      .set_default("log_level", "info")?
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("FREDB")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("series"),
      )
      .set_override_option("api_key", api_key)?
      .build()?;

    Ok(settings.try_deserialize()?)
  }

  /// The configured series list: `series` first, then each category in
  /// name order.
  pub fn series_ids(&self) -> Vec<String> {
    self
      .series
      .iter()
      .chain(self.categories.values().flatten())
      .cloned()
      .collect()
  }

  /// Client settings; fails if no API key was configured.
  pub fn fred_config(&self) -> Result<FredConfig, Error> {
    let api_key = self.api_key.trim();
    if api_key.is_empty() {
      return Err(Error::MissingApiKey);
    }
    Ok(FredConfig {
      base_url:      self.base_url.clone(),
      api_key:       api_key.to_owned(),
      timeout:       Duration::from_secs(self.request_timeout_secs),
      request_delay: Duration::from_millis(self.request_delay_ms),
    })
  }
}

impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("api_key", &REDACTED)
      .field("database_path", &self.database_path)
      .field("base_url", &self.base_url)
      .field("request_timeout_secs", &self.request_timeout_secs)
      .field("request_delay_ms", &self.request_delay_ms)
      .field("log_level", &self.log_level)
      .field("start_date", &self.start_date)
      .field("series", &self.series)
      .field("categories", &self.categories)
      .finish()
  }
}
