//! [`FredClient`] — HTTP access to the FRED API.

use std::{fmt, time::Duration};

use fredb_core::{
  FetchError,
  observation::{DateRange, FetchedSeries, RawObservation},
  series::Series,
  source::SeriesSource,
  validate::DATE_FORMAT,
};
use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::wire::{ErrorBody, ObservationsResponse, SeriesResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Connection settings for the FRED API.
#[derive(Clone)]
pub struct FredConfig {
  pub base_url:      String,
  pub api_key:       String,
  /// Per-call timeout; expiry surfaces as [`FetchError::Timeout`].
  pub timeout:       Duration,
  /// Pause before every request, to stay under the provider's rate limit.
  pub request_delay: Duration,
}

impl FredConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      base_url:      DEFAULT_BASE_URL.to_string(),
      api_key:       api_key.into(),
      timeout:       Duration::from_secs(30),
      request_delay: Duration::from_millis(100),
    }
  }
}

impl fmt::Debug for FredConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FredConfig")
      .field("base_url", &self.base_url)
      .field("api_key", &REDACTED)
      .field("timeout", &self.timeout)
      .field("request_delay", &self.request_delay)
      .finish()
  }
}

/// Stand-in for the API key in `Debug` output.
pub const REDACTED: &str = "<redacted>";

/// Async HTTP client for the FRED JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FredClient {
  client: Client,
  config: FredConfig,
}

impl FredClient {
  pub fn new(config: FredConfig) -> Result<Self, FetchError> {
    let client = Client::builder()
      .timeout(config.timeout)
      .user_agent(concat!("fredb/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { client, config })
  }

  fn url(&self, endpoint: &str) -> String {
    format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
  }

  /// Issue one GET against `endpoint` and decode the JSON body.
  ///
  /// `subject` names what was asked for (a series id or search text) and
  /// ends up in "unknown series" errors.
  async fn get<T: DeserializeOwned>(
    &self,
    endpoint: &str,
    subject: &str,
    params: &[(&str, String)],
  ) -> Result<T, FetchError> {
    if !self.config.request_delay.is_zero() {
      tokio::time::sleep(self.config.request_delay).await;
    }

    debug!(endpoint, subject, "FRED request");
    let resp = self
      .client
      .get(self.url(endpoint))
      .query(&[("api_key", self.config.api_key.as_str()), ("file_type", "json")])
      .query(params)
      .send()
      .await
      .map_err(transport_error)?;

    let status = resp.status();
    if !status.is_success() {
      let retry_after = resp
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
      let body = resp.text().await.unwrap_or_default();
      return Err(status_error(status, retry_after, &body, subject));
    }

    resp.json::<T>().await.map_err(|e| {
      if e.is_timeout() {
        FetchError::Timeout(e.without_url().to_string())
      } else {
        FetchError::Decode(format!("{endpoint}: {}", e.without_url()))
      }
    })
  }

  // ── Endpoints ─────────────────────────────────────────────────────────────

  /// `GET /series` — metadata for one series.
  pub async fn series_info(&self, series_id: &str) -> Result<Series, FetchError> {
    let resp: SeriesResponse = self
      .get("series", series_id, &[("series_id", series_id.to_owned())])
      .await?;

    resp
      .seriess
      .into_iter()
      .next()
      .ok_or_else(|| FetchError::UnknownSeries(series_id.to_owned()))?
      .into_series()
  }

  /// `GET /series/observations` — every observation of a series within
  /// `range`, in provider order.
  pub async fn observations(
    &self,
    series_id: &str,
    range: &DateRange,
  ) -> Result<Vec<RawObservation>, FetchError> {
    let mut params = vec![("series_id", series_id.to_owned())];
    if let Some(start) = range.start {
      params.push(("observation_start", start.format(DATE_FORMAT).to_string()));
    }
    if let Some(end) = range.end {
      params.push(("observation_end", end.format(DATE_FORMAT).to_string()));
    }

    let resp: ObservationsResponse = self
      .get("series/observations", series_id, &params)
      .await?;
    Ok(resp.observations.into_iter().map(RawObservation::from).collect())
  }

  /// `GET /series/search` — series whose metadata matches `text`, most
  /// popular first.
  pub async fn search(&self, text: &str, limit: usize) -> Result<Vec<Series>, FetchError> {
    let resp: SeriesResponse = self
      .get(
        "series/search",
        text,
        &[
          ("search_text", text.to_owned()),
          ("order_by", "popularity".to_owned()),
          ("sort_order", "desc".to_owned()),
          ("limit", limit.to_string()),
        ],
      )
      .await?;

    resp.seriess.into_iter().map(|s| s.into_series()).collect()
  }

  /// The most popular series on FRED, regardless of subject.
  pub async fn popular(&self, limit: usize) -> Result<Vec<Series>, FetchError> {
    self.search("*", limit).await
  }
}

impl SeriesSource for FredClient {
  async fn fetch(&self, series_id: &str, range: &DateRange) -> Result<FetchedSeries, FetchError> {
    let series = self.series_info(series_id).await?;
    let observations = self.observations(series_id, range).await?;
    Ok(FetchedSeries { series, observations })
  }
}

// ─── Error classification ────────────────────────────────────────────────────

fn transport_error(e: reqwest::Error) -> FetchError {
  // The URL carries the API key; keep it out of error messages.
  let timed_out = e.is_timeout();
  let message = e.without_url().to_string();
  if timed_out {
    FetchError::Timeout(message)
  } else {
    FetchError::Network(message)
  }
}

fn status_error(
  status: StatusCode,
  retry_after: Option<u64>,
  body: &str,
  subject: &str,
) -> FetchError {
  let message = serde_json::from_str::<ErrorBody>(body)
    .ok()
    .and_then(|b| b.error_message)
    .unwrap_or_else(|| {
      status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_owned()
    });

  match status {
    StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { retry_after_secs: retry_after },
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Unauthorized(message),
    StatusCode::NOT_FOUND => FetchError::UnknownSeries(subject.to_owned()),
    StatusCode::BAD_REQUEST if message.contains("api_key") => FetchError::Unauthorized(message),
    StatusCode::BAD_REQUEST if message.contains("does not exist") => {
      FetchError::UnknownSeries(subject.to_owned())
    }
    _ => FetchError::Http { status: status.as_u16(), message },
  }
}
