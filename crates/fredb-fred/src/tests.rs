//! Tests for `FredClient` against a local mock server.

use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use fredb_core::{FetchError, observation::DateRange, source::SeriesSource};
use mockito::{Matcher, Server, ServerGuard};

use crate::{FredClient, FredConfig};

const SERIES_BODY: &str = r#"{
  "realtime_start": "2024-04-01",
  "realtime_end": "2024-04-01",
  "seriess": [{
    "id": "GDPC1",
    "realtime_start": "2024-04-01",
    "realtime_end": "2024-04-01",
    "title": "Real Gross Domestic Product",
    "observation_start": "1947-01-01",
    "observation_end": "2023-10-01",
    "frequency": "Quarterly",
    "frequency_short": "Q",
    "units": "Billions of Chained 2017 Dollars",
    "units_short": "Bil. of Chn. 2017 $",
    "seasonal_adjustment": "Seasonally Adjusted Annual Rate",
    "seasonal_adjustment_short": "SAAR",
    "last_updated": "2024-03-28 07:51:02-05",
    "popularity": 87,
    "notes": "BEA Account Code: A191RX"
  }]
}"#;

const OBSERVATIONS_BODY: &str = r#"{
  "observation_start": "2020-01-01",
  "count": 3,
  "observations": [
    {"realtime_start": "2024-04-01", "realtime_end": "2024-04-01", "date": "2020-01-01", "value": "20693.238"},
    {"realtime_start": "2024-04-01", "realtime_end": "2024-04-01", "date": "2020-04-01", "value": "."},
    {"realtime_start": "2024-04-01", "realtime_end": "2024-04-01", "date": "2020-07-01", "value": "20548.793"}
  ]
}"#;

fn client(server: &ServerGuard) -> FredClient {
  FredClient::new(FredConfig {
    base_url:      server.url(),
    api_key:       "test-key".into(),
    timeout:       Duration::from_secs(5),
    request_delay: Duration::ZERO,
  })
  .unwrap()
}

fn query(series_id: &str) -> Matcher {
  Matcher::AllOf(vec![
    Matcher::UrlEncoded("series_id".into(), series_id.into()),
    Matcher::UrlEncoded("api_key".into(), "test-key".into()),
    Matcher::UrlEncoded("file_type".into(), "json".into()),
  ])
}

#[tokio::test]
async fn fetch_returns_metadata_and_raw_observations() {
  let mut server = Server::new_async().await;
  let series_mock = server
    .mock("GET", "/series")
    .match_query(query("GDPC1"))
    .with_header("content-type", "application/json")
    .with_body(SERIES_BODY)
    .create_async()
    .await;
  let obs_mock = server
    .mock("GET", "/series/observations")
    .match_query(Matcher::AllOf(vec![
      query("GDPC1"),
      Matcher::UrlEncoded("observation_start".into(), "2020-01-01".into()),
    ]))
    .with_header("content-type", "application/json")
    .with_body(OBSERVATIONS_BODY)
    .create_async()
    .await;

  let range = DateRange {
    start: NaiveDate::from_ymd_opt(2020, 1, 1),
    end:   None,
  };
  let fetched = client(&server).fetch("GDPC1", &range).await.unwrap();

  series_mock.assert_async().await;
  obs_mock.assert_async().await;

  let s = &fetched.series;
  assert_eq!(s.series_id, "GDPC1");
  assert_eq!(s.title, "Real Gross Domestic Product");
  assert_eq!(s.units, "Billions of Chained 2017 Dollars");
  assert_eq!(s.frequency, "Quarterly");
  assert_eq!(
    s.last_updated,
    Some(Utc.with_ymd_and_hms(2024, 3, 28, 12, 51, 2).unwrap())
  );
  assert_eq!(s.observation_start, NaiveDate::from_ymd_opt(1947, 1, 1));
  assert_eq!(s.popularity, Some(87));

  let values: Vec<_> = fetched
    .observations
    .iter()
    .map(|o| (o.date.as_str(), o.value.as_deref()))
    .collect();
  assert_eq!(
    values,
    [
      ("2020-01-01", Some("20693.238")),
      ("2020-04-01", None),
      ("2020-07-01", Some("20548.793")),
    ]
  );
}

#[tokio::test]
async fn empty_seriess_is_unknown_series() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("GET", "/series")
    .match_query(query("NOPE"))
    .with_body(r#"{"seriess": []}"#)
    .create_async()
    .await;

  let err = client(&server).fetch("NOPE", &DateRange::default()).await.unwrap_err();
  assert!(matches!(err, FetchError::UnknownSeries(ref id) if id == "NOPE"));
}

#[tokio::test]
async fn bad_request_for_missing_series_is_unknown_series() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("GET", "/series")
    .match_query(query("NOPE"))
    .with_status(400)
    .with_body(r#"{"error_code":400,"error_message":"Bad Request.  The series does not exist."}"#)
    .create_async()
    .await;

  let err = client(&server).series_info("NOPE").await.unwrap_err();
  assert!(matches!(err, FetchError::UnknownSeries(_)));
}

#[tokio::test]
async fn bad_api_key_is_unauthorized() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("GET", "/series")
    .match_query(Matcher::Any)
    .with_status(400)
    .with_body(
      r#"{"error_code":400,"error_message":"Bad Request.  The value for variable api_key is not registered."}"#,
    )
    .create_async()
    .await;

  let err = client(&server).series_info("GDPC1").await.unwrap_err();
  assert!(matches!(err, FetchError::Unauthorized(ref m) if m.contains("api_key")));
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("GET", "/series")
    .match_query(Matcher::Any)
    .with_status(429)
    .with_header("retry-after", "30")
    .create_async()
    .await;

  let err = client(&server).series_info("GDPC1").await.unwrap_err();
  assert!(matches!(err, FetchError::RateLimited { retry_after_secs: Some(30) }));
}

#[tokio::test]
async fn server_error_keeps_status() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("GET", "/series")
    .match_query(Matcher::Any)
    .with_status(503)
    .create_async()
    .await;

  let err = client(&server).series_info("GDPC1").await.unwrap_err();
  assert!(matches!(err, FetchError::Http { status: 503, .. }));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("GET", "/series/observations")
    .match_query(Matcher::Any)
    .with_body(r#"{"observations": "soon"}"#)
    .create_async()
    .await;

  let err = client(&server)
    .observations("GDPC1", &DateRange::default())
    .await
    .unwrap_err();
  assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
  let client = FredClient::new(FredConfig {
    base_url:      "http://127.0.0.1:1".into(),
    api_key:       "test-key".into(),
    timeout:       Duration::from_secs(5),
    request_delay: Duration::ZERO,
  })
  .unwrap();

  let err = client.series_info("GDPC1").await.unwrap_err();
  assert!(matches!(err, FetchError::Network(_) | FetchError::Timeout(_)));
  assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn search_returns_series() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("GET", "/series/search")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("search_text".into(), "real gdp".into()),
      Matcher::UrlEncoded("limit".into(), "5".into()),
    ]))
    .with_body(SERIES_BODY)
    .create_async()
    .await;

  let found = client(&server).search("real gdp", 5).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].series_id, "GDPC1");
}

#[tokio::test]
async fn popular_searches_everything_by_popularity() {
  let mut server = Server::new_async().await;
  let _mock = server
    .mock("GET", "/series/search")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("search_text".into(), "*".into()),
      Matcher::UrlEncoded("order_by".into(), "popularity".into()),
      Matcher::UrlEncoded("sort_order".into(), "desc".into()),
      Matcher::UrlEncoded("limit".into(), "10".into()),
    ]))
    .with_body(SERIES_BODY)
    .create_async()
    .await;

  let found = client(&server).popular(10).await.unwrap();
  assert_eq!(found[0].popularity, Some(87));
}

#[tokio::test]
async fn silent_server_is_timeout() {
  // Accepts connections and never answers.
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  let _server = tokio::spawn(async move {
    let mut held = Vec::new();
    while let Ok((socket, _)) = listener.accept().await {
      held.push(socket);
    }
  });

  let client = FredClient::new(FredConfig {
    base_url:      format!("http://{addr}"),
    api_key:       "test-key".into(),
    timeout:       Duration::from_millis(200),
    request_delay: Duration::ZERO,
  })
  .unwrap();

  let err = client.series_info("GDPC1").await.unwrap_err();
  assert!(matches!(err, FetchError::Timeout(_)), "{err:?}");
  assert!(!err.to_string().contains("test-key"));
}

#[test]
fn config_debug_hides_api_key() {
  let cfg = FredConfig::new("secret-key-123");
  let text = format!("{cfg:?}");
  assert!(!text.contains("secret-key-123"));
  assert!(text.contains(crate::REDACTED));
}
