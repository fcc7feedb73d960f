//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use fredb_core::{
  log::{ExtractionStatus, NewLogEntry},
  observation::{DateRange, Observation},
  series::Series,
  store::{LogQuery, SeriesStore, StoreStats},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn d(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

fn obs(date: &str, value: Option<f64>) -> Observation { Observation { date: d(date), value } }

fn gdp() -> Series {
  let mut s = Series::new(
    "GDPC1",
    "Real Gross Domestic Product",
    "Billions of Chained 2017 Dollars",
    "Quarterly",
  );
  s.seasonal_adjustment = Some("Seasonally Adjusted Annual Rate".into());
  s.observation_start = Some(d("1947-01-01"));
  s.popularity = Some(87);
  s
}

fn quarters() -> Vec<Observation> {
  vec![
    obs("2020-01-01", Some(20693.238)),
    obs("2020-04-01", Some(19056.617)),
    obs("2020-07-01", Some(20548.793)),
  ]
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn init_schema_twice_keeps_data() {
  let s = store().await;
  s.store_series(&gdp(), &quarters()).await.unwrap();
  s.append_log_entry(NewLogEntry::success("GDPC1", 3)).await.unwrap();

  s.init_schema().await.unwrap();
  s.init_schema().await.unwrap();

  assert_eq!(s.get_series("GDPC1").await.unwrap(), Some(gdp()));
  let rows = s.get_observations("GDPC1", &DateRange::default()).await.unwrap();
  assert_eq!(rows, quarters());
  assert_eq!(s.log_entries(&LogQuery::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn reopen_file_store_keeps_data() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("fred_data.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.store_series(&gdp(), &quarters()).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let rows = s.get_observations("GDPC1", &DateRange::default()).await.unwrap();
  assert_eq!(rows, quarters());
}

// ─── Series metadata ─────────────────────────────────────────────────────────

#[tokio::test]
async fn get_series_missing_returns_none() {
  let s = store().await;
  assert!(s.get_series("NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_series_metadata_overwrites_fields() {
  let s = store().await;
  s.upsert_series_metadata(&gdp()).await.unwrap();

  let mut revised = gdp();
  revised.title = "Real GDP".into();
  revised.units = "Billions of Chained 2012 Dollars".into();
  revised.last_updated = Some(
    chrono::DateTime::parse_from_rfc3339("2024-03-28T12:51:02Z")
      .unwrap()
      .with_timezone(&chrono::Utc),
  );
  revised.notes = None;
  s.upsert_series_metadata(&revised).await.unwrap();

  let all = s.list_series().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0], revised);
}

#[tokio::test]
async fn list_series_is_ordered_by_id() {
  let s = store().await;
  for id in ["UNRATE", "CPIAUCSL", "GDPC1"] {
    s.upsert_series_metadata(&Series::new(id, id, "Percent", "Monthly"))
      .await
      .unwrap();
  }

  let ids: Vec<_> = s
    .list_series()
    .await
    .unwrap()
    .into_iter()
    .map(|s| s.series_id)
    .collect();
  assert_eq!(ids, ["CPIAUCSL", "GDPC1", "UNRATE"]);
}

// ─── Observations ────────────────────────────────────────────────────────────

#[tokio::test]
async fn storing_twice_yields_identical_rows() {
  let s = store().await;
  s.store_series(&gdp(), &quarters()).await.unwrap();
  let first = s.get_observations("GDPC1", &DateRange::default()).await.unwrap();

  let written = s.store_series(&gdp(), &quarters()).await.unwrap();
  let second = s.get_observations("GDPC1", &DateRange::default()).await.unwrap();

  assert_eq!(written, 3);
  assert_eq!(first, second);
  assert_eq!(s.stats().await.unwrap().observation_count, 3);
}

#[tokio::test]
async fn upsert_overwrites_existing_value() {
  let s = store().await;
  s.store_series(&gdp(), &quarters()).await.unwrap();

  s.upsert_observations("GDPC1", &[obs("2020-04-01", Some(19000.0))])
    .await
    .unwrap();

  let rows = s.get_observations("GDPC1", &DateRange::default()).await.unwrap();
  assert_eq!(rows.len(), 3);
  assert_eq!(rows[1], obs("2020-04-01", Some(19000.0)));
}

#[tokio::test]
async fn missing_value_is_stored_as_null() {
  let s = store().await;
  s.store_series(&gdp(), &[obs("2020-01-01", None), obs("2020-04-01", Some(0.0))])
    .await
    .unwrap();

  let rows = s.get_observations("GDPC1", &DateRange::default()).await.unwrap();
  assert_eq!(rows[0].value, None);
  assert_eq!(rows[1].value, Some(0.0));
}

#[tokio::test]
async fn observations_require_series_metadata() {
  let s = store().await;
  let err = s.upsert_observations("GDPC1", &quarters()).await;
  assert!(matches!(err, Err(crate::Error::Database(_))));

  assert_eq!(s.stats().await.unwrap().observation_count, 0);
}

#[tokio::test]
async fn store_series_is_all_or_nothing() {
  let s = store().await;
  s.execute_batch(
    "CREATE TRIGGER reject_march BEFORE INSERT ON observations
     WHEN NEW.date = '2020-03-01'
     BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
  )
  .await
  .unwrap();

  let batch = vec![
    obs("2020-01-01", Some(1.0)),
    obs("2020-02-01", Some(2.0)),
    obs("2020-03-01", Some(3.0)),
  ];
  assert!(s.store_series(&gdp(), &batch).await.is_err());

  assert!(s.get_series("GDPC1").await.unwrap().is_none());
  assert_eq!(s.stats().await.unwrap(), StoreStats::default());
}

#[tokio::test]
async fn get_observations_respects_range() {
  let s = store().await;
  s.store_series(&gdp(), &quarters()).await.unwrap();

  let range = DateRange { start: Some(d("2020-02-01")), end: Some(d("2020-07-01")) };
  let rows = s.get_observations("GDPC1", &range).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].date, d("2020-04-01"));

  let open_end = DateRange { start: Some(d("2020-05-01")), end: None };
  assert_eq!(s.get_observations("GDPC1", &open_end).await.unwrap().len(), 1);
}

// ─── Extraction log ──────────────────────────────────────────────────────────

#[tokio::test]
async fn log_entries_newest_first_with_filter_and_limit() {
  let s = store().await;
  s.append_log_entry(NewLogEntry::success("GDPC1", 3)).await.unwrap();
  s.append_log_entry(NewLogEntry::failure("BOGUS", "unknown series: BOGUS"))
    .await
    .unwrap();
  let last = s.append_log_entry(NewLogEntry::success("GDPC1", 4)).await.unwrap();

  let all = s.log_entries(&LogQuery::default()).await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all[0], last);
  assert_eq!(all[1].series_id, "BOGUS");
  assert_eq!(
    all[1].status,
    ExtractionStatus::Failure { message: "unknown series: BOGUS".into() }
  );

  let gdp_only = s
    .log_entries(&LogQuery { series_id: Some("GDPC1".into()), limit: Some(1) })
    .await
    .unwrap();
  assert_eq!(gdp_only.len(), 1);
  assert_eq!(gdp_only[0].status, ExtractionStatus::Success { rows: 4 });
}

#[tokio::test]
async fn stats_report_counts_and_range() {
  let s = store().await;
  s.store_series(&gdp(), &quarters()).await.unwrap();
  s.store_series(
    &Series::new("UNRATE", "Unemployment Rate", "Percent", "Monthly"),
    &[obs("2019-12-01", Some(3.6))],
  )
  .await
  .unwrap();

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.series_count, 2);
  assert_eq!(stats.observation_count, 4);
  assert_eq!(stats.first_date, Some(d("2019-12-01")));
  assert_eq!(stats.last_date, Some(d("2020-07-01")));
}
