//! `fredb` — extract FRED economic time series into SQLite.
//!
//! # Usage
//!
//! ```text
//! fredb init
//! fredb extract GDPC1 UNRATE --start 2020-01-01
//! fredb extract                 # series listed in fredb.toml
//! fredb show GDPC1 --start 2020-01-01
//! fredb list
//! fredb stats
//! fredb log --series GDPC1
//! fredb search "real gdp"
//! fredb search --popular
//! ```
//!
//! `FRED_API_KEY` must be set (directly or via `.env`) for `extract` and
//! `search`.

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context as _, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fredb_cli::{
  config::AppConfig,
  extract,
  inspect::{self, SeriesList},
};
use fredb_core::{
  log::ExtractionStatus,
  observation::DateRange,
  store::{LogQuery, SeriesStore},
};
use fredb_fred::FredClient;
use fredb_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Extract FRED economic time series into SQLite")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "fredb.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `database_path` from the config.
  #[arg(long, value_name = "PATH")]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the database schema. Safe to run repeatedly.
  Init,
  /// Fetch series from FRED and store them.
  ///
  /// A series for which FRED returns no observations in the requested range
  /// (for example `--start` after its latest date) is reported as failed,
  /// and the command then exits with status 1.
  Extract {
    /// Series identifiers (e.g. GDPC1 UNRATE). Defaults to the configured list.
    series: Vec<String>,

    /// Earliest observation date (YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Latest observation date (YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,
  },
  /// Print a stored series and its observations.
  Show {
    series_id: String,

    /// Earliest observation date (YYYY-MM-DD).
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Latest observation date (YYYY-MM-DD).
    #[arg(long)]
    end: Option<NaiveDate>,
  },
  /// List stored series.
  List,
  /// Show series and observation counts.
  Stats,
  /// Show recent extraction log entries.
  Log {
    /// Only entries for this series.
    #[arg(long)]
    series: Option<String>,

    #[arg(long, default_value_t = 20)]
    limit: usize,
  },
  /// Search FRED for series by text.
  Search {
    #[arg(required_unless_present = "popular")]
    text: Option<String>,

    /// List the most popular series instead of searching.
    #[arg(long, conflicts_with = "text")]
    popular: bool,

    #[arg(long, default_value_t = 20)]
    limit: usize,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  dotenvy::dotenv().ok();
  let cli = Cli::parse();

  let mut cfg = AppConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
  if let Some(path) = cli.database {
    cfg.database_path = path;
  }

  // Logs go to stderr; stdout carries the report.
  let default_level = cfg.log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  match cli.command {
    Command::Init => {
      open_store(&cfg).await?;
      println!("Database ready at {}", cfg.database_path.display());
      Ok(ExitCode::SUCCESS)
    }

    Command::Extract { series, start, end } => {
      let ids = if series.is_empty() { cfg.series_ids() } else { series };
      let ids = extract::normalize_series_ids(ids);
      if ids.is_empty() {
        bail!("no series to extract: name them on the command line or under `series` in the config");
      }

      let client = FredClient::new(cfg.fred_config()?)?;
      let store = open_store(&cfg).await?;
      let range = DateRange { start: start.or(cfg.start_date), end };

      let summary = extract::run(&client, &store, &ids, &range).await;
      print!("{summary}");

      Ok(if summary.all_succeeded() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }

    Command::Show { series_id, start, end } => {
      let store = open_store(&cfg).await?;
      let range = DateRange { start, end };
      let view = inspect::series_view(&store, &series_id, &range)
        .await
        .with_context(|| format!("failed to read {series_id}"))?;

      match view {
        Some(view) => {
          print!("{view}");
          Ok(ExitCode::SUCCESS)
        }
        None => {
          eprintln!("{series_id} has not been extracted");
          Ok(ExitCode::FAILURE)
        }
      }
    }

    Command::List => {
      let store = open_store(&cfg).await?;
      let series = store.list_series().await.context("failed to list series")?;
      print!("{}", SeriesList(&series));
      Ok(ExitCode::SUCCESS)
    }

    Command::Stats => {
      let store = open_store(&cfg).await?;
      let stats = store.stats().await.context("failed to read stats")?;

      println!("Series:       {}", stats.series_count);
      println!("Observations: {}", stats.observation_count);
      if let (Some(first), Some(last)) = (stats.first_date, stats.last_date) {
        println!("Date range:   {first} to {last}");
      }
      Ok(ExitCode::SUCCESS)
    }

    Command::Log { series, limit } => {
      let store = open_store(&cfg).await?;
      let entries = store
        .log_entries(&LogQuery { series_id: series, limit: Some(limit) })
        .await
        .context("failed to read extraction log")?;

      for e in entries {
        let at = e.extracted_at.format("%Y-%m-%d %H:%M:%S");
        match e.status {
          ExtractionStatus::Success { rows } => {
            println!("{at}  {:<12}  success  {rows} rows", e.series_id)
          }
          ExtractionStatus::Failure { message } => {
            println!("{at}  {:<12}  failure  {message}", e.series_id)
          }
        }
      }
      Ok(ExitCode::SUCCESS)
    }

    Command::Search { text, popular, limit } => {
      let client = FredClient::new(cfg.fred_config()?)?;
      let found = match text {
        Some(text) if !popular => client.search(&text, limit).await,
        _ => client.popular(limit).await,
      }
      .context("search failed")?;

      print!("{}", SeriesList(&found));
      Ok(ExitCode::SUCCESS)
    }
  }
}

/// Open the store, creating the database directory if needed. Any failure
/// here is fatal.
async fn open_store(cfg: &AppConfig) -> Result<SqliteStore> {
  let path = &cfg.database_path;
  if let Some(dir) = path.parent()
    && !dir.as_os_str().is_empty()
  {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {}", dir.display()))?;
  }

  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {}", path.display()))
}
