//! Per-run summary printed at the end of `fredb extract`.

use std::fmt;

/// What happened to one series: rows written, or the failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesOutcome {
  pub series_id: String,
  pub result:    Result<usize, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
  pub outcomes: Vec<SeriesOutcome>,
}

impl RunSummary {
  pub fn succeeded(&self) -> usize { self.outcomes.iter().filter(|o| o.result.is_ok()).count() }

  pub fn failed(&self) -> usize { self.outcomes.len() - self.succeeded() }

  pub fn all_succeeded(&self) -> bool { self.failed() == 0 }
}

impl fmt::Display for RunSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let width = self
      .outcomes
      .iter()
      .map(|o| o.series_id.len())
      .max()
      .unwrap_or(0);

    for o in &self.outcomes {
      match &o.result {
        Ok(rows) => writeln!(f, "{:<width$}  ok      {rows} rows", o.series_id)?,
        Err(msg) => writeln!(f, "{:<width$}  FAILED  {msg}", o.series_id)?,
      }
    }
    writeln!(f, "{} succeeded, {} failed", self.succeeded(), self.failed())
  }
}
