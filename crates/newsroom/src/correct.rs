//! Date-correction pass over an existing store.
//!
//! Re-derives every release date with the broader pattern list, then
//! re-sorts and rewrites the collection.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::dates::{self, DateRule};
use crate::error::Result;
use crate::overrides::OverrideTable;
use crate::release::NewsRelease;
use crate::store::NewsStore;

/// What happens to a release when neither an override nor a pattern finds a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
  /// Leave the stored date untouched
  #[default]
  KeepExisting,
  /// Stamp the release with the time of the run
  Now,
}

/// What the pass decided for one release
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
  pub id: String,
  pub title: String,
  pub rule: DateRule,
  pub previous: DateTime<Utc>,
  pub date: DateTime<Utc>,
}

impl Correction {
  pub fn changed(&self) -> bool {
    self.previous != self.date
  }
}

#[derive(Debug, Clone)]
pub struct CorrectionReport {
  /// Corrected releases, newest first
  pub records: Vec<NewsRelease>,
  /// One entry per release, in stored order
  pub corrections: Vec<Correction>,
}

impl CorrectionReport {
  pub fn count_by_label(&self, label: &str) -> usize {
    self.corrections.iter().filter(|c| c.rule.label() == label).count()
  }

  pub fn changed(&self) -> usize {
    self.corrections.iter().filter(|c| c.changed()).count()
  }
}

/// Re-derive dates for every release and return them sorted newest-first
pub fn correct_dates(
  records: Vec<NewsRelease>,
  overrides: &OverrideTable,
  policy: FallbackPolicy,
  now: DateTime<Utc>,
) -> CorrectionReport {
  let mut corrections = Vec::with_capacity(records.len());

  let mut corrected: Vec<NewsRelease> = records
    .into_iter()
    .map(|mut release| {
      let fallback = match policy {
        FallbackPolicy::KeepExisting => release.date,
        FallbackPolicy::Now => now,
      };
      let resolution = dates::resolve(
        &release.title,
        &release.content,
        overrides,
        &dates::CORRECTION_PATTERNS,
        fallback,
      );

      corrections.push(Correction {
        id: release.id.clone(),
        title: release.title.clone(),
        rule: resolution.rule,
        previous: release.date,
        date: resolution.date,
      });

      // replaced as a pair so date_string always agrees with date
      release.set_date(resolution.date);
      release
    })
    .collect();

  crate::ingest::sort_newest_first(&mut corrected);
  CorrectionReport { records: corrected, corrections }
}

/// Load the store, correct every date and write the result back
pub fn run(
  store: &NewsStore,
  overrides: &OverrideTable,
  policy: FallbackPolicy,
  now: DateTime<Utc>,
) -> Result<CorrectionReport> {
  let records = store.load()?;
  let report = correct_dates(records, overrides, policy, now);
  store.save(&report.records)?;
  Ok(report)
}
