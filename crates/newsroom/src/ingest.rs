//! CSV reading and the ingestion transform.
//!
//! Every row yields a record. Missing fields and unparseable datelines
//! degrade that record instead of failing the batch.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

use crate::classify;
use crate::dates::{self, DateRule};
use crate::error::{NewsroomError, Result};
use crate::overrides::OverrideTable;
use crate::release::{NewsRelease, RawRelease};
use crate::text;

const UNTITLED: &str = "Untitled";

/// Limits used when deriving excerpt, read time and slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
  pub excerpt_length: usize,
  pub words_per_minute: usize,
  pub slug_max_length: usize,
}

impl Default for IngestOptions {
  fn default() -> Self {
    Self {
      excerpt_length: text::DEFAULT_EXCERPT_LENGTH,
      words_per_minute: text::DEFAULT_WORDS_PER_MINUTE,
      slug_max_length: text::DEFAULT_SLUG_LENGTH,
    }
  }
}

/// A normalized release together with the rule that settled its date
#[derive(Debug, Clone)]
pub struct Ingested {
  pub release: NewsRelease,
  pub rule: DateRule,
}

/// Read press release rows. Rows that fail to decode are skipped with a warning.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRelease>> {
  let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

  let headers = csv_reader.headers()?.clone();
  if !headers.iter().any(|h| h == "Title") {
    return Err(NewsroomError::InvalidRelease("CSV header has no Title column".to_string()));
  }
  if !headers.iter().any(|h| h == "Content") {
    tracing::warn!("CSV header has no Content column, every release will be empty");
  }

  let mut rows = Vec::new();
  for (index, row) in csv_reader.deserialize::<RawRelease>().enumerate() {
    match row {
      Ok(raw) => rows.push(raw),
      Err(e) => tracing::warn!(row = index + 1, error = %e, "skipping unreadable CSV row"),
    }
  }
  Ok(rows)
}

pub fn read_csv_file(path: &Path) -> Result<Vec<RawRelease>> {
  let file = File::open(path)?;
  read_csv(file)
}

/// Normalize one raw row. `now` is the fallback date when no rule matches.
pub fn normalize(
  raw: &RawRelease,
  overrides: &OverrideTable,
  options: &IngestOptions,
  now: DateTime<Utc>,
) -> Ingested {
  let title = raw
    .title
    .as_deref()
    .filter(|t| !t.trim().is_empty())
    .unwrap_or(UNTITLED)
    .to_string();
  let content = raw.content.clone().unwrap_or_default();

  let resolution = dates::resolve(&title, &content, overrides, &dates::DATELINE_PATTERNS, now);

  let id = raw
    .id
    .as_deref()
    .map(str::trim)
    .filter(|id| !id.is_empty())
    .map(str::to_string)
    .unwrap_or_else(|| Uuid::new_v4().to_string());

  let release = NewsRelease {
    id,
    date_string: resolution.date_string(),
    date: resolution.date,
    category: classify::classify(&title, &content),
    tags: classify::extract_tags(&title, &content),
    slug: text::slugify(&title, options.slug_max_length),
    excerpt: text::excerpt(&content, options.excerpt_length),
    read_time: text::read_time(&content, options.words_per_minute),
    title,
    content,
  };

  Ingested { release, rule: resolution.rule }
}

/// Normalize every row, one-to-one and in input order. A CSV id already
/// used earlier in the batch is replaced with a fresh one.
pub fn transform(
  rows: &[RawRelease],
  overrides: &OverrideTable,
  options: &IngestOptions,
  now: DateTime<Utc>,
) -> Vec<Ingested> {
  let mut seen_ids = HashSet::new();
  rows
    .iter()
    .map(|raw| {
      let mut ingested = normalize(raw, overrides, options, now);
      if !seen_ids.insert(ingested.release.id.clone()) {
        let fresh = Uuid::new_v4().to_string();
        tracing::warn!(
          id = %ingested.release.id,
          title = %ingested.release.title,
          replacement = %fresh,
          "duplicate id in CSV, assigning a fresh one"
        );
        ingested.release.id = fresh.clone();
        seen_ids.insert(fresh);
      }
      ingested
    })
    .collect()
}

/// Newest first; releases sharing a date keep their relative order
pub fn sort_newest_first(records: &mut [NewsRelease]) {
  records.sort_by(|a, b| b.date.cmp(&a.date));
}
