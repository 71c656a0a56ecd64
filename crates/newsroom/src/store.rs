//! Flat-file JSON store for news releases.
//!
//! Each operation loads the whole collection, works in memory and, for
//! writes, saves the whole collection back. There is no locking: two
//! concurrent appends race and the last writer wins. Writes go through a
//! temp file and a rename, so readers never see a half-written file.

use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::classify;
use crate::dates;
use crate::error::{NewsroomError, Result};
use crate::ingest::{self, IngestOptions};
use crate::release::{Category, NewRelease, NewsRelease};
use crate::text;

/// Filters and pagination for a read. Filters are ANDed; `None` means no constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
  /// 1-based page number
  pub page: usize,
  pub limit: usize,
  pub category: Option<Category>,
  pub tag: Option<String>,
  pub search: Option<String>,
  /// Single-item lookup; overrides the other fields
  pub slug: Option<String>,
}

impl Default for NewsQuery {
  fn default() -> Self {
    Self { page: 1, limit: 10, category: None, tag: None, search: None, slug: None }
  }
}

/// One page of results, shaped like the site's news API response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPage {
  pub news: Vec<NewsRelease>,
  pub total: usize,
  pub page: usize,
  pub total_pages: usize,
  pub has_more: bool,
}

impl NewsPage {
  fn empty(page: usize) -> Self {
    Self { news: Vec::new(), total: 0, page, total_pages: 0, has_more: false }
  }
}

/// Handle on the backing JSON file
#[derive(Debug, Clone)]
pub struct NewsStore {
  path: PathBuf,
}

impl NewsStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn exists(&self) -> bool {
    self.path.exists()
  }

  /// Load the collection. A missing file is an empty collection; unparseable
  /// JSON is an error.
  pub fn load(&self) -> Result<Vec<NewsRelease>> {
    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let content = fs::read_to_string(&self.path)?;
    serde_json::from_str(&content)
      .map_err(|source| NewsroomError::CorruptStore { path: self.path.clone(), source })
  }

  /// Write the collection as-is, two-space indented
  pub fn save(&self, records: &[NewsRelease]) -> Result<()> {
    let dir = match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(records)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(&self.path).map_err(|e| NewsroomError::Io(e.error))?;

    tracing::debug!(path = %self.path.display(), count = records.len(), "news store saved");
    Ok(())
  }

  /// Sort newest-first and replace the whole collection
  pub fn replace_all(&self, mut records: Vec<NewsRelease>) -> Result<Vec<NewsRelease>> {
    ingest::sort_newest_first(&mut records);
    self.save(&records)?;
    Ok(records)
  }

  pub fn query(&self, query: &NewsQuery) -> Result<NewsPage> {
    if !self.path.exists() {
      return Ok(NewsPage::empty(query.page.max(1)));
    }
    Ok(apply_query(self.load()?, query))
  }

  /// The release with exactly this slug, if any
  pub fn get_by_slug(&self, slug: &str) -> Result<Option<NewsRelease>> {
    Ok(self.load()?.into_iter().find(|r| r.slug == slug))
  }

  /// Create a release from partial input and put it at the head of the collection
  pub fn append(&self, input: NewRelease, options: &IngestOptions) -> Result<NewsRelease> {
    let release = build_release(input, options)?;

    let mut records = self.load()?;
    records.insert(0, release.clone());
    self.save(&records)?;

    tracing::debug!(id = %release.id, slug = %release.slug, "release appended");
    Ok(release)
  }
}

/// Fill in every derived field of a write-path release, dated now
pub fn build_release(input: NewRelease, options: &IngestOptions) -> Result<NewsRelease> {
  let title = input.title.trim().to_string();
  if title.is_empty() {
    return Err(NewsroomError::InvalidRelease("title must not be empty".to_string()));
  }

  let content = input.content.unwrap_or_default();
  let now = Utc::now();

  Ok(NewsRelease {
    id: Uuid::new_v4().to_string(),
    date: now,
    date_string: dates::format_long_date(&now),
    category: input.category.unwrap_or_else(|| classify::classify(&title, &content)),
    tags: match input.tags {
      Some(tags) => classify::vocabulary_tags(tags),
      None => classify::extract_tags(&title, &content),
    },
    slug: text::slugify(&title, options.slug_max_length),
    excerpt: input.excerpt.unwrap_or_else(|| text::excerpt(&content, options.excerpt_length)),
    read_time: text::read_time(&content, options.words_per_minute),
    title,
    content,
  })
}

/// Filter, sort newest-first and slice one page out of `records`
pub fn apply_query(records: Vec<NewsRelease>, query: &NewsQuery) -> NewsPage {
  if let Some(slug) = &query.slug {
    let found: Vec<NewsRelease> = records.into_iter().filter(|r| &r.slug == slug).take(1).collect();
    return NewsPage { total: found.len(), news: found, page: 1, total_pages: 1, has_more: false };
  }

  let page = query.page.max(1);
  let limit = query.limit.max(1);
  let search = query.search.as_ref().map(|s| s.to_lowercase());

  let mut matched: Vec<NewsRelease> = records
    .into_iter()
    .filter(|r| query.category.map_or(true, |c| r.category == c))
    .filter(|r| query.tag.as_deref().map_or(true, |t| r.has_tag(t)))
    .filter(|r| search.as_deref().map_or(true, |s| r.mentions(s)))
    .collect();
  ingest::sort_newest_first(&mut matched);

  let total = matched.len();
  let total_pages = total.div_ceil(limit);
  let news = matched.into_iter().skip((page - 1).saturating_mul(limit)).take(limit).collect();

  NewsPage { news, total, page, total_pages, has_more: page < total_pages }
}
