//! Manual date overrides for releases whose datelines can't be parsed.
//!
//! The table is data: a YAML mapping from exact title to date.
//!
//! ```yaml
//! "Private Placement": "October 4, 2023"
//! "Options Extended": "2013-01-15"
//! ```

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::dates;
use crate::error::{NewsroomError, Result};

#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
  entries: HashMap<String, DateTime<Utc>>,
}

impl OverrideTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add an entry under its trimmed title, rejecting dates that don't parse
  pub fn insert(&mut self, title: impl Into<String>, date_text: &str) -> Result<()> {
    let title = title.into().trim().to_string();
    let date = dates::parse_long_date(date_text).ok_or_else(|| NewsroomError::OverrideDate {
      title: title.clone(),
      value: date_text.to_string(),
    })?;
    self.entries.insert(title, date);
    Ok(())
  }

  /// Load the table from a YAML file. A missing file is an empty table.
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      tracing::debug!(path = %path.display(), "no override table, continuing without one");
      return Ok(Self::new());
    }

    let text = fs::read_to_string(path)?;
    Self::parse(&text, path)
  }

  pub fn from_yaml_str(text: &str) -> Result<Self> {
    Self::parse(text, Path::new("<inline>"))
  }

  fn parse(text: &str, origin: &Path) -> Result<Self> {
    if text.trim().is_empty() {
      return Ok(Self::new());
    }

    let raw: BTreeMap<String, String> = serde_yaml::from_str(text).map_err(|e| {
      NewsroomError::Overrides { path: origin.to_path_buf(), message: e.to_string() }
    })?;

    let mut table = Self::new();
    for (title, date_text) in raw {
      table.insert(title, &date_text)?;
    }
    Ok(table)
  }

  /// Exact title first, then the whitespace-trimmed title
  pub fn lookup(&self, title: &str) -> Option<DateTime<Utc>> {
    self
      .entries
      .get(title)
      .or_else(|| self.entries.get(title.trim()))
      .copied()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
