//! Configuration for the newsroom tools
//!
//! Handles loading file paths, text limits and the correction fallback
//! policy, with defaults for anything a config file leaves out.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::correct::FallbackPolicy;
use crate::error::{NewsroomError, Result};
use crate::ingest::IngestOptions;
use crate::text;

/// Environment variable that overrides `store_path`
pub const STORE_ENV_VAR: &str = "NEWSROOM_STORE";

const CONFIG_PATHS: [&str; 3] = [".newsroom.json", "newsroom.json", ".newsroom/config.json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// JSON file holding the news collection
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Press release CSV read by `import`
  #[serde(default = "default_csv_path")]
  pub csv_path: PathBuf,
  /// YAML table of manual date overrides
  #[serde(default = "default_overrides_path")]
  pub overrides_path: PathBuf,
  #[serde(default = "default_excerpt_length")]
  pub excerpt_length: usize,
  #[serde(default = "default_words_per_minute")]
  pub words_per_minute: usize,
  #[serde(default = "default_slug_max_length")]
  pub slug_max_length: usize,
  /// Default page size for queries
  #[serde(default = "default_page_size")]
  pub page_size: usize,
  /// What the correction pass does when no rule finds a date
  #[serde(default)]
  pub correction_fallback: FallbackPolicy,
}

fn default_store_path() -> PathBuf {
  PathBuf::from("data/news.json")
}
fn default_csv_path() -> PathBuf {
  PathBuf::from("svgnewsreleases.csv")
}
fn default_overrides_path() -> PathBuf {
  PathBuf::from("data/date-overrides.yaml")
}
fn default_excerpt_length() -> usize {
  text::DEFAULT_EXCERPT_LENGTH
}
fn default_words_per_minute() -> usize {
  text::DEFAULT_WORDS_PER_MINUTE
}
fn default_slug_max_length() -> usize {
  text::DEFAULT_SLUG_LENGTH
}
fn default_page_size() -> usize {
  10
}

impl Default for Config {
  fn default() -> Self {
    Self {
      store_path: default_store_path(),
      csv_path: default_csv_path(),
      overrides_path: default_overrides_path(),
      excerpt_length: default_excerpt_length(),
      words_per_minute: default_words_per_minute(),
      slug_max_length: default_slug_max_length(),
      page_size: default_page_size(),
      correction_fallback: FallbackPolicy::default(),
    }
  }
}

impl Config {
  /// Load configuration from a file
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)
      .map_err(|e| NewsroomError::Config(format!("{}: {e}", path.display())))?;
    config.validate()?;
    Ok(config)
  }

  /// Load the explicit file if given, else the first config found in the
  /// working directory, else defaults. `NEWSROOM_STORE` wins over `store_path`.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    let mut config = match explicit {
      Some(path) => Self::load_from_file(path)?,
      None => match CONFIG_PATHS.iter().map(Path::new).find(|p| p.exists()) {
        Some(path) => Self::load_from_file(path)?,
        None => Config::default(),
      },
    };

    if let Ok(store) = std::env::var(STORE_ENV_VAR) {
      if !store.trim().is_empty() {
        config.store_path = PathBuf::from(store);
      }
    }

    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    let limits = [
      ("excerpt_length", self.excerpt_length),
      ("words_per_minute", self.words_per_minute),
      ("slug_max_length", self.slug_max_length),
      ("page_size", self.page_size),
    ];
    match limits.iter().find(|(_, value)| *value == 0) {
      Some((name, _)) => Err(NewsroomError::Config(format!("{name} must be greater than zero"))),
      None => Ok(()),
    }
  }

  pub fn ingest_options(&self) -> IngestOptions {
    IngestOptions {
      excerpt_length: self.excerpt_length,
      words_per_minute: self.words_per_minute,
      slug_max_length: self.slug_max_length,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("newsroom.json");
    fs::write(&path, r#"{"page_size": 25, "correction_fallback": "now"}"#).unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.page_size, 25);
    assert_eq!(config.correction_fallback, FallbackPolicy::Now);
    assert_eq!(config.excerpt_length, 200);
    assert_eq!(config.store_path, PathBuf::from("data/news.json"));
  }

  #[test]
  fn zero_limits_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("newsroom.json");
    fs::write(&path, r#"{"words_per_minute": 0}"#).unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("words_per_minute"));
  }

  #[test]
  fn unknown_fallback_policy_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("newsroom.json");
    fs::write(&path, r#"{"correction_fallback": "guess"}"#).unwrap();
    assert!(Config::load_from_file(&path).is_err());
  }

  #[test]
  fn ingest_options_follow_config() {
    let config = Config { slug_max_length: 40, ..Config::default() };
    assert_eq!(config.ingest_options().slug_max_length, 40);
  }
}
