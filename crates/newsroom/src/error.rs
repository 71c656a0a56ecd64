use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the news pipeline and store.
///
/// Extraction problems (no dateline, no tags) are not errors; they degrade
/// the record and are reported through the date rule that fired.
#[derive(Error, Debug)]
pub enum NewsroomError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("News store {path} is corrupt: {source}")]
  CorruptStore {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Serialization error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("Could not read date overrides from {path}: {message}")]
  Overrides { path: PathBuf, message: String },

  #[error("Override for \"{title}\" has an unreadable date: {value}")]
  OverrideDate { title: String, value: String },

  #[error("Invalid release: {0}")]
  InvalidRelease(String),

  #[error("Configuration error: {0}")]
  Config(String),
}

pub type Result<T> = std::result::Result<T, NewsroomError>;
