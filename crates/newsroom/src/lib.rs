//! Newsroom - Press Release Ingestion and News Store
//!
//! Turns a CSV export of press releases into normalized, categorized and
//! tagged records, keeps them in a flat JSON file, and answers paged,
//! filtered queries over that file.

pub mod classify;
pub mod commands;
pub mod config;
pub mod correct;
pub mod dates;
pub mod error;
pub mod ingest;
pub mod overrides;
pub mod release;
pub mod store;
pub mod text;

pub use error::{NewsroomError, Result};
pub use release::{Category, NewRelease, NewsRelease, RawRelease};
pub use store::{NewsPage, NewsQuery, NewsStore};
