use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dates;

/// The closed set of categories a release can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
  #[serde(rename = "Exploration Update")]
  ExplorationUpdate,
  #[serde(rename = "Corporate News")]
  CorporateNews,
  #[serde(rename = "Financial Update")]
  FinancialUpdate,
  #[serde(rename = "Property News")]
  PropertyNews,
}

impl Category {
  pub const ALL: [Category; 4] = [
    Category::ExplorationUpdate,
    Category::CorporateNews,
    Category::FinancialUpdate,
    Category::PropertyNews,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::ExplorationUpdate => "Exploration Update",
      Category::CorporateNews => "Corporate News",
      Category::FinancialUpdate => "Financial Update",
      Category::PropertyNews => "Property News",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = String;

  /// Accepts the display name in any case, with spaces, hyphens or underscores
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = normalize_name(s);
    Category::ALL
      .into_iter()
      .find(|category| normalize_name(category.as_str()) == wanted)
      .ok_or_else(|| {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{s}' (expected one of: {})", names.join(", "))
      })
  }
}

fn normalize_name(name: &str) -> String {
  name.trim().to_lowercase().replace(['-', '_'], " ")
}

/// One row of the press release CSV, before any normalization
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRelease {
  #[serde(rename = "Title", default)]
  pub title: Option<String>,
  #[serde(rename = "Content", default)]
  pub content: Option<String>,
  #[serde(default)]
  pub id: Option<String>,
}

impl RawRelease {
  pub fn new(title: &str, content: &str) -> Self {
    Self { title: Some(title.to_string()), content: Some(content.to_string()), id: None }
  }
}

/// A normalized press release as persisted in the news store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRelease {
  pub id: String,
  pub title: String,
  pub content: String,
  pub date: DateTime<Utc>,
  pub date_string: String,
  pub category: Category,
  pub tags: Vec<String>,
  pub slug: String,
  pub excerpt: String,
  pub read_time: String,
}

impl NewsRelease {
  /// Replace the publication date, keeping `date_string` in step with it
  pub fn set_date(&mut self, date: DateTime<Utc>) {
    self.date = date;
    self.date_string = dates::format_long_date(&date);
  }

  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.iter().any(|t| t == tag)
  }

  /// Case-insensitive substring match over title and content
  pub fn mentions(&self, needle_lower: &str) -> bool {
    self.title.to_lowercase().contains(needle_lower)
      || self.content.to_lowercase().contains(needle_lower)
  }
}

/// Write-path input: a partial release with at least a title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRelease {
  pub title: String,
  #[serde(default)]
  pub content: Option<String>,
  #[serde(default)]
  pub category: Option<Category>,
  #[serde(default)]
  pub tags: Option<Vec<String>>,
  #[serde(default)]
  pub excerpt: Option<String>,
}

impl NewRelease {
  pub fn titled(title: &str) -> Self {
    Self { title: title.to_string(), ..Default::default() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn category_serializes_to_display_name() {
    let json = serde_json::to_string(&Category::CorporateNews).unwrap();
    assert_eq!(json, "\"Corporate News\"");
    let back: Category = serde_json::from_str("\"Property News\"").unwrap();
    assert_eq!(back, Category::PropertyNews);
  }

  #[test]
  fn category_parses_loose_names() {
    assert_eq!("exploration-update".parse::<Category>().unwrap(), Category::ExplorationUpdate);
    assert_eq!("FINANCIAL UPDATE".parse::<Category>().unwrap(), Category::FinancialUpdate);
    assert!("gossip".parse::<Category>().is_err());
  }

  #[test]
  fn set_date_keeps_date_string_in_step() {
    let mut release = NewsRelease {
      id: "1".into(),
      title: "Options Extended".into(),
      content: String::new(),
      date: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
      date_string: "January 1, 2000".into(),
      category: Category::CorporateNews,
      tags: vec![],
      slug: "options-extended".into(),
      excerpt: String::new(),
      read_time: "1 min read".into(),
    };
    release.set_date(Utc.with_ymd_and_hms(2013, 1, 15, 0, 0, 0).unwrap());
    assert_eq!(release.date_string, "January 15, 2013");
  }

  #[test]
  fn new_release_needs_only_a_title() {
    let input: NewRelease = serde_json::from_str(r#"{"title":"Private Placement"}"#).unwrap();
    assert_eq!(input, NewRelease::titled("Private Placement"));
  }
}
