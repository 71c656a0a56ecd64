//! Dateline parsing and the ordered date rules.
//!
//! Press releases open with a dateline such as
//! `<p><strong>July 13, 2021 Victoria</strong>`. The rules here find that date,
//! falling back through a fixed order: manual override, regex patterns, then a
//! caller-supplied fallback value.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::overrides::OverrideTable;

const MONTH_NAMES: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec";

/// How far into the content an emphasized dateline may start
const EMPHASIS_WINDOW: usize = 400;

static DATE_IN_TEXT: Lazy<Regex> = Lazy::new(|| {
  Regex::new(&format!(r"(?i)\b({MONTH_NAMES})\.?\s+(\d{{1,2}}),\s+(\d{{4}})\b")).unwrap()
});

static WHOLE_DATE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(&format!(r"(?i)^({MONTH_NAMES})\.?\s+(\d{{1,2}}),\s+(\d{{4}})$")).unwrap()
});

/// Which part of the content a pattern is run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  /// Content with leading markup and block comments stripped
  Leading,
  /// The first N characters of the content
  Head(usize),
  Anywhere,
}

/// A named dateline pattern. Group 1 holds text containing the date.
#[derive(Debug)]
pub struct DatePattern {
  pub name: &'static str,
  pub scope: Scope,
  regex: Regex,
}

impl DatePattern {
  fn new(name: &'static str, scope: Scope, pattern: &str) -> Self {
    let date = format!(r"(?:{MONTH_NAMES})\.?\s+\d{{1,2}},\s+\d{{4}}");
    let regex = Regex::new(&pattern.replace("DATE", &date)).unwrap();
    Self { name, scope, regex }
  }

  /// Run this pattern over `content`, returning the first valid date it yields
  pub fn find(&self, content: &str) -> Option<DateTime<Utc>> {
    let text = match self.scope {
      Scope::Leading => strip_leading_markup(content),
      Scope::Head(limit) => head(content, limit),
      Scope::Anywhere => content,
    };

    self
      .regex
      .captures_iter(text)
      .filter_map(|caps| caps.get(1))
      .find_map(|m| find_date(m.as_str()))
  }
}

/// Patterns used at ingestion: the dateline must sit at the start of the release
pub static DATELINE_PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
  vec![
    DatePattern::new("leading-dateline", Scope::Leading, r"(?i)^(DATE)"),
    DatePattern::new(
      "emphasis-dateline",
      Scope::Head(EMPHASIS_WINDOW),
      r"(?i)<(?:strong|em|b)>\s*(?:<(?:strong|em|b)>\s*)*([^<]*?DATE)",
    ),
  ]
});

/// Broader patterns used by the correction pass, searched through the whole body
pub static CORRECTION_PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
  vec![
    DatePattern::new("leading-dateline", Scope::Leading, r"(?i)^(DATE)"),
    DatePattern::new("strong-paragraph", Scope::Anywhere, r"(?i)<p><strong>([^<]*?DATE)[^<]*?</strong>"),
    DatePattern::new(
      "strong-em-paragraph",
      Scope::Anywhere,
      r"(?i)<p><strong><em>([^<]*?DATE)[^<]*?</em></strong>",
    ),
    DatePattern::new("strong", Scope::Anywhere, r"(?i)<strong>([^<]*?DATE)[^<]*?</strong>"),
    DatePattern::new("em", Scope::Anywhere, r"(?i)<em>([^<]*?DATE)[^<]*?</em>"),
    DatePattern::new("paragraph", Scope::Anywhere, r"(?i)<p>\s*([^<]*?DATE)"),
  ]
});

/// Which rule settled a record's date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRule {
  Manual,
  Regex(&'static str),
  Fallback,
}

impl DateRule {
  /// Audit label for this rule
  pub fn label(&self) -> &'static str {
    match self {
      DateRule::Manual => "manual",
      DateRule::Regex(_) => "extracted",
      DateRule::Fallback => "fallback",
    }
  }

  pub fn is_fallback(&self) -> bool {
    matches!(self, DateRule::Fallback)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateResolution {
  pub date: DateTime<Utc>,
  pub rule: DateRule,
}

impl DateResolution {
  pub fn date_string(&self) -> String {
    format_long_date(&self.date)
  }
}

/// Resolve a release date: manual override, then each pattern in order, then `fallback`
pub fn resolve(
  title: &str,
  content: &str,
  overrides: &OverrideTable,
  patterns: &[DatePattern],
  fallback: DateTime<Utc>,
) -> DateResolution {
  if let Some(date) = overrides.lookup(title) {
    tracing::debug!(title, "date taken from manual override");
    return DateResolution { date, rule: DateRule::Manual };
  }

  for pattern in patterns {
    if let Some(date) = pattern.find(content) {
      tracing::debug!(title, pattern = pattern.name, "date extracted from content");
      return DateResolution { date, rule: DateRule::Regex(pattern.name) };
    }
  }

  tracing::debug!(title, "no dateline found, using fallback date");
  DateResolution { date: fallback, rule: DateRule::Fallback }
}

/// Render a date as "Month D, YYYY"
pub fn format_long_date(date: &DateTime<Utc>) -> String {
  date.format("%B %-d, %Y").to_string()
}

/// First valid "Month D, YYYY" date anywhere in `text`
pub fn find_date(text: &str) -> Option<DateTime<Utc>> {
  DATE_IN_TEXT.captures_iter(text).find_map(|caps| date_from_parts(&caps[1], &caps[2], &caps[3]))
}

/// Parse a string that is exactly one date, "Month D, YYYY" or "YYYY-MM-DD"
pub fn parse_long_date(text: &str) -> Option<DateTime<Utc>> {
  let text = text.trim();
  if let Some(caps) = WHOLE_DATE.captures(text) {
    return date_from_parts(&caps[1], &caps[2], &caps[3]);
  }
  NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().map(midnight_utc)
}

fn date_from_parts(month: &str, day: &str, year: &str) -> Option<DateTime<Utc>> {
  let month = month_number(month)?;
  let day = day.parse().ok()?;
  let year = year.parse().ok()?;
  NaiveDate::from_ymd_opt(year, month, day).map(midnight_utc)
}

fn month_number(name: &str) -> Option<u32> {
  const PREFIXES: [&str; 12] =
    ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"];
  let lower = name.to_lowercase();
  let prefix = lower.get(..3)?;
  PREFIXES.iter().position(|p| *p == prefix).map(|i| i as u32 + 1)
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
  Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Skip leading whitespace, HTML tags and `<!-- -->` block comments
pub fn strip_leading_markup(content: &str) -> &str {
  let mut rest = content.trim_start();
  loop {
    let skipped = if rest.starts_with("<!--") {
      rest.find("-->").map(|end| &rest[end + 3..])
    } else if rest.starts_with('<') {
      rest.find('>').map(|end| &rest[end + 1..])
    } else {
      None
    };

    match skipped {
      Some(next) => rest = next.trim_start(),
      None => return rest,
    }
  }
}

fn head(content: &str, limit: usize) -> &str {
  match content.char_indices().nth(limit) {
    Some((idx, _)) => &content[..idx],
    None => content,
  }
}
