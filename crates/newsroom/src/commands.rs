use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::Config;
use crate::correct::{self, Correction, FallbackPolicy};
use crate::dates::{format_long_date, DateRule};
use crate::ingest::{self, Ingested};
use crate::overrides::OverrideTable;
use crate::release::{Category, NewRelease, NewsRelease};
use crate::store::{NewsPage, NewsQuery, NewsStore};

fn open_store(config: &Config) -> NewsStore {
  NewsStore::new(&config.store_path)
}

fn load_overrides(config: &Config) -> Result<OverrideTable> {
  let overrides = OverrideTable::load(&config.overrides_path)?;
  if !overrides.is_empty() {
    bentley::info(&format!(
      "Loaded {} date overrides from {}",
      overrides.len(),
      config.overrides_path.display()
    ));
  }
  Ok(overrides)
}

/// Ingest the press release CSV and replace the store with the result
pub fn import_news(config: &Config, csv_path: Option<&Path>) -> Result<()> {
  let csv_path = csv_path.unwrap_or(config.csv_path.as_path());

  bentley::announce("Importing news releases");
  let rows = ingest::read_csv_file(csv_path)
    .with_context(|| format!("Could not read press releases from {}", csv_path.display()))?;
  bentley::info(&format!("Parsed {} rows from {}", rows.len(), csv_path.display()));

  let overrides = load_overrides(config)?;
  let ingested = ingest::transform(&rows, &overrides, &config.ingest_options(), Utc::now());
  for item in &ingested {
    audit_ingested(item);
  }

  let store = open_store(config);
  let records = store.replace_all(ingested.into_iter().map(|i| i.release).collect())?;

  bentley::flourish(&format!("Saved {} releases to {}", records.len(), store.path().display()));
  print_summary(&records);
  Ok(())
}

fn audit_ingested(item: &Ingested) {
  let release = &item.release;
  let detail = match &item.rule {
    DateRule::Manual => release.date_string.clone(),
    DateRule::Regex(pattern) => format!("{} ({pattern})", release.date_string),
    DateRule::Fallback => format!("{} (no dateline found, using import time)", release.date_string),
  };
  bentley::audit(item.rule.label(), &release.title, &detail);
}

fn print_summary(records: &[NewsRelease]) {
  println!("{}", "Summary".bold());
  for (category, count) in category_counts(records) {
    println!("  {}: {}", category.to_string().cyan(), count);
  }
  // records are newest first
  if let (Some(newest), Some(oldest)) = (records.first(), records.last()) {
    println!("  Date range: {} to {}", oldest.date_string.yellow(), newest.date_string.yellow());
  }
}

fn category_counts(records: &[NewsRelease]) -> Vec<(Category, usize)> {
  Category::ALL
    .iter()
    .map(|category| (*category, records.iter().filter(|r| r.category == *category).count()))
    .collect()
}

/// Re-derive every stored date and rewrite the store
pub fn fix_dates(config: &Config, policy: Option<FallbackPolicy>) -> Result<()> {
  let policy = policy.unwrap_or(config.correction_fallback);
  let store = open_store(config);
  if !store.exists() {
    bentley::warn(&format!("No news store at {}", store.path().display()));
    return Ok(());
  }

  bentley::announce("Correcting release dates");
  let overrides = load_overrides(config)?;
  let report = correct::run(&store, &overrides, policy, Utc::now())?;

  for correction in &report.corrections {
    audit_correction(correction, policy);
  }

  bentley::success(&format!(
    "{} of {} releases changed ({} manual, {} extracted, {} fallback)",
    report.changed(),
    report.corrections.len(),
    report.count_by_label("manual"),
    report.count_by_label("extracted"),
    report.count_by_label("fallback"),
  ));
  Ok(())
}

fn audit_correction(correction: &Correction, policy: FallbackPolicy) {
  let new_date = format_long_date(&correction.date);
  let detail = match (&correction.rule, policy) {
    (DateRule::Fallback, FallbackPolicy::KeepExisting) => format!("kept {new_date}"),
    (DateRule::Fallback, FallbackPolicy::Now) => format!("{new_date} (no date found, using now)"),
    _ if correction.changed() => {
      format!("{new_date} (was {})", format_long_date(&correction.previous))
    }
    _ => new_date,
  };
  bentley::audit(correction.rule.label(), &correction.title, &detail);
}

/// Print one page of releases matching the query
pub fn list_news(config: &Config, query: &NewsQuery, json: bool) -> Result<()> {
  let page = open_store(config).query(query)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&page)?);
    return Ok(());
  }

  if page.news.is_empty() {
    println!("No news releases found");
    return Ok(());
  }

  for release in &page.news {
    print_release_line(release);
  }
  print_page_footer(&page);
  Ok(())
}

fn print_release_line(release: &NewsRelease) {
  println!(
    "{}  {} [{}] {}",
    release.date_string.yellow(),
    release.title.bold(),
    release.category.to_string().cyan(),
    release.slug.dimmed()
  );
}

fn print_page_footer(page: &NewsPage) {
  println!();
  println!(
    "Page {} of {} ({} releases{})",
    page.page,
    page.total_pages,
    page.total,
    if page.has_more { ", more available" } else { "" }
  );
}

/// Print a single release looked up by slug
pub fn get_news(config: &Config, slug: &str, json: bool) -> Result<()> {
  let release = open_store(config).get_by_slug(slug)?;

  match (release, json) {
    (Some(release), true) => println!("{}", serde_json::to_string_pretty(&release)?),
    (None, true) => println!("null"),
    (Some(release), false) => print_release(&release),
    (None, false) => println!("No release found with slug: {}", slug.yellow()),
  }
  Ok(())
}

fn print_release(release: &NewsRelease) {
  println!("{}", release.title.bold());
  println!("{} · {} · {}", release.date_string.yellow(), release.category.to_string().cyan(), release.read_time);
  if !release.tags.is_empty() {
    println!("Tags: {}", release.tags.join(", "));
  }
  println!("Slug: {}", release.slug);
  println!();
  println!("{}", release.excerpt);
}

/// Append a release through the write path
pub fn add_news(config: &Config, input: NewRelease, json: bool) -> Result<()> {
  let release = open_store(config).append(input, &config.ingest_options())?;

  if json {
    println!("{}", serde_json::to_string_pretty(&release)?);
  } else {
    println!("{} Added release {} ({})", "✓".green(), release.title.cyan(), release.slug.yellow());
  }
  Ok(())
}

/// Counts per category and per tag
pub fn stats(config: &Config) -> Result<()> {
  let records = open_store(config).load()?;
  if records.is_empty() {
    println!("No news releases found");
    return Ok(());
  }

  println!("{} releases", records.len().to_string().green());
  println!("{}", "Categories".bold());
  for (category, count) in category_counts(&records) {
    println!("  {}: {}", category.to_string().cyan(), count);
  }

  let mut tags: BTreeMap<&str, usize> = BTreeMap::new();
  for tag in records.iter().flat_map(|r| r.tags.iter()) {
    *tags.entry(tag.as_str()).or_default() += 1;
  }
  let mut tags: Vec<(&str, usize)> = tags.into_iter().collect();
  tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

  println!("{}", "Tags".bold());
  for (tag, count) in tags {
    println!("  {}: {}", tag.yellow(), count);
  }
  Ok(())
}
