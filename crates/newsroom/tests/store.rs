use anyhow::Result;
use chrono::{TimeZone, Utc};
use newsroom::ingest::IngestOptions;
use newsroom::store::{apply_query, build_release};
use newsroom::{Category, NewRelease, NewsQuery, NewsRelease, NewsStore, NewsroomError};
use std::fs;
use tempfile::TempDir;

fn release(title: &str, y: i32, m: u32, d: u32, category: Category, tags: &[&str]) -> NewsRelease {
  let date = Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();
  NewsRelease {
    id: format!("id-{title}"),
    title: title.to_string(),
    content: format!("<p>{title} body</p>"),
    date,
    date_string: newsroom::dates::format_long_date(&date),
    category,
    tags: tags.iter().map(|t| t.to_string()).collect(),
    slug: newsroom::text::slugify(title, 80),
    excerpt: format!("{title} body"),
    read_time: "1 min read".to_string(),
  }
}

fn three_months() -> Vec<NewsRelease> {
  vec![
    release("January", 2024, 1, 1, Category::PropertyNews, &["Gold"]),
    release("March", 2024, 3, 1, Category::ExplorationUpdate, &["Gold", "Drilling"]),
    release("February", 2024, 2, 1, Category::CorporateNews, &["Options"]),
  ]
}

fn temp_store() -> (TempDir, NewsStore) {
  let dir = TempDir::new().unwrap();
  let store = NewsStore::new(dir.path().join("data").join("news.json"));
  (dir, store)
}

#[test]
fn first_page_is_newest_two() {
  let page = apply_query(three_months(), &NewsQuery { page: 1, limit: 2, ..Default::default() });
  let titles: Vec<&str> = page.news.iter().map(|r| r.title.as_str()).collect();
  assert_eq!(titles, vec!["March", "February"]);
  assert_eq!(page.total, 3);
  assert_eq!(page.total_pages, 2);
  assert!(page.has_more);
}

#[test]
fn last_page_has_no_more() {
  let page = apply_query(three_months(), &NewsQuery { page: 2, limit: 2, ..Default::default() });
  assert_eq!(page.news.len(), 1);
  assert_eq!(page.news[0].title, "January");
  assert!(!page.has_more);
}

#[test]
fn page_past_the_end_is_empty() {
  let page = apply_query(three_months(), &NewsQuery { page: 9, limit: 2, ..Default::default() });
  assert!(page.news.is_empty());
  assert_eq!(page.total, 3);
  assert!(!page.has_more);
}

#[test]
fn filters_are_anded() {
  let query = NewsQuery {
    category: Some(Category::ExplorationUpdate),
    tag: Some("Gold".to_string()),
    ..Default::default()
  };
  let page = apply_query(three_months(), &query);
  assert_eq!(page.total, 1);
  assert_eq!(page.news[0].title, "March");

  let none = NewsQuery {
    category: Some(Category::CorporateNews),
    tag: Some("Gold".to_string()),
    ..Default::default()
  };
  assert_eq!(apply_query(three_months(), &none).total, 0);
}

#[test]
fn search_is_case_insensitive_over_title_and_content() {
  let query = NewsQuery { search: Some("FEBRUARY BODY".to_string()), ..Default::default() };
  let page = apply_query(three_months(), &query);
  assert_eq!(page.total, 1);
  assert_eq!(page.news[0].title, "February");
}

#[test]
fn slug_lookup_overrides_pagination() {
  let query = NewsQuery { page: 5, limit: 1, slug: Some("january".to_string()), ..Default::default() };
  let page = apply_query(three_months(), &query);
  assert_eq!(page.news.len(), 1);
  assert_eq!(page.page, 1);
  assert_eq!(page.total_pages, 1);

  let missing = NewsQuery { slug: Some("nope".to_string()), ..Default::default() };
  assert_eq!(apply_query(three_months(), &missing).total, 0);
}

#[test]
fn missing_store_is_an_empty_page() -> Result<()> {
  let (_dir, store) = temp_store();
  let page = store.query(&NewsQuery::default())?;
  assert_eq!(page.total, 0);
  assert_eq!(page.total_pages, 0);
  assert!(page.news.is_empty());
  assert!(store.get_by_slug("anything")?.is_none());
  Ok(())
}

#[test]
fn corrupt_store_is_an_error() {
  let (_dir, store) = temp_store();
  fs::create_dir_all(store.path().parent().unwrap()).unwrap();
  fs::write(store.path(), "[{ not json").unwrap();

  let err = store.query(&NewsQuery::default()).unwrap_err();
  assert!(matches!(err, NewsroomError::CorruptStore { .. }));
}

#[test]
fn save_and_load_round_trip() -> Result<()> {
  let (_dir, store) = temp_store();
  let mut records = three_months();
  // sub-second precision must survive
  records[0].date = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
  records[0].date_string = newsroom::dates::format_long_date(&records[0].date);

  store.save(&records)?;
  assert_eq!(store.load()?, records);

  let raw = fs::read_to_string(store.path())?;
  assert!(raw.contains("\n  {\n    \"id\""));
  assert!(raw.contains("\"dateString\""));
  assert!(raw.contains("\"readTime\""));
  Ok(())
}

#[test]
fn replace_all_sorts_newest_first() -> Result<()> {
  let (_dir, store) = temp_store();
  store.replace_all(three_months())?;

  let stored = store.load()?;
  assert!(stored.windows(2).all(|w| w[0].date >= w[1].date));
  Ok(())
}

#[test]
fn append_goes_to_the_head() -> Result<()> {
  let (_dir, store) = temp_store();
  store.replace_all(three_months())?;

  let input = NewRelease {
    content: Some("<p>Drill program begins on the Fiji property</p>".to_string()),
    ..NewRelease::titled("Fiji Drilling Starts")
  };
  let added = store.append(input, &IngestOptions::default())?;

  let stored = store.load()?;
  assert_eq!(stored.len(), 4);
  assert_eq!(stored[0], added);
  assert!(stored.windows(2).all(|w| w[0].date >= w[1].date));
  assert_eq!(added.slug, "fiji-drilling-starts");
  assert_eq!(added.category, Category::ExplorationUpdate);
  assert!(added.has_tag("Fiji"));
  assert_eq!(store.get_by_slug("fiji-drilling-starts")?, Some(added));
  Ok(())
}

#[test]
fn append_creates_missing_store() -> Result<()> {
  let (_dir, store) = temp_store();
  store.append(NewRelease::titled("Private Placement"), &IngestOptions::default())?;
  assert_eq!(store.load()?.len(), 1);
  Ok(())
}

#[test]
fn append_keeps_supplied_fields() -> Result<()> {
  let input = NewRelease {
    category: Some(Category::FinancialUpdate),
    tags: Some(vec!["Gold".into(), "Weather".into(), "Gold".into()]),
    excerpt: Some("Hand written".into()),
    ..NewRelease::titled("Year End")
  };
  let built = build_release(input, &IngestOptions::default())?;
  assert_eq!(built.category, Category::FinancialUpdate);
  assert_eq!(built.tags, vec!["Gold"]);
  assert_eq!(built.excerpt, "Hand written");
  assert_eq!(built.date_string, newsroom::dates::format_long_date(&built.date));
  Ok(())
}

#[test]
fn append_rejects_empty_title() {
  let result = build_release(NewRelease::titled("   "), &IngestOptions::default());
  assert!(matches!(result, Err(NewsroomError::InvalidRelease(_))));
}
