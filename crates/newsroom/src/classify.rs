use crate::release::Category;

/// Keywords that put a release into a category
#[derive(Debug)]
pub struct CategoryRule {
  pub category: Category,
  pub keywords: &'static [&'static str],
}

/// Checked in order; the first rule with a matching keyword wins.
/// Exploration wording outranks corporate wording.
pub const CATEGORY_RULES: &[CategoryRule] = &[
  CategoryRule {
    category: Category::ExplorationUpdate,
    keywords: &["drill", "sample", "assay", "mineralization", "discovery"],
  },
  CategoryRule { category: Category::FinancialUpdate, keywords: &["financial", "quarter", "earnings"] },
  CategoryRule {
    category: Category::CorporateNews,
    keywords: &["option", "agreement", "appoint", "director", "management"],
  },
];

pub const DEFAULT_CATEGORY: Category = Category::PropertyNews;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
  Property,
  Mineral,
  Activity,
}

/// A controlled-vocabulary tag and the lower-case text that triggers it
#[derive(Debug)]
pub struct TagRule {
  pub tag: &'static str,
  pub needle: &'static str,
  pub kind: TagKind,
}

pub const TAG_VOCABULARY: &[TagRule] = &[
  TagRule { tag: "Clone", needle: "clone", kind: TagKind::Property },
  TagRule { tag: "Tennyson", needle: "tennyson", kind: TagKind::Property },
  TagRule { tag: "Fiji", needle: "fiji", kind: TagKind::Property },
  TagRule { tag: "Tonga", needle: "tonga", kind: TagKind::Property },
  // plain substring, so "program" also carries RAM
  TagRule { tag: "RAM", needle: "ram", kind: TagKind::Property },
  TagRule { tag: "Konkin Silver", needle: "konkin", kind: TagKind::Property },
  TagRule { tag: "Midas", needle: "midas", kind: TagKind::Property },
  TagRule { tag: "Bay Silver", needle: "bay silver", kind: TagKind::Property },
  TagRule { tag: "Gold", needle: "gold", kind: TagKind::Mineral },
  TagRule { tag: "Silver", needle: "silver", kind: TagKind::Mineral },
  TagRule { tag: "Copper", needle: "copper", kind: TagKind::Mineral },
  TagRule { tag: "Drilling", needle: "drilling", kind: TagKind::Activity },
  TagRule { tag: "Bulk Sampling", needle: "bulk sample", kind: TagKind::Activity },
  TagRule { tag: "Options", needle: "option", kind: TagKind::Activity },
];

fn haystack(title: &str, content: &str) -> String {
  format!("{title} {content}").to_lowercase()
}

/// Pick exactly one category for a release
pub fn classify(title: &str, content: &str) -> Category {
  let text = haystack(title, content);
  CATEGORY_RULES
    .iter()
    .find(|rule| rule.keywords.iter().any(|k| text.contains(k)))
    .map(|rule| rule.category)
    .unwrap_or(DEFAULT_CATEGORY)
}

/// Every vocabulary tag whose trigger appears in title or content
pub fn extract_tags(title: &str, content: &str) -> Vec<String> {
  let text = haystack(title, content);
  dedup_tags(
    TAG_VOCABULARY
      .iter()
      .filter(|rule| text.contains(rule.needle))
      .map(|rule| rule.tag.to_string()),
  )
}

/// Drop repeated tags, keeping the first occurrence of each
pub fn dedup_tags<I>(tags: I) -> Vec<String>
where
  I: IntoIterator<Item = String>,
{
  let mut seen = std::collections::HashSet::new();
  tags.into_iter().filter(|tag| seen.insert(tag.clone())).collect()
}

/// Keep only supplied tags that belong to the vocabulary, deduplicated
pub fn vocabulary_tags<I>(tags: I) -> Vec<String>
where
  I: IntoIterator<Item = String>,
{
  dedup_tags(tags.into_iter().filter(|tag| {
    let known = tag_kind(tag).is_some();
    if !known {
      tracing::warn!(tag = %tag, "dropping tag outside the vocabulary");
    }
    known
  }))
}

pub fn tag_kind(tag: &str) -> Option<TagKind> {
  TAG_VOCABULARY.iter().find(|rule| rule.tag == tag).map(|rule| rule.kind)
}
