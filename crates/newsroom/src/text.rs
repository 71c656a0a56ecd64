use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_SLUG_LENGTH: usize = 80;
pub const DEFAULT_EXCERPT_LENGTH: usize = 200;
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;
pub const ELLIPSIS: &str = "...";

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static LABEL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^:]+:\s*").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lower-case, hyphen-separated slug of at most `max_len` characters
pub fn slugify(title: &str, max_len: usize) -> String {
  let lower = title.to_lowercase();
  let hyphenated = NON_ALPHANUMERIC.replace_all(&lower, "-");
  let trimmed = hyphenated.trim_matches('-');
  // only ASCII remains, so byte and char lengths agree
  let cut = &trimmed[..trimmed.len().min(max_len)];
  cut.trim_end_matches('-').to_string()
}

/// Whitespace-normalized preview with any leading "label:" removed
pub fn excerpt(content: &str, max_len: usize) -> String {
  let without_label = LABEL_PREFIX.replace(content, "");
  let collapsed = WHITESPACE.replace_all(&without_label, " ");
  let cleaned = collapsed.trim();

  if cleaned.chars().count() <= max_len {
    return cleaned.to_string();
  }

  let cut: String = cleaned.chars().take(max_len).collect();
  format!("{}{ELLIPSIS}", cut.trim_end())
}

/// Whitespace-delimited tokens; markup counts as words too
pub fn word_count(content: &str) -> usize {
  content.split_whitespace().count()
}

/// "N min read" at `words_per_minute`, never less than one minute
pub fn read_time(content: &str, words_per_minute: usize) -> String {
  let words = word_count(content).max(1);
  let minutes = words.div_ceil(words_per_minute.max(1));
  format!("{minutes} min read")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slug_from_punctuated_title() {
    let slug = slugify(
      "Drilling Begins at Midas Property -- Konkin Silver to Be Drilled Next",
      DEFAULT_SLUG_LENGTH,
    );
    assert_eq!(slug, "drilling-begins-at-midas-property-konkin-silver-to-be-drilled-next");
  }

  #[test]
  fn slug_is_deterministic() {
    let title = "Hole #28 Cuts 12.80 Metres of 44.75 G/T Gold (42 Feet of 1.305 oz/t Gold)";
    assert_eq!(slugify(title, 80), slugify(title, 80));
  }

  #[test]
  fn slug_strips_edge_hyphens_and_caps_length() {
    assert_eq!(slugify("  --Private Placement!! ", 80), "private-placement");
    let long = "word ".repeat(40);
    let slug = slugify(&long, 80);
    assert!(slug.len() <= 80);
    assert!(!slug.ends_with('-'));
    assert!(!slug.starts_with('-'));
  }

  #[test]
  fn slug_drops_non_ascii_letters() {
    assert_eq!(slugify("Private Placement—Eric Sprott", 80), "private-placement-eric-sprott");
  }

  #[test]
  fn excerpt_strips_label_prefix() {
    let text = excerpt("Vancouver, BC: Silver Grail   reports\n\nresults", 200);
    assert_eq!(text, "Silver Grail reports results");
  }

  #[test]
  fn excerpt_without_colon_is_kept() {
    assert_eq!(excerpt("  plain   text ", 200), "plain text");
  }

  #[test]
  fn excerpt_truncates_with_ellipsis() {
    let content = "a ".repeat(300);
    let text = excerpt(&content, 200);
    assert!(text.ends_with(ELLIPSIS));
    assert!(text.chars().count() <= 200 + ELLIPSIS.len());
  }

  #[test]
  fn excerpt_cuts_on_char_boundaries() {
    let content = "é".repeat(250);
    let text = excerpt(&content, 200);
    assert_eq!(text.chars().count(), 203);
  }

  #[test]
  fn read_time_rounds_up() {
    assert_eq!(read_time(&"word ".repeat(200), 200), "1 min read");
    assert_eq!(read_time(&"word ".repeat(201), 200), "2 min read");
    assert_eq!(read_time("", 200), "1 min read");
  }

  #[test]
  fn markup_counts_as_words() {
    assert_eq!(word_count("<p> hello </p>"), 3);
  }
}
