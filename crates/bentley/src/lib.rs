//! Console output for the newsroom tools.
//!
//! ## Features
//!
//! - Level-prefixed lines (info, warn, error, debug, success)
//! - Multi-line messages keep the prefix on every line
//! - Banners for the start and end of batch runs
//! - Audit lines recording which date rule settled each record
//!
//! Everything is written to stderr so stdout stays free for query output.

use colored::*;

/// Width titles are clipped to in audit lines
const AUDIT_TITLE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Warn,
  Error,
  Debug,
  Success,
}

impl Level {
  fn tag(self) -> &'static str {
    match self {
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
      Level::Debug => "debug",
      Level::Success => "sccs",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Info => Color::Blue,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
      Level::Debug => Color::Magenta,
      Level::Success => Color::Green,
    }
  }
}

/// Write each line of `message` to stderr as-is
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Build the prefixed form of a single line
pub fn format_line(level: Level, line: &str) -> String {
  let tag = level.tag();
  let pad = 7usize.saturating_sub(tag.len() + 2);
  format!("[{}]{:<pad$} {line}", tag.color(level.color()).bold(), "")
}

/// Write `message` at `level`, one prefixed line per input line
pub fn emit(level: Level, message: &str) {
  for line in message.lines() {
    log(&format_line(level, line));
  }
}

pub fn info(message: &str) {
  emit(Level::Info, message);
}

/// Something needs attention but the run continues
pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

pub fn error(message: &str) {
  emit(Level::Error, message);
}

pub fn debug(message: &str) {
  emit(Level::Debug, message);
}

pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Display a message between two banner lines
pub fn as_banner<F>(log_fn: F, message: &str, width: usize, border_char: char)
where
  F: Fn(&str),
{
  let banner = banner_line(width, border_char);
  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

/// Opening banner for a batch run
pub fn announce(message: &str) {
  as_banner(|msg| log(&msg.blue().bold().to_string()), message, 50, '-');
}

/// Closing banner for a batch run that finished cleanly
pub fn flourish(message: &str) {
  as_banner(|msg| log(&msg.green().bold().to_string()), message, 45, '~');
}

/// Clip a title to the audit width, marking the cut with "..."
pub fn clip_title(title: &str) -> String {
  if title.chars().count() <= AUDIT_TITLE_WIDTH {
    title.to_string()
  } else {
    let head: String = title.chars().take(AUDIT_TITLE_WIDTH).collect();
    format!("{}...", head.trim_end())
  }
}

/// Format one audit line: `[rule] "title" -> detail`
pub fn format_audit(rule: &str, title: &str, detail: &str) -> String {
  let label = match rule {
    "manual" => rule.cyan(),
    "extracted" => rule.green(),
    "fallback" => rule.yellow(),
    _ => rule.normal(),
  };
  format!("[{}] \"{}\" -> {}", label.bold(), clip_title(title), detail)
}

/// Record which rule settled a record during a batch run
pub fn audit(rule: &str, title: &str, detail: &str) {
  log(&format_audit(rule, title, detail));
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plain() {
    colored::control::set_override(false);
  }

  #[test]
  fn format_line_pads_short_tags() {
    plain();
    assert_eq!(format_line(Level::Info, "hello"), "[info]  hello");
    assert_eq!(format_line(Level::Error, "boom"), "[error] boom");
  }

  #[test]
  fn clip_title_keeps_short_titles() {
    assert_eq!(clip_title("Stock Options Granted"), "Stock Options Granted");
  }

  #[test]
  fn clip_title_cuts_long_titles() {
    let title = "a".repeat(90);
    let clipped = clip_title(&title);
    assert!(clipped.ends_with("..."));
    assert_eq!(clipped.chars().count(), AUDIT_TITLE_WIDTH + 3);
  }

  #[test]
  fn audit_line_names_rule_and_detail() {
    plain();
    let line = format_audit("manual", "Private Placement", "October 4, 2023");
    assert_eq!(line, "[manual] \"Private Placement\" -> October 4, 2023");
  }
}
