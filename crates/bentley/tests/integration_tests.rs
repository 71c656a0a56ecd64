use bentley::*;

#[test]
fn test_basic_logging_functions() {
  info("Test info message");
  warn("Test warning message");
  error("Test error message");
  debug("Test debug message");
  success("Test success message");
}

#[test]
fn test_multiline_messages() {
  let multiline_msg = "First line\nSecond line\nThird line";
  info(multiline_msg);
  warn(multiline_msg);
  emit(Level::Debug, multiline_msg);
}

#[test]
fn test_banners() {
  announce("Importing news releases");
  flourish("Import complete");
  assert_eq!(banner_line(4, '~'), "~~~~");
}

#[test]
fn test_audit_lines() {
  audit("extracted", "Drill Results from Midas and Konkin Silver Properties", "October 12, 2021");
  audit("fallback", "Untitled", "kept June 1, 2020");
}

#[test]
fn test_as_banner_calls_log_fn_three_times() {
  use std::cell::RefCell;
  let lines = RefCell::new(Vec::new());
  as_banner(|l| lines.borrow_mut().push(l.to_string()), "middle", 3, '*');
  assert_eq!(*lines.borrow(), vec!["***", "middle", "***"]);
}
