use std::fmt::Write;

use ansi_term::Colour;
use tidepack_error::{Error, ErrorKind};

/// The message, its cause chain, then the hint and the docs reference.
pub fn render_error(error: &Error) -> String {
  let mut rendered = format!("{} {error}", Colour::Red.bold().paint(format!("[{}]", error.code())));

  let mut source = std::error::Error::source(error);
  // These messages already embed the first error of the chain.
  if matches!(error.kind, ErrorKind::Engine { .. } | ErrorKind::PluginInit { .. } | ErrorKind::Io(_)) {
    source = source.and_then(std::error::Error::source);
  }
  while let Some(cause) = source {
    let _ = write!(rendered, "\n  {} {cause}", Colour::White.dimmed().paint("caused by:"));
    source = cause.source();
  }

  if let Some(hint) = error.hint() {
    let _ = write!(rendered, "\n{} {hint}", Colour::Yellow.paint("hint:"));
  }
  if let Some(docs) = error.docs() {
    let _ = write!(rendered, "\n{} {docs}", Colour::Cyan.paint("docs:"));
  }
  rendered
}

pub fn handle_error(error: &Error) {
  eprintln!("{}", render_error(error));
}

#[test]
fn test_render_error() {
  let rendered = render_error(&Error::unsupported_format("iife"));
  assert!(rendered.contains("UNSUPPORTED_FORMAT"));
  assert!(rendered.contains("\"iife\""));
  assert!(rendered.contains("umd-min"));
  assert!(rendered.contains("README.md#formats"));

  let engine = Error::engine(anyhow::anyhow!("disk full").context("Could not write \"dist/a.js\""));
  let rendered = render_error(&engine);
  assert!(rendered.contains("Could not write"));
  assert!(rendered.contains("caused by:"));
  assert!(rendered.contains("disk full"));
  assert_eq!(rendered.matches("Could not write").count(), 1);
}
