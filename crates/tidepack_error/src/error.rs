use std::{fmt::Display, path::PathBuf};

use crate::ErrorKind;

#[derive(Debug)]
pub struct Error {
  pub kind: ErrorKind,
}

impl Error {
  fn with_kind(kind: ErrorKind) -> Self {
    Self { kind }
  }

  pub fn no_matched_files(patterns: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
    Self::with_kind(ErrorKind::NoMatchedFiles { patterns, cwd: cwd.into() })
  }

  pub fn unsupported_format(format: impl Into<String>) -> Self {
    Self::with_kind(ErrorKind::UnsupportedFormat(format.into()))
  }

  pub fn missing_plugin(name: impl Into<String>, package: impl Into<String>) -> Self {
    Self::with_kind(ErrorKind::MissingPlugin { name: name.into(), package: package.into() })
  }

  pub fn filename_conflict(expected: usize, actual: usize, filename: impl Into<String>) -> Self {
    Self::with_kind(ErrorKind::FilenameConflict { expected, actual, filename: filename.into() })
  }

  pub fn invalid_options(reason: impl Into<String>) -> Self {
    Self::with_kind(ErrorKind::InvalidOptions(reason.into()))
  }

  pub fn plugin_init(name: impl Into<String>, source: anyhow::Error) -> Self {
    Self::with_kind(ErrorKind::PluginInit { name: name.into(), source })
  }

  pub fn engine(source: anyhow::Error) -> Self {
    Self::with_kind(ErrorKind::Engine { source })
  }

  pub fn code(&self) -> &'static str {
    self.kind.code()
  }

  pub fn hint(&self) -> Option<String> {
    self.kind.hint()
  }

  pub fn docs(&self) -> Option<&'static str> {
    self.kind.docs()
  }

  /// Errors caused by the options rather than by the sources being bundled.
  pub fn is_config_error(&self) -> bool {
    matches!(
      self.kind,
      ErrorKind::NoMatchedFiles { .. }
        | ErrorKind::UnsupportedFormat(_)
        | ErrorKind::MissingPlugin { .. }
        | ErrorKind::FilenameConflict { .. }
        | ErrorKind::InvalidOptions(_)
    )
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.kind.fmt(f)
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match &self.kind {
      ErrorKind::Engine { source } | ErrorKind::PluginInit { source, .. } => Some(&**source),
      ErrorKind::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Self::with_kind(ErrorKind::Io(e))
  }
}

impl From<anyhow::Error> for Error {
  fn from(source: anyhow::Error) -> Self {
    Self::engine(source)
  }
}

#[test]
fn test_config_error_classification() {
  assert!(Error::unsupported_format("foo").is_config_error());
  assert!(Error::missing_plugin("vue", "tidepack-plugin-vue").is_config_error());
  assert!(!Error::engine(anyhow::anyhow!("parse failed")).is_config_error());
  assert!(!Error::plugin_init("vue", anyhow::anyhow!("boom")).is_config_error());
}

#[test]
fn test_missing_plugin_message() {
  let error = Error::missing_plugin("vue", "tidepack-plugin-vue");
  assert!(error.to_string().contains("tidepack-plugin-vue"));
  assert_eq!(error.code(), "MISSING_PLUGIN");
  assert!(error.hint().unwrap().contains("tidepack-plugin-vue"));
}
