use std::{fmt::Display, path::PathBuf};

use crate::error_code;

#[derive(Debug)]
pub enum ErrorKind {
  // --- Configuration
  NoMatchedFiles { patterns: Vec<String>, cwd: PathBuf },
  UnsupportedFormat(String),
  MissingPlugin { name: String, package: String },
  FilenameConflict { expected: usize, actual: usize, filename: String },
  InvalidOptions(String),

  // --- Plugin
  /// The plugin exists but its constructor failed. This is a bug in the plugin itself,
  /// so the original error is kept as is.
  PluginInit { name: String, source: anyhow::Error },

  // --- Engine
  Engine { source: anyhow::Error },
  Io(std::io::Error),
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NoMatchedFiles { patterns, cwd } => write!(
        f,
        "No matched files to bundle, tried {} in \"{}\".",
        patterns.iter().map(|p| format!("\"{p}\"")).collect::<Vec<_>>().join(", "),
        cwd.display()
      ),
      Self::UnsupportedFormat(format) => write!(f, "Unsupported format: \"{format}\"."),
      Self::MissingPlugin { name, package } => {
        write!(f, "Cannot find plugin \"{name}\" (expected package \"{package}\").")
      }
      Self::FilenameConflict { expected, actual, filename } => write!(
        f,
        "Expected {expected} output files but only got {actual}, multiple outputs were written to the same path with filename \"{filename}\"."
      ),
      Self::InvalidOptions(reason) => write!(f, "Invalid options: {reason}"),
      Self::PluginInit { name, source } => write!(f, "Plugin \"{name}\" failed to load: {source}"),
      Self::Engine { source } => source.fmt(f),
      Self::Io(e) => e.fmt(f),
    }
  }
}

impl ErrorKind {
  pub fn code(&self) -> &'static str {
    match self {
      Self::NoMatchedFiles { .. } => error_code::NO_MATCHED_FILES,
      Self::UnsupportedFormat(_) => error_code::UNSUPPORTED_FORMAT,
      Self::MissingPlugin { .. } => error_code::MISSING_PLUGIN,
      Self::FilenameConflict { .. } => error_code::FILENAME_CONFLICT,
      Self::InvalidOptions(_) => error_code::INVALID_OPTIONS,
      Self::PluginInit { .. } => error_code::PLUGIN_INIT,
      Self::Engine { .. } => error_code::ENGINE_ERROR,
      Self::Io(_) => error_code::IO_ERROR,
    }
  }

  /// A remediation hint shown under the message.
  pub fn hint(&self) -> Option<String> {
    match self {
      Self::NoMatchedFiles { .. } => {
        Some("Pass entry files or globs as arguments, or set \"input\" in your config.".into())
      }
      Self::UnsupportedFormat(_) => Some(
        "Supported formats are \"cjs\", \"es\" and \"umd\", append \"-min\" to minify, e.g. \"umd-min\"."
          .into(),
      ),
      Self::MissingPlugin { name, package } => Some(format!(
        "Install \"{package}\" and register it with `PluginRegistry::register(\"{name}\", ..)`."
      )),
      Self::FilenameConflict { .. } => Some(
        "Include \"[name]\" and \"[suffix]\" in the \"filename\" option so each input and format gets its own file."
          .into(),
      ),
      _ => None,
    }
  }

  /// Where to read more about the option involved.
  pub fn docs(&self) -> Option<&'static str> {
    match self {
      Self::NoMatchedFiles { .. } => Some("README.md#input"),
      Self::UnsupportedFormat(_) => Some("README.md#formats"),
      Self::MissingPlugin { .. } | Self::PluginInit { .. } => Some("README.md#plugins"),
      Self::FilenameConflict { .. } => Some("README.md#filename"),
      _ => None,
    }
  }
}
