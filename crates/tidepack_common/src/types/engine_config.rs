use std::{fmt::Debug, path::PathBuf};

use tidepack_plugin::{SharedPlugin, WarningHandler};
use tidepack_utils::indexmap::FxIndexMap;

use crate::{Format, OutputExports};

pub struct InputConfig {
  /// Absolute path of the entry module.
  pub input: PathBuf,
  pub external: Vec<String>,
  pub plugins: Vec<SharedPlugin>,
  pub on_warn: WarningHandler,
}

impl Debug for InputConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("InputConfig")
      .field("input", &self.input)
      .field("external", &self.external)
      .field("plugins", &self.plugins.iter().map(|plugin| plugin.name()).collect::<Vec<_>>())
      .finish_non_exhaustive()
  }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
  pub format: Format,
  pub globals: FxIndexMap<String, String>,
  /// Only meaningful for `umd`.
  pub name: Option<String>,
  /// Absolute path of the output file.
  pub file: PathBuf,
  pub banner: Option<String>,
  pub exports: OutputExports,
  pub sourcemap: bool,
}

/// Everything the engine needs to produce one output file.
#[derive(Debug)]
pub struct EngineConfig {
  pub input: InputConfig,
  pub output: OutputConfig,
}
