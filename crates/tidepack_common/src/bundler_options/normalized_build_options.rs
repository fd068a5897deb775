use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tidepack_utils::indexmap::FxIndexMap;

use crate::{FilenameTemplate, OutputExports, PluginSpec};

#[allow(clippy::struct_excessive_bools)] // Using raw booleans is more clear in this case
#[derive(Debug)]
pub struct NormalizedBuildOptions {
  // --- Input
  /// The project directory globs and local externals are resolved against.
  pub cwd: PathBuf,
  pub input: Vec<String>,
  pub externals: Vec<String>,

  // --- Output
  pub out_dir: PathBuf,
  pub filename: FilenameTemplate,
  pub formats: Vec<String>,
  pub name: Option<String>,
  pub module_name: Option<String>,
  pub globals: FxIndexMap<String, String>,
  pub banner: Option<String>,
  pub exports: OutputExports,
  pub map: Option<bool>,
  pub inline: Option<bool>,

  // --- Plugins
  pub plugins: Vec<PluginSpec>,
  pub plugin_options: FxHashMap<String, Value>,
  pub js: String,
  pub jsx: String,
  pub alias: FxIndexMap<String, String>,
  pub replace: FxIndexMap<String, String>,
  pub env: FxIndexMap<String, Value>,
  pub uglify: Option<Value>,
  pub uglify_es: Option<Value>,

  // --- Behavior
  pub watch: bool,
  pub quiet: bool,
}

impl NormalizedBuildOptions {
  pub fn plugin_options(&self, name: &str) -> Option<&Value> {
    self.plugin_options.get(name)
  }
}
