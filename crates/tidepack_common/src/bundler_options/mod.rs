pub mod banner;
pub mod filename_template;
pub mod format;
pub mod normalized_build_options;
pub mod output_exports;
pub mod plugin_spec;

mod one_or_many;

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;
use tidepack_utils::indexmap::FxIndexMap;

use crate::{Banner, OutputExports, PluginSpec};

/// Options as written by the user, every field is optional. See `normalize_options` for defaults.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
  // --- Input
  pub cwd: Option<PathBuf>,
  #[serde(deserialize_with = "one_or_many::deserialize")]
  pub input: Option<Vec<String>>,
  #[serde(alias = "external", deserialize_with = "one_or_many::deserialize")]
  pub externals: Option<Vec<String>>,

  // --- Output
  pub out_dir: Option<String>,
  pub filename: Option<String>,
  #[serde(alias = "format", deserialize_with = "one_or_many::deserialize")]
  pub formats: Option<Vec<String>>,
  pub name: Option<String>,
  pub module_name: Option<String>,
  #[serde(alias = "global")]
  pub globals: Option<FxIndexMap<String, String>>,
  pub banner: Option<Banner>,
  pub exports: Option<OutputExports>,
  pub map: Option<bool>,
  pub inline: Option<bool>,

  // --- Plugins
  #[serde(alias = "plugin", deserialize_with = "plugin_spec::deserialize")]
  pub plugins: Vec<PluginSpec>,
  pub js: Option<String>,
  pub jsx: Option<String>,
  pub alias: Option<FxIndexMap<String, String>>,
  pub replace: Option<FxIndexMap<String, String>>,
  pub env: Option<FxIndexMap<String, Value>>,
  pub uglify: Option<Value>,
  pub uglify_es: Option<Value>,

  // --- Behavior
  pub watch: Option<bool>,
  pub quiet: Option<bool>,

  /// Every other top level key, treated as the options of the plugin with that name.
  #[serde(flatten)]
  pub plugin_options: FxHashMap<String, Value>,
}

impl BuildOptions {
  /// Fills every field unset in `self` from `fallback`.
  #[must_use]
  pub fn or(self, fallback: Self) -> Self {
    let mut plugin_options = fallback.plugin_options;
    plugin_options.extend(self.plugin_options);
    Self {
      cwd: self.cwd.or(fallback.cwd),
      input: self.input.or(fallback.input),
      externals: self.externals.or(fallback.externals),
      out_dir: self.out_dir.or(fallback.out_dir),
      filename: self.filename.or(fallback.filename),
      formats: self.formats.or(fallback.formats),
      name: self.name.or(fallback.name),
      module_name: self.module_name.or(fallback.module_name),
      globals: self.globals.or(fallback.globals),
      banner: self.banner.or(fallback.banner),
      exports: self.exports.or(fallback.exports),
      map: self.map.or(fallback.map),
      inline: self.inline.or(fallback.inline),
      plugins: if self.plugins.is_empty() { fallback.plugins } else { self.plugins },
      js: self.js.or(fallback.js),
      jsx: self.jsx.or(fallback.jsx),
      alias: self.alias.or(fallback.alias),
      replace: self.replace.or(fallback.replace),
      env: self.env.or(fallback.env),
      uglify: self.uglify.or(fallback.uglify),
      uglify_es: self.uglify_es.or(fallback.uglify_es),
      watch: self.watch.or(fallback.watch),
      quiet: self.quiet.or(fallback.quiet),
      plugin_options,
    }
  }
}

#[test]
fn test_deserialize_aliases_and_scalars() {
  let options: BuildOptions = serde_json::from_value(serde_json::json!({
    "input": "src/main.js",
    "format": ["cjs", "umd-min"],
    "plugin": "vue",
    "external": "react",
    "global": { "react": "React" },
    "outDir": "lib",
    "moduleName": "MyLib",
    "banner": true,
    "vue": { "css": false }
  }))
  .unwrap();

  assert_eq!(options.input, Some(vec!["src/main.js".to_string()]));
  assert_eq!(options.formats, Some(vec!["cjs".to_string(), "umd-min".to_string()]));
  assert!(matches!(&options.plugins[..], [PluginSpec::Named(name)] if name == "vue"));
  assert_eq!(options.externals, Some(vec!["react".to_string()]));
  assert_eq!(options.globals.unwrap()["react"], "React");
  assert_eq!(options.out_dir.as_deref(), Some("lib"));
  assert_eq!(options.module_name.as_deref(), Some("MyLib"));
  assert!(matches!(options.banner, Some(Banner::Enabled(true))));
  assert_eq!(options.plugin_options["vue"], serde_json::json!({ "css": false }));
}

#[test]
fn test_or_prefers_self() {
  let cli = BuildOptions { formats: Some(vec!["es".into()]), ..BuildOptions::default() };
  let file = BuildOptions {
    formats: Some(vec!["cjs".into()]),
    out_dir: Some("lib".into()),
    ..BuildOptions::default()
  };
  let merged = cli.or(file);
  assert_eq!(merged.formats, Some(vec!["es".to_string()]));
  assert_eq!(merged.out_dir.as_deref(), Some("lib"));
}
