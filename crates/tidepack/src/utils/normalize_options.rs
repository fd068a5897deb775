use std::path::Path;

use sugar_path::SugarPath;
use tidepack_common::{BuildOptions, FilenameTemplate, NormalizedBuildOptions, PackageJson};

use super::banner::resolve_banner;

pub const DEFAULT_INPUT: &str = "src/index.js";
pub const DEFAULT_OUT_DIR: &str = "dist";
pub const DEFAULT_FILENAME: &str = "[name][suffix].js";
pub const DEFAULT_FORMAT: &str = "cjs";
pub const DEFAULT_TRANSPILER: &str = "oxc";
pub const DEFAULT_JSX: &str = "React.createElement";

/// Fills in every default. `process_cwd` is where a relative `cwd` option is resolved from.
pub fn normalize_options(
  raw_options: BuildOptions,
  process_cwd: &Path,
  package_json: Option<&PackageJson>,
) -> NormalizedBuildOptions {
  let cwd = raw_options.cwd.map_or_else(
    || process_cwd.to_path_buf(),
    |cwd| if cwd.is_absolute() { cwd } else { cwd.absolutize_with(process_cwd) },
  );

  let input = raw_options
    .input
    .filter(|input| !input.is_empty())
    .unwrap_or_else(|| vec![DEFAULT_INPUT.to_string()]);
  let formats = raw_options
    .formats
    .filter(|formats| !formats.is_empty())
    .unwrap_or_else(|| vec![DEFAULT_FORMAT.to_string()]);
  let out_dir = raw_options.out_dir.unwrap_or_else(|| DEFAULT_OUT_DIR.to_string());

  NormalizedBuildOptions {
    out_dir: Path::new(&out_dir).absolutize_with(&cwd),
    cwd,
    input,
    externals: raw_options.externals.unwrap_or_default(),
    filename: FilenameTemplate::new(
      raw_options.filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
    ),
    formats,
    name: raw_options.name,
    module_name: raw_options.module_name,
    globals: raw_options.globals.unwrap_or_default(),
    banner: resolve_banner(raw_options.banner, package_json),
    exports: raw_options.exports.unwrap_or_default(),
    map: raw_options.map,
    inline: raw_options.inline,
    plugins: raw_options.plugins,
    plugin_options: raw_options.plugin_options,
    js: raw_options.js.unwrap_or_else(|| DEFAULT_TRANSPILER.to_string()),
    jsx: raw_options.jsx.unwrap_or_else(|| DEFAULT_JSX.to_string()),
    alias: raw_options.alias.unwrap_or_default(),
    replace: raw_options.replace.unwrap_or_default(),
    env: raw_options.env.unwrap_or_default(),
    uglify: raw_options.uglify,
    uglify_es: raw_options.uglify_es,
    watch: raw_options.watch.unwrap_or(false),
    quiet: raw_options.quiet.unwrap_or(false),
  }
}

#[test]
fn test_defaults() {
  let options = normalize_options(BuildOptions::default(), Path::new("/work"), None);
  assert_eq!(options.cwd, Path::new("/work"));
  assert_eq!(options.input, vec!["src/index.js"]);
  assert_eq!(options.formats, vec!["cjs"]);
  assert_eq!(options.out_dir, Path::new("/work/dist"));
  assert_eq!(options.filename.template(), "[name][suffix].js");
  assert_eq!(options.js, "oxc");
  assert_eq!(options.jsx, "React.createElement");
  assert_eq!(options.banner, None);
  assert!(!options.watch && !options.quiet);
}

#[test]
fn test_relative_cwd_and_empty_lists() {
  let options = normalize_options(
    BuildOptions {
      cwd: Some("packages/core".into()),
      input: Some(vec![]),
      formats: Some(vec![]),
      out_dir: Some("../../build".into()),
      ..BuildOptions::default()
    },
    Path::new("/work"),
    None,
  );
  assert_eq!(options.cwd, Path::new("/work/packages/core"));
  assert_eq!(options.out_dir, Path::new("/work/build"));
  assert_eq!(options.input, vec!["src/index.js"]);
  assert_eq!(options.formats, vec!["cjs"]);
}
