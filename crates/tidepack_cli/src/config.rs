use std::path::Path;

use serde_json::Value;
use tidepack::{Banner, BuildOptions, Error, PackageJson, Result};

use crate::Commands;

pub const DEFAULT_CONFIG_FILE: &str = "tidepack.config.json";

/// Flags first, then the config file, then the `tidepack` field of `package.json`.
pub fn load_options(commands: Commands, process_cwd: &Path) -> Result<BuildOptions> {
  let explicit_config = commands.input.config.clone();
  let cli = cli_options(commands);
  let project_dir = match &cli.cwd {
    Some(cwd) => process_cwd.join(cwd),
    None => process_cwd.to_path_buf(),
  };

  let file = match explicit_config {
    Some(path) => Some(read_config_file(&process_cwd.join(path))?),
    None => {
      let path = project_dir.join(DEFAULT_CONFIG_FILE);
      if path.is_file() { Some(read_config_file(&path)?) } else { None }
    }
  };
  let manifest = PackageJson::find(&project_dir)?
    .and_then(|package_json| package_json.tidepack)
    .map(|raw| parse_options(raw, "the \"tidepack\" field of package.json"))
    .transpose()?;

  Ok(cli.or(file.unwrap_or_default()).or(manifest.unwrap_or_default()))
}

fn read_config_file(path: &Path) -> Result<BuildOptions> {
  tracing::debug!(path = %path.display(), "reading config file");
  let raw = std::fs::read_to_string(path)?;
  let value = serde_json::from_str::<Value>(&raw).map_err(|err| {
    Error::invalid_options(format!("Failed to parse \"{}\": {err}", path.display()))
  })?;
  parse_options(value, &format!("\"{}\"", path.display()))
}

fn parse_options(value: Value, origin: &str) -> Result<BuildOptions> {
  serde_json::from_value(value)
    .map_err(|err| Error::invalid_options(format!("Invalid options in {origin}: {err}")))
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
  if values.is_empty() { None } else { Some(values) }
}

fn cli_options(commands: Commands) -> BuildOptions {
  let Commands { input, output, plugins, behavior } = commands;
  let pairs =
    |pairs: Vec<(String, String)>| non_empty(pairs).map(|pairs| pairs.into_iter().collect());

  BuildOptions {
    cwd: input.cwd,
    input: non_empty(input.input),
    externals: non_empty(input.external),
    out_dir: output.out_dir,
    filename: output.filename,
    formats: non_empty(output.format),
    name: output.name,
    module_name: output.module_name,
    globals: pairs(output.global),
    banner: output.banner.map(|banner| {
      if banner.is_empty() { Banner::Enabled(true) } else { Banner::Text(banner) }
    }),
    exports: output.exports,
    map: output.map,
    inline: output.inline,
    plugins: plugins.plugin.into_iter().map(Into::into).collect(),
    js: plugins.js,
    jsx: plugins.jsx,
    alias: pairs(plugins.alias),
    replace: pairs(plugins.replace),
    env: non_empty(plugins.env).map(|env| {
      env
        .into_iter()
        .map(|(key, value)| {
          let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
          (key, value)
        })
        .collect()
    }),
    watch: behavior.watch.then_some(true),
    quiet: behavior.quiet.then_some(true),
    ..BuildOptions::default()
  }
}
