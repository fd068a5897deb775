use std::path::PathBuf;

use clap::Args;
use tidepack::OutputExports;

#[derive(Args)]
pub struct InputArgs {
  /// Entry files or globs, relative to the project directory. Defaults to `src/index.js`.
  pub input: Vec<String>,

  /// The project directory.
  #[clap(long)]
  pub cwd: Option<PathBuf>,

  /// Path to a JSON config file. Defaults to `tidepack.config.json` when it exists.
  #[clap(long, short = 'c')]
  pub config: Option<PathBuf>,

  #[clap(long, value_delimiter = ',', action = clap::ArgAction::Append)]
  pub external: Vec<String>,
}

#[derive(Args)]
pub struct OutputArgs {
  #[clap(long, short = 'd')]
  pub out_dir: Option<String>,

  #[clap(long)]
  pub filename: Option<String>,

  /// `cjs`, `es` or `umd`, optionally with a `-min` suffix.
  #[clap(long, short = 'f', value_delimiter = ',', action = clap::ArgAction::Append)]
  pub format: Vec<String>,

  #[clap(long)]
  pub name: Option<String>,

  #[clap(long)]
  pub module_name: Option<String>,

  /// `module=GlobalName` pairs for `umd` outputs.
  #[clap(long, value_parser = parse_key_value, action = clap::ArgAction::Append)]
  pub global: Vec<(String, String)>,

  /// Without a value the banner is built from `package.json`.
  #[clap(long, num_args = 0..=1, default_missing_value = "")]
  pub banner: Option<String>,

  #[clap(long, value_parser = clap::value_parser!(OutputExports))]
  pub exports: Option<OutputExports>,

  #[clap(long)]
  pub map: Option<bool>,

  #[clap(long)]
  pub inline: Option<bool>,
}

#[derive(Args)]
pub struct PluginArgs {
  #[clap(long, short = 'p', value_delimiter = ',', action = clap::ArgAction::Append)]
  pub plugin: Vec<String>,

  /// The transpiler plugin.
  #[clap(long)]
  pub js: Option<String>,

  #[clap(long)]
  pub jsx: Option<String>,

  #[clap(long, value_parser = parse_key_value, action = clap::ArgAction::Append)]
  pub alias: Vec<(String, String)>,

  #[clap(long, value_parser = parse_key_value, action = clap::ArgAction::Append)]
  pub replace: Vec<(String, String)>,

  /// `KEY=value` pairs inlined as `process.env.KEY`. Values are parsed as JSON when possible.
  #[clap(long, value_parser = parse_key_value, action = clap::ArgAction::Append)]
  pub env: Vec<(String, String)>,
}

#[derive(Args)]
pub struct BehaviorArgs {
  #[clap(long, short = 'w')]
  pub watch: bool,

  #[clap(long, short = 'q')]
  pub quiet: bool,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
  raw
    .split_once('=')
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .ok_or_else(|| format!("expected `key=value`, received \"{raw}\""))
}

#[test]
fn test_parse_key_value() {
  assert_eq!(parse_key_value("react=React").unwrap(), ("react".into(), "React".into()));
  assert_eq!(parse_key_value("a=b=c").unwrap(), ("a".into(), "b=c".into()));
  assert!(parse_key_value("react").is_err());
}
