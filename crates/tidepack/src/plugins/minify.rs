use serde::Deserialize;
use tidepack_ecmascript::{EcmaCompiler, MinifyOptions};
use tidepack_plugin::{Plugin, PluginContext, PluginName, RenderChunkArgs, RenderChunkOutput};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MinifyPluginOptions {
  pub mangle: bool,
  pub compress: bool,
  pub drop_console: bool,
  pub drop_debugger: bool,
}

impl Default for MinifyPluginOptions {
  fn default() -> Self {
    let defaults = MinifyOptions::default();
    Self {
      mangle: defaults.mangle,
      compress: defaults.compress,
      drop_console: defaults.drop_console,
      drop_debugger: defaults.drop_debugger,
    }
  }
}

impl From<&MinifyPluginOptions> for MinifyOptions {
  fn from(value: &MinifyPluginOptions) -> Self {
    Self {
      mangle: value.mangle,
      compress: value.compress,
      drop_console: value.drop_console,
      drop_debugger: value.drop_debugger,
    }
  }
}

/// Minifies the rendered output. Minification drops comments, so the banner is put back in
/// the preamble afterwards.
#[derive(Debug)]
pub struct MinifyPlugin {
  options: MinifyOptions,
  banner: Option<String>,
}

impl MinifyPlugin {
  pub fn new(options: &MinifyPluginOptions, banner: Option<String>) -> Self {
    Self { options: options.into(), banner }
  }

  /// Puts the hashbang and the banner back on top of the minified code, in that order.
  fn with_preamble(&self, hashbang: Option<&str>, code: String) -> String {
    let mut preamble = String::new();
    if let Some(hashbang) = hashbang {
      preamble.push_str(hashbang);
      preamble.push('\n');
    }
    if let Some(banner) = &self.banner {
      preamble.push_str(banner);
      preamble.push('\n');
    }
    preamble + &code
  }
}

/// `#!/usr/bin/env node\nrest` -> `(Some("#!/usr/bin/env node"), "rest")`.
fn split_hashbang(code: &str) -> (Option<&str>, &str) {
  if !code.starts_with("#!") {
    return (None, code);
  }
  match code.split_once('\n') {
    Some((hashbang, rest)) => (Some(hashbang.trim_end_matches('\r')), rest),
    None => (Some(code), ""),
  }
}

#[async_trait::async_trait]
impl Plugin for MinifyPlugin {
  fn name(&self) -> PluginName {
    "minify".into()
  }

  async fn render_chunk(
    &self,
    _ctx: &PluginContext,
    args: &RenderChunkArgs<'_>,
  ) -> RenderChunkOutput {
    let (hashbang, code) = split_hashbang(args.code);
    let minified = EcmaCompiler::minify(code, &self.options)
      .map_err(|err| err.context(format!("Failed to minify \"{}\"", args.file.display())))?;
    Ok(Some(self.with_preamble(hashbang, minified)))
  }
}

#[test]
fn test_preamble_keeps_hashbang_first() {
  let plugin =
    MinifyPlugin::new(&MinifyPluginOptions::default(), Some("/*! my-lib v1.0.0 */".to_string()));
  assert_eq!(plugin.with_preamble(None, "a();".to_string()), "/*! my-lib v1.0.0 */\na();");
  assert_eq!(
    plugin.with_preamble(Some("#!/usr/bin/env node"), "a();".to_string()),
    "#!/usr/bin/env node\n/*! my-lib v1.0.0 */\na();"
  );

  let plugin = MinifyPlugin::new(&MinifyPluginOptions::default(), None);
  assert_eq!(plugin.with_preamble(None, "a();".to_string()), "a();");
}

#[test]
fn test_split_hashbang() {
  assert_eq!(split_hashbang("#!/usr/bin/env node\r\na();"), (Some("#!/usr/bin/env node"), "a();"));
  assert_eq!(split_hashbang("a();"), (None, "a();"));
}

#[tokio::test]
async fn test_minify_keeps_banner_and_hashbang() {
  let plugin =
    MinifyPlugin::new(&MinifyPluginOptions::default(), Some("/*! my-lib */".to_string()));
  let args = RenderChunkArgs {
    input: std::path::Path::new("/p/src/index.js"),
    file: std::path::Path::new("/p/dist/index.min.js"),
    code: "#!/usr/bin/env node\n/*! my-lib */\nconst value = 1 + 2;\nconsole.log(value);\n",
  };
  let code = plugin.render_chunk(&PluginContext::default(), &args).await.unwrap().unwrap();
  assert!(code.starts_with("#!/usr/bin/env node\n/*! my-lib */\n"), "{code}");
  assert_eq!(code.matches("my-lib").count(), 1, "{code}");
}

#[test]
fn test_options_deserialize_with_defaults() {
  let options: MinifyPluginOptions =
    serde_json::from_value(serde_json::json!({ "dropConsole": true })).unwrap();
  assert!(options.drop_console);
  assert!(options.mangle);
  assert!(options.compress);
}
