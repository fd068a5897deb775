use serde::Deserialize;
use tidepack_ecmascript::{EcmaCompiler, SourceType};
use tidepack_plugin::{Plugin, PluginContext, PluginName, TransformArgs, TransformOutput};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranspileOptions {
  /// JSX pragma handed to the transpiler.
  pub jsx: String,
  pub target: String,
  /// `module` or `script`.
  pub source_type: String,
}

impl Default for TranspileOptions {
  fn default() -> Self {
    Self {
      jsx: "React.createElement".to_string(),
      target: "es2015".to_string(),
      source_type: "module".to_string(),
    }
  }
}

/// The default source transformation stage, registered as `oxc`. It parses every script module
/// and prints it back, so syntax errors surface before anything is written.
#[derive(Debug)]
pub struct TranspilePlugin {
  options: TranspileOptions,
}

impl TranspilePlugin {
  pub fn new(options: TranspileOptions) -> Self {
    Self { options }
  }

  pub fn options(&self) -> &TranspileOptions {
    &self.options
  }
}

#[async_trait::async_trait]
impl Plugin for TranspilePlugin {
  fn name(&self) -> PluginName {
    "oxc".into()
  }

  async fn transform(&self, _ctx: &PluginContext, args: &TransformArgs<'_>) -> TransformOutput {
    let Ok(source_type) = SourceType::from_path(args.id) else {
      // Not a script, e.g. `.json` or `.css`.
      return Ok(None);
    };
    let source_type = source_type.with_module(self.options.source_type != "script");
    tracing::trace!(
      id = %args.id.display(),
      target = %self.options.target,
      jsx = %self.options.jsx,
      "transpiling"
    );
    EcmaCompiler::reprint(args.code, source_type)
      .map(Some)
      .map_err(|err| err.context(format!("Failed to transpile \"{}\"", args.id.display())))
  }
}

#[tokio::test]
async fn test_transpile_skips_non_scripts() {
  let plugin = TranspilePlugin::new(TranspileOptions::default());
  let args = TransformArgs { id: std::path::Path::new("data.json"), code: "{}" };
  assert!(plugin.transform(&PluginContext::default(), &args).await.unwrap().is_none());
}

#[tokio::test]
async fn test_transpile_reports_file_on_syntax_error() {
  let plugin = TranspilePlugin::new(TranspileOptions::default());
  let args = TransformArgs { id: std::path::Path::new("src/broken.js"), code: "let = ;" };
  let error = plugin.transform(&PluginContext::default(), &args).await.unwrap_err();
  assert!(error.to_string().contains("src/broken.js"));
}
