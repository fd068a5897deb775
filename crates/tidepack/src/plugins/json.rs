use std::ffi::OsStr;

use tidepack_plugin::{Plugin, PluginContext, PluginName, TransformArgs, TransformOutput};

/// Turns `.json` modules into `export default <value>;`.
#[derive(Debug, Default)]
pub struct JsonPlugin;

#[async_trait::async_trait]
impl Plugin for JsonPlugin {
  fn name(&self) -> PluginName {
    "json".into()
  }

  async fn transform(&self, _ctx: &PluginContext, args: &TransformArgs<'_>) -> TransformOutput {
    if args.id.extension() != Some(OsStr::new("json")) {
      return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(args.code)
      .map_err(|err| anyhow::anyhow!("Could not parse JSON file \"{}\": {err}", args.id.display()))?;
    Ok(Some(format!("export default {};\n", serde_json::to_string_pretty(&value)?)))
  }
}

#[tokio::test]
async fn test_json_to_default_export() {
  let ctx = PluginContext::default();
  let id = std::path::Path::new("src/data.json");
  let code = JsonPlugin
    .transform(&ctx, &TransformArgs { id, code: r#"{"answer":42}"# })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(code, "export default {\n  \"answer\": 42\n};\n");

  let error = JsonPlugin.transform(&ctx, &TransformArgs { id, code: "{" }).await.unwrap_err();
  assert!(error.to_string().contains("src/data.json"));

  let id = std::path::Path::new("src/index.js");
  assert!(JsonPlugin.transform(&ctx, &TransformArgs { id, code: "{" }).await.unwrap().is_none());
}
