use std::sync::Mutex;

use tidepack_plugin::{
  Plugin, PluginContext, PluginName, RenderChunkArgs, RenderChunkOutput, TransformArgs,
  TransformOutput,
};

/// Takes `#!/usr/bin/env node` off the entry before the other stages see it, and puts it back
/// on top of the rendered output.
#[derive(Debug, Default)]
pub struct ShebangPlugin {
  shebang: Mutex<Option<String>>,
}

impl ShebangPlugin {
  fn take_shebang(code: &str) -> Option<(&str, &str)> {
    if !code.starts_with("#!") {
      return None;
    }
    Some(code.split_once('\n').unwrap_or((code, "")))
  }
}

#[async_trait::async_trait]
impl Plugin for ShebangPlugin {
  fn name(&self) -> PluginName {
    "shebang".into()
  }

  async fn transform(&self, _ctx: &PluginContext, args: &TransformArgs<'_>) -> TransformOutput {
    // The pipeline is reused across watch rebuilds, so the state is reset on every build.
    let mut state = self.shebang.lock().map_err(|_| anyhow::anyhow!("shebang state poisoned"))?;
    let Some((shebang, rest)) = Self::take_shebang(args.code) else {
      *state = None;
      return Ok(None);
    };
    *state = Some(shebang.trim_end_matches('\r').to_string());
    Ok(Some(rest.to_string()))
  }

  async fn render_chunk(
    &self,
    _ctx: &PluginContext,
    args: &RenderChunkArgs<'_>,
  ) -> RenderChunkOutput {
    let shebang = self.shebang.lock().map_err(|_| anyhow::anyhow!("shebang state poisoned"))?;
    Ok(shebang.as_ref().map(|shebang| format!("{shebang}\n{}", args.code)))
  }
}

#[tokio::test]
async fn test_shebang_round_trip() {
  use std::path::Path;

  let plugin = ShebangPlugin::default();
  let ctx = PluginContext::default();
  let id = Path::new("/project/src/cli.js");

  let transformed = plugin
    .transform(&ctx, &TransformArgs { id, code: "#!/usr/bin/env node\nconsole.log(1);\n" })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(transformed, "console.log(1);\n");

  let rendered = plugin
    .render_chunk(&ctx, &RenderChunkArgs { input: id, file: id, code: "console.log(1);" })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(rendered, "#!/usr/bin/env node\nconsole.log(1);");
}

#[tokio::test]
async fn test_no_shebang_is_untouched() {
  use std::path::Path;

  let plugin = ShebangPlugin::default();
  let ctx = PluginContext::default();
  let id = Path::new("/project/src/index.js");
  assert!(plugin.transform(&ctx, &TransformArgs { id, code: "a();" }).await.unwrap().is_none());
  assert!(plugin
    .render_chunk(&ctx, &RenderChunkArgs { input: id, file: id, code: "a();" })
    .await
    .unwrap()
    .is_none());
}

#[tokio::test]
async fn test_removed_shebang_is_not_restored() {
  use std::path::Path;

  let plugin = ShebangPlugin::default();
  let ctx = PluginContext::default();
  let id = Path::new("/project/src/cli.js");

  plugin
    .transform(&ctx, &TransformArgs { id, code: "#!/usr/bin/env node\na();\n" })
    .await
    .unwrap();
  assert!(plugin.transform(&ctx, &TransformArgs { id, code: "a();\n" }).await.unwrap().is_none());
  assert!(plugin
    .render_chunk(&ctx, &RenderChunkArgs { input: id, file: id, code: "a();" })
    .await
    .unwrap()
    .is_none());
}
