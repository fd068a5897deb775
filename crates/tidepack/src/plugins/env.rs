use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tidepack_plugin::{Plugin, PluginContext, PluginName, TransformArgs, TransformOutput};
use tidepack_utils::indexmap::FxIndexMap;

static PROCESS_ENV_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bprocess\.env\.([A-Za-z_$][\w$]*)").unwrap());

/// Inlines `process.env.KEY` as the JSON literal of the configured value.
#[derive(Debug)]
pub struct EnvPlugin {
  literals: FxIndexMap<String, String>,
}

impl EnvPlugin {
  pub fn new(env: &FxIndexMap<String, Value>) -> anyhow::Result<Self> {
    let literals = env
      .iter()
      .map(|(key, value)| Ok((key.clone(), serde_json::to_string(value)?)))
      .collect::<anyhow::Result<_>>()?;
    Ok(Self { literals })
  }
}

#[async_trait::async_trait]
impl Plugin for EnvPlugin {
  fn name(&self) -> PluginName {
    "env".into()
  }

  async fn transform(&self, _ctx: &PluginContext, args: &TransformArgs<'_>) -> TransformOutput {
    if !args.code.contains("process.env.") {
      return Ok(None);
    }
    let code = PROCESS_ENV_RE.replace_all(args.code, |caps: &Captures| {
      self.literals.get(&caps[1]).cloned().unwrap_or_else(|| caps[0].to_string())
    });
    Ok(Some(code.into_owned()))
  }
}

#[tokio::test]
async fn test_env_inlines_json_literals() {
  let mut env = FxIndexMap::default();
  env.insert("NODE_ENV".to_string(), Value::String("production".to_string()));
  env.insert("DEBUG".to_string(), Value::Bool(false));
  let plugin = EnvPlugin::new(&env).unwrap();

  let args = TransformArgs {
    id: std::path::Path::new("src/index.js"),
    code: "if (process.env.NODE_ENV !== 'production' || process.env.DEBUG) log(process.env.HOME);",
  };
  let code = plugin.transform(&PluginContext::default(), &args).await.unwrap().unwrap();
  assert_eq!(code, "if (\"production\" !== 'production' || false) log(process.env.HOME);");
}
