use regex::{Captures, Regex};
use tidepack_plugin::{Plugin, PluginContext, PluginName, TransformArgs, TransformOutput};
use tidepack_utils::indexmap::FxIndexMap;

/// Plain text substitution over module code, in a single pass. Longer keys win over their
/// prefixes so `__VERSION__` is not clobbered by `__V`, and replaced text is never rescanned.
#[derive(Debug)]
pub struct ReplacePlugin {
  values: FxIndexMap<String, String>,
  pattern: Option<Regex>,
}

impl ReplacePlugin {
  pub fn new(values: &FxIndexMap<String, String>) -> anyhow::Result<Self> {
    let mut keys = values.keys().filter(|key| !key.is_empty()).collect::<Vec<_>>();
    keys.sort_by(|a, b| b.len().cmp(&a.len()));
    let pattern = if keys.is_empty() {
      None
    } else {
      let alternation =
        keys.iter().map(|key| regex::escape(key)).collect::<Vec<_>>().join("|");
      Some(Regex::new(&alternation)?)
    };
    Ok(Self { values: values.clone(), pattern })
  }
}

#[async_trait::async_trait]
impl Plugin for ReplacePlugin {
  fn name(&self) -> PluginName {
    "replace".into()
  }

  async fn transform(&self, _ctx: &PluginContext, args: &TransformArgs<'_>) -> TransformOutput {
    let Some(pattern) = &self.pattern else {
      return Ok(None);
    };
    if !pattern.is_match(args.code) {
      return Ok(None);
    }
    let code = pattern.replace_all(args.code, |caps: &Captures| {
      self.values.get(&caps[0]).cloned().unwrap_or_else(|| caps[0].to_string())
    });
    Ok(Some(code.into_owned()))
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use tidepack_plugin::{Plugin, PluginContext, TransformArgs};
  use tidepack_utils::indexmap::FxIndexMap;

  use super::ReplacePlugin;

  fn plugin(values: &[(&str, &str)]) -> ReplacePlugin {
    let values = values
      .iter()
      .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
      .collect::<FxIndexMap<_, _>>();
    ReplacePlugin::new(&values).unwrap()
  }

  async fn replace(plugin: &ReplacePlugin, code: &str) -> Option<String> {
    let args = TransformArgs { id: Path::new("src/index.js"), code };
    plugin.transform(&PluginContext::default(), &args).await.unwrap()
  }

  #[tokio::test]
  async fn test_replace_prefers_longer_keys() {
    let plugin = plugin(&[("__V", "\"short\""), ("__VERSION__", "\"1.0.0\"")]);
    assert_eq!(
      replace(&plugin, "export const version = __VERSION__, v = __V;").await.unwrap(),
      "export const version = \"1.0.0\", v = \"short\";"
    );
  }

  #[tokio::test]
  async fn test_replaced_values_are_not_replaced_again() {
    let plugin = plugin(&[("__A__", "__B__"), ("__B__", "b")]);
    assert_eq!(replace(&plugin, "f(__A__, __B__);").await.unwrap(), "f(__B__, b);");
  }

  #[tokio::test]
  async fn test_keys_are_literal() {
    let plugin = plugin(&[("a.b", "1")]);
    assert_eq!(replace(&plugin, "a.b + axb").await.unwrap(), "1 + axb");
    assert!(replace(&plugin, "nothing here").await.is_none());
    assert!(replace(&self::plugin(&[]), "a.b").await.is_none());
  }
}
