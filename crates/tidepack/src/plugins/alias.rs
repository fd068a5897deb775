use std::{borrow::Cow, path::Path};

use sugar_path::SugarPath;
use tidepack_plugin::{Plugin, PluginContext, PluginName, TransformArgs, TransformOutput};
use tidepack_utils::{indexmap::FxIndexMap, path_ext::PathExt};

use crate::utils::import_specifiers::rewrite_import_specifiers;

/// Rewrites `import "key"` and `import "key/sub"` to the aliased target. Local targets are
/// resolved against the project directory.
#[derive(Debug)]
pub struct AliasPlugin {
  entries: FxIndexMap<String, String>,
}

impl AliasPlugin {
  pub fn new(entries: &FxIndexMap<String, String>, cwd: &Path) -> Self {
    let entries = entries
      .iter()
      .map(|(key, target)| {
        let target = if Path::new(target).is_path_like_specifier() {
          cwd.join(target).normalize().to_slash_string()
        } else {
          target.clone()
        };
        (key.clone(), target)
      })
      .collect();
    Self { entries }
  }

  fn rewrite(&self, specifier: &str) -> Option<String> {
    self.entries.iter().find_map(|(key, target)| {
      if specifier == key {
        Some(target.clone())
      } else {
        let rest = specifier.strip_prefix(key.as_str())?.strip_prefix('/')?;
        Some(format!("{target}/{rest}"))
      }
    })
  }
}

#[async_trait::async_trait]
impl Plugin for AliasPlugin {
  fn name(&self) -> PluginName {
    "alias".into()
  }

  async fn transform(&self, _ctx: &PluginContext, args: &TransformArgs<'_>) -> TransformOutput {
    let rewritten = rewrite_import_specifiers(args.code, |specifier| self.rewrite(specifier));
    Ok(match rewritten {
      Cow::Borrowed(_) => None,
      Cow::Owned(code) => Some(code),
    })
  }
}

#[tokio::test]
async fn test_alias_rewrites_specifiers() {
  let mut entries = FxIndexMap::default();
  entries.insert("vue".to_string(), "vue/dist/vue.esm.js".to_string());
  entries.insert("@".to_string(), "./src".to_string());
  let cwd = Path::new("/project");
  let plugin = AliasPlugin::new(&entries, cwd);

  let code = "import Vue from 'vue';\nimport util from '@/util';\nimport vuex from 'vuex';\n";
  let args = TransformArgs { id: Path::new("/project/src/index.js"), code };
  let transformed = plugin.transform(&PluginContext::default(), &args).await.unwrap().unwrap();
  assert_eq!(
    transformed,
    "import Vue from 'vue/dist/vue.esm.js';\nimport util from '/project/src/util';\nimport vuex from 'vuex';\n"
  );
}
