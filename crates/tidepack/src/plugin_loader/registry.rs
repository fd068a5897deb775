use std::{path::PathBuf, sync::Arc};

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tidepack_error::{Error, Result};
use tidepack_plugin::SharedPlugin;
use tidepack_utils::indexmap::FxIndexMap;

use crate::plugins::{
  AliasPlugin, EnvPlugin, JsonPlugin, MinifyPlugin, MinifyPluginOptions, NodeResolvePlugin,
  ReplacePlugin, ShebangPlugin, TranspileOptions, TranspilePlugin,
};

pub type PluginConstructor = Arc<dyn Fn(Value) -> anyhow::Result<SharedPlugin> + Send + Sync>;

/// Maps plugin names to constructors. Lookups accept both `vue` and `tidepack-plugin-vue`.
#[derive(Clone, Default)]
pub struct PluginRegistry {
  constructors: FxHashMap<String, PluginConstructor>,
}

impl PluginRegistry {
  pub const PACKAGE_PREFIX: &'static str = "tidepack-plugin-";

  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with the stages tidepack ships with. `oxc` is the default transpiler.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    registry
      .register("oxc", |options| {
        Ok(Arc::new(TranspilePlugin::new(from_options::<TranspileOptions>(options)?)))
      })
      .register("shebang", |_| Ok(Arc::new(ShebangPlugin::default())))
      .register("json", |_| Ok(Arc::new(JsonPlugin)))
      .register("node-resolve", |options| {
        #[derive(serde::Deserialize, Default)]
        #[serde(default)]
        struct NodeResolveOptions {
          cwd: Option<PathBuf>,
        }
        let options = from_options::<NodeResolveOptions>(options)?;
        let cwd = match options.cwd {
          Some(cwd) => cwd,
          None => std::env::current_dir()?,
        };
        Ok(Arc::new(NodeResolvePlugin::new(cwd)))
      })
      .register("minify", |options| {
        Ok(Arc::new(MinifyPlugin::new(&from_options::<MinifyPluginOptions>(options)?, None)))
      })
      .register("alias", |options| {
        let entries = from_options::<FxIndexMap<String, String>>(options)?;
        Ok(Arc::new(AliasPlugin::new(&entries, &std::env::current_dir()?)))
      })
      .register("replace", |options| {
        Ok(Arc::new(ReplacePlugin::new(&from_options::<FxIndexMap<String, String>>(options)?)?))
      })
      .register("env", |options| {
        Ok(Arc::new(EnvPlugin::new(&from_options::<FxIndexMap<String, Value>>(options)?)?))
      });
    registry
  }

  pub fn register(
    &mut self,
    name: impl Into<String>,
    constructor: impl Fn(Value) -> anyhow::Result<SharedPlugin> + Send + Sync + 'static,
  ) -> &mut Self {
    self.constructors.insert(name.into(), Arc::new(constructor));
    self
  }

  pub fn get(&self, name: &str) -> Option<&PluginConstructor> {
    let short_name = name.strip_prefix(Self::PACKAGE_PREFIX).unwrap_or(name);
    self.constructors.get(short_name).or_else(|| self.constructors.get(name))
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  /// `vue` -> `tidepack-plugin-vue`.
  pub fn package_name(name: &str) -> String {
    if name.starts_with(Self::PACKAGE_PREFIX) {
      name.to_string()
    } else {
      format!("{}{name}", Self::PACKAGE_PREFIX)
    }
  }

  pub fn instantiate(&self, name: &str, options: Value) -> Result<SharedPlugin> {
    let Some(constructor) = self.get(name) else {
      return Err(Error::missing_plugin(name, Self::package_name(name)));
    };
    constructor(options).map_err(|err| Error::plugin_init(name, err))
  }
}

impl std::fmt::Debug for PluginRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut names = self.constructors.keys().collect::<Vec<_>>();
    names.sort();
    f.debug_struct("PluginRegistry").field("plugins", &names).finish()
  }
}

/// `null` means "no options" and falls back to the defaults of `T`.
pub(crate) fn from_options<T: DeserializeOwned + Default>(options: Value) -> anyhow::Result<T> {
  if options.is_null() {
    return Ok(T::default());
  }
  Ok(serde_json::from_value(options)?)
}

#[test]
fn test_lookup_accepts_package_names() {
  let registry = PluginRegistry::with_builtins();
  assert!(registry.contains("json"));
  assert!(registry.contains("tidepack-plugin-json"));
  assert!(!registry.contains("vue"));
}

#[test]
fn test_missing_plugin_names_the_package() {
  let registry = PluginRegistry::with_builtins();
  let error = registry.instantiate("vue", Value::Null).unwrap_err();
  assert!(error.is_config_error());
  assert!(error.to_string().contains("tidepack-plugin-vue"));
}

#[test]
fn test_failing_constructor_is_not_a_missing_plugin() {
  let mut registry = PluginRegistry::new();
  registry.register("broken", |_| Err(anyhow::anyhow!("broken on purpose")));
  let error = registry.instantiate("broken", Value::Null).unwrap_err();
  assert_eq!(error.code(), "PLUGIN_INIT");
  assert!(!error.is_config_error());
  assert!(error.to_string().contains("broken on purpose"));
}

#[test]
fn test_builtin_options_are_validated() {
  let registry = PluginRegistry::with_builtins();
  let error = registry.instantiate("minify", serde_json::json!({ "mangle": "yes" })).unwrap_err();
  assert_eq!(error.code(), "PLUGIN_INIT");
}
