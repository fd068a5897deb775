use std::sync::Arc;

use serde::Deserializer;
use tidepack_plugin::{Plugin, SharedPlugin};

#[derive(Debug, Clone)]
pub enum PluginSpec {
  /// Looked up in the plugin registry.
  Named(String),
  /// Handed to the engine as is.
  Instance(SharedPlugin),
}

impl From<&str> for PluginSpec {
  fn from(value: &str) -> Self {
    Self::Named(value.to_string())
  }
}

impl From<String> for PluginSpec {
  fn from(value: String) -> Self {
    Self::Named(value)
  }
}

impl From<SharedPlugin> for PluginSpec {
  fn from(value: SharedPlugin) -> Self {
    Self::Instance(value)
  }
}

impl PluginSpec {
  pub fn instance(plugin: impl Plugin + 'static) -> Self {
    Self::Instance(Arc::new(plugin))
  }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<PluginSpec>, D::Error>
where
  D: Deserializer<'de>,
{
  let names: Option<Vec<String>> = super::one_or_many::deserialize(deserializer)?;
  Ok(names.unwrap_or_default().into_iter().map(PluginSpec::Named).collect())
}
