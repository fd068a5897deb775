mod registry;

use std::path::Path;

use serde_json::{Value, json};
use tidepack_common::{NormalizedBuildOptions, PluginSpec};
use tidepack_error::Result;
use tidepack_plugin::SharedPlugin;
use tidepack_utils::{json_merge::merge_json, path_ext::PathExt};

pub(crate) use registry::from_options;
pub use registry::{PluginConstructor, PluginRegistry};

/// Instantiates the user plugins of one task, in the order they were declared.
///
/// Named plugins come from the registry, which is built by the process that runs the build and
/// does not depend on the project directory in the options.
pub fn load_plugins(
  registry: &PluginRegistry,
  options: &NormalizedBuildOptions,
  output_file: &Path,
) -> Result<Vec<SharedPlugin>> {
  options
    .plugins
    .iter()
    .map(|spec| match spec {
      PluginSpec::Instance(plugin) => Ok(SharedPlugin::clone(plugin)),
      PluginSpec::Named(name) => {
        let short_name = name.strip_prefix(PluginRegistry::PACKAGE_PREFIX).unwrap_or(name);
        let mut plugin_options = default_plugin_options(short_name, output_file);
        if let Some(user_options) = options.plugin_options(short_name) {
          merge_json(&mut plugin_options, user_options.clone());
        }
        tracing::trace!(name = short_name, options = %plugin_options, "loading plugin");
        registry.instantiate(name, plugin_options)
      }
    })
    .collect()
}

fn default_plugin_options(name: &str, output_file: &Path) -> Value {
  match name {
    "vue" => json!({ "css": output_file.with_extension("css").to_slash_string() }),
    "postcss" => json!({ "extract": true }),
    _ => Value::Null,
  }
}
