mod bundler_options;
mod types;

pub use crate::{
  bundler_options::{
    BuildOptions,
    banner::Banner,
    filename_template::{FilenameTemplate, insert_min_marker},
    format::Format,
    normalized_build_options::NormalizedBuildOptions,
    output_exports::OutputExports,
    plugin_spec::PluginSpec,
  },
  types::{
    artifact_record::ArtifactRecord,
    engine_config::{EngineConfig, InputConfig, OutputConfig},
    output_asset::OutputAsset,
    package_json::PackageJson,
    resolved_task::ResolvedTask,
    watch_event::{WatchEvent, WatchSession},
  },
};
