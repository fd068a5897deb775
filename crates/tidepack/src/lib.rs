mod bundler;
mod config_builder;
mod engine;
mod handle_error;
mod plugin_loader;
pub mod plugins;
mod stats;
mod types;
mod utils;

pub use crate::{
  bundler::Tidepack,
  config_builder::{ConfigBuilder, PipelineBuilder, should_report, warning_handler},
  engine::{Engine, SharedEngine, SingleEntryEngine},
  handle_error::{handle_error, render_error},
  plugin_loader::{PluginConstructor, PluginRegistry, load_plugins},
  stats::{StatsReport, StatsRow, human_size},
  types::bundle_output::BundleOutput,
  utils::{
    banner::resolve_banner, normalize_options::normalize_options, resolve_inputs::resolve_inputs,
  },
};
pub use tidepack_common::*;
pub use tidepack_error::{Error, ErrorKind, Result};
pub use tidepack_plugin::{
  GenerateBundleArgs, HookNoopReturn, Plugin, PluginContext, PluginName, RenderChunkArgs,
  RenderChunkOutput, ResolveIdArgs, ResolveIdOutput, ResolvedId, SharedPlugin, TransformArgs,
  TransformOutput, Warning, WarningHandler,
};
