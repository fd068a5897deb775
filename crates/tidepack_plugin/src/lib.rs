mod args;
mod plugin;
mod plugin_context;
mod warning;

pub use crate::{
  args::{GenerateBundleArgs, RenderChunkArgs, ResolveIdArgs, TransformArgs},
  plugin::{
    HookNoopReturn, Plugin, PluginName, RenderChunkOutput, ResolveIdOutput, ResolvedId,
    SharedPlugin, TransformOutput,
  },
  plugin_context::PluginContext,
  warning::{Warning, WarningHandler},
};
