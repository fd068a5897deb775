//! Stages the config builder puts into every engine pipeline, plus the ones users can
//! name through the plugin registry.

mod alias;
mod collector;
mod env;
mod json;
mod minify;
mod node_resolve;
mod replace;
mod shebang;
mod transpile;

pub use self::{
  alias::AliasPlugin,
  collector::CollectorPlugin,
  env::EnvPlugin,
  json::JsonPlugin,
  minify::{MinifyPlugin, MinifyPluginOptions},
  node_resolve::NodeResolvePlugin,
  replace::ReplacePlugin,
  shebang::ShebangPlugin,
  transpile::{TranspileOptions, TranspilePlugin},
};
