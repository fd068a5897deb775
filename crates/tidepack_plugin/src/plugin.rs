use std::{borrow::Cow, fmt::Debug, path::PathBuf, sync::Arc};

use crate::{
  GenerateBundleArgs, PluginContext, RenderChunkArgs, ResolveIdArgs, TransformArgs,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
  pub id: PathBuf,
  pub external: bool,
}

pub type PluginName<'a> = Cow<'a, str>;
pub type ResolveIdOutput = anyhow::Result<Option<ResolvedId>>;
pub type TransformOutput = anyhow::Result<Option<String>>;
pub type RenderChunkOutput = anyhow::Result<Option<String>>;
pub type HookNoopReturn = anyhow::Result<()>;

pub type SharedPlugin = Arc<dyn Plugin>;

/// A stage of the engine pipeline. Every hook is optional and runs in pipeline order.
#[async_trait::async_trait]
pub trait Plugin: Debug + Send + Sync {
  fn name(&self) -> PluginName;

  /// The first plugin returning `Some` wins.
  async fn resolve_id(&self, _ctx: &PluginContext, _args: &ResolveIdArgs<'_>) -> ResolveIdOutput {
    Ok(None)
  }

  /// Returning `Some` replaces the module code seen by the following plugins.
  async fn transform(&self, _ctx: &PluginContext, _args: &TransformArgs<'_>) -> TransformOutput {
    Ok(None)
  }

  async fn render_chunk(
    &self,
    _ctx: &PluginContext,
    _args: &RenderChunkArgs<'_>,
  ) -> RenderChunkOutput {
    Ok(None)
  }

  /// Called once the final code of an output file is known.
  async fn generate_bundle(
    &self,
    _ctx: &PluginContext,
    _args: &GenerateBundleArgs<'_>,
  ) -> HookNoopReturn {
    Ok(())
  }
}
