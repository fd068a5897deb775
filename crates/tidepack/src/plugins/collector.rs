use std::path::PathBuf;

use tidepack_common::{ArtifactRecord, Format};
use tidepack_plugin::{GenerateBundleArgs, HookNoopReturn, Plugin, PluginContext, PluginName};
use tokio::sync::mpsc::UnboundedSender;

/// Captures the final code of the output file and hands it to the orchestrator.
///
/// The channel closes once the engine drops the pipeline, which is how the orchestrator knows
/// every record of a task has landed.
#[derive(Debug)]
pub struct CollectorPlugin {
  tx: UnboundedSender<ArtifactRecord>,
  relative: String,
  input: PathBuf,
  format: Format,
  compress: bool,
}

impl CollectorPlugin {
  pub fn new(
    tx: UnboundedSender<ArtifactRecord>,
    relative: String,
    input: PathBuf,
    format: Format,
    compress: bool,
  ) -> Self {
    Self { tx, relative, input, format, compress }
  }
}

#[async_trait::async_trait]
impl Plugin for CollectorPlugin {
  fn name(&self) -> PluginName {
    "collector".into()
  }

  async fn generate_bundle(
    &self,
    _ctx: &PluginContext,
    args: &GenerateBundleArgs<'_>,
  ) -> HookNoopReturn {
    let record = ArtifactRecord {
      absolute: args.file.to_path_buf(),
      relative: self.relative.clone(),
      input: self.input.clone(),
      format: self.format,
      compress: self.compress,
      code: args.code.to_string(),
    };
    // Nobody listens in watch mode.
    if self.tx.send(record).is_err() {
      tracing::trace!(file = %args.file.display(), "artifact receiver is gone");
    }
    Ok(())
  }
}
