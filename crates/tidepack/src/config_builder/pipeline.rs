use std::sync::Arc;

use tidepack_plugin::{Plugin, SharedPlugin};

/// Assembles the plugin pipeline of one task. Disabled stages are never instantiated.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
  stages: Vec<SharedPlugin>,
}

impl PipelineBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn stage(self, plugin: impl Plugin + 'static) -> Self {
    self.shared_stage(Arc::new(plugin))
  }

  #[must_use]
  pub fn shared_stage(mut self, plugin: SharedPlugin) -> Self {
    self.stages.push(plugin);
    self
  }

  #[must_use]
  pub fn stages(mut self, plugins: impl IntoIterator<Item = SharedPlugin>) -> Self {
    self.stages.extend(plugins);
    self
  }

  #[must_use]
  pub fn stage_if<P: Plugin + 'static>(self, enabled: bool, plugin: impl FnOnce() -> P) -> Self {
    if enabled { self.stage(plugin()) } else { self }
  }

  #[must_use]
  pub fn optional_stage(self, plugin: Option<impl Plugin + 'static>) -> Self {
    match plugin {
      Some(plugin) => self.stage(plugin),
      None => self,
    }
  }

  pub fn build(self) -> Vec<SharedPlugin> {
    tracing::trace!(
      stages = ?self.stages.iter().map(|plugin| plugin.name()).collect::<Vec<_>>(),
      "pipeline"
    );
    self.stages
  }
}
