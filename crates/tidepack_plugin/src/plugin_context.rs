use std::sync::Arc;

use crate::{Warning, WarningHandler};

#[derive(Clone)]
pub struct PluginContext {
  on_warn: WarningHandler,
}

impl PluginContext {
  pub fn new(on_warn: WarningHandler) -> Self {
    Self { on_warn }
  }

  pub fn warn(&self, warning: Warning) {
    (self.on_warn)(&warning);
  }
}

impl Default for PluginContext {
  fn default() -> Self {
    Self { on_warn: Arc::new(|_| {}) }
  }
}

impl std::fmt::Debug for PluginContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PluginContext").finish_non_exhaustive()
  }
}
