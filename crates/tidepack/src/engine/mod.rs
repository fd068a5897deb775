mod single_entry;

use std::sync::Arc;

use tidepack_common::{EngineConfig, OutputAsset, WatchSession};
use tidepack_error::Result;

pub use self::single_entry::SingleEntryEngine;

pub type SharedEngine = Arc<dyn Engine>;

/// The bundler tidepack drives. Every config is consumed by exactly one call.
///
/// Implementations must drop the config, and with it the plugin pipeline, once a one-shot call
/// returns. The artifact channels of a build only close at that point.
#[async_trait::async_trait]
pub trait Engine: std::fmt::Debug + Send + Sync {
  /// Builds in memory.
  async fn generate(&self, config: &EngineConfig) -> Result<Vec<OutputAsset>>;

  /// Builds and writes the output files.
  async fn write(&self, config: &EngineConfig) -> Result<Vec<OutputAsset>>;

  /// Starts a session that rebuilds whenever the sources change. Must be called from within a
  /// tokio runtime.
  fn watch(&self, config: EngineConfig) -> Result<WatchSession>;
}
