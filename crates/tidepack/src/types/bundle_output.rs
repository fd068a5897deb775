use std::path::PathBuf;

use tidepack_common::{ArtifactRecord, OutputAsset};
use tidepack_utils::indexmap::FxIndexMap;

use crate::stats::StatsReport;

#[derive(Debug, Default)]
pub struct BundleOutput {
  pub assets: Vec<OutputAsset>,
  /// Keyed by absolute output path.
  pub artifacts: FxIndexMap<PathBuf, ArtifactRecord>,
  /// Only set by `write`.
  pub stats: Option<StatsReport>,
}
