use std::path::PathBuf;

use crate::Format;

#[derive(Debug, Clone)]
pub struct ArtifactRecord {
  /// Absolute output path, the key of the artifact map.
  pub absolute: PathBuf,
  /// Output path relative to the project directory, for display.
  pub relative: String,
  pub input: PathBuf,
  pub format: Format,
  pub compress: bool,
  pub code: String,
}
