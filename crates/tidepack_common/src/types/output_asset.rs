use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct OutputAsset {
  /// Absolute path the asset is (or would be) written to.
  pub file: PathBuf,
  pub content: String,
}

impl OutputAsset {
  pub fn content_as_bytes(&self) -> &[u8] {
    self.content.as_bytes()
  }
}
