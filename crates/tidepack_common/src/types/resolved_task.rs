use std::path::PathBuf;

use crate::Format;

/// One `(input, format)` combination of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTask {
  /// Relative to the working directory of the process.
  pub input: PathBuf,
  pub format: Format,
  pub compress: bool,
}
