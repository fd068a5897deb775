use std::{fmt::Display, path::PathBuf, sync::Arc};

pub type WarningHandler = Arc<dyn Fn(&Warning) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Warning {
  pub code: &'static str,
  pub message: String,
  pub id: Option<PathBuf>,
}

impl Warning {
  pub const UNRESOLVED_IMPORT: &'static str = "UNRESOLVED_IMPORT";
  pub const THIS_IS_UNDEFINED: &'static str = "THIS_IS_UNDEFINED";
  pub const PLUGIN_WARNING: &'static str = "PLUGIN_WARNING";

  pub fn new(code: &'static str, message: impl Into<String>) -> Self {
    Self { code, message: message.into(), id: None }
  }

  #[must_use]
  pub fn with_id(mut self, id: impl Into<PathBuf>) -> Self {
    self.id = Some(id.into());
    self
  }
}

impl Display for Warning {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match &self.id {
      Some(id) => write!(f, "{} ({})", self.message, id.display()),
      None => write!(f, "{}", self.message),
    }
  }
}
