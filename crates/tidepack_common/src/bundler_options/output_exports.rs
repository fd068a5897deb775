use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputExports {
  #[default]
  Auto,
  Default,
  Named,
  None,
}

impl FromStr for OutputExports {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "auto" => Ok(Self::Auto),
      "default" => Ok(Self::Default),
      "named" => Ok(Self::Named),
      "none" => Ok(Self::None),
      _ => Err(format!(
        "\"exports\" must be \"default\", \"named\", \"none\" or \"auto\", received \"{value}\"."
      )),
    }
  }
}

impl Display for OutputExports {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Auto => write!(f, "auto"),
      Self::Default => write!(f, "default"),
      Self::Named => write!(f, "named"),
      Self::None => write!(f, "none"),
    }
  }
}
