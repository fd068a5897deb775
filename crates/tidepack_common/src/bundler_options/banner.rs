use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Banner {
  /// `true` builds a license comment from `package.json`.
  Enabled(bool),
  Text(String),
}
