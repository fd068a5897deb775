use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tidepack_error::{Error, Result};

/// The fields of the nearest `package.json` the build cares about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
  #[serde(skip)]
  pub path: PathBuf,
  pub name: Option<String>,
  pub version: Option<String>,
  pub module_name: Option<String>,
  pub author: Option<Value>,
  pub license: Option<String>,
  /// Build options embedded in the manifest.
  pub tidepack: Option<Value>,
}

impl PackageJson {
  /// Walks up from `dir` and reads the first `package.json` found.
  pub fn find(dir: &Path) -> Result<Option<Self>> {
    for ancestor in dir.ancestors() {
      let path = ancestor.join("package.json");
      if path.is_file() {
        return Self::read(path).map(Some);
      }
    }
    Ok(None)
  }

  pub fn read(path: PathBuf) -> Result<Self> {
    let raw = std::fs::read_to_string(&path)?;
    let mut package_json: Self = serde_json::from_str(&raw).map_err(|err| {
      Error::invalid_options(format!("Failed to parse \"{}\": {err}", path.display()))
    })?;
    package_json.path = path;
    Ok(package_json)
  }

  /// `author` is either `"Name <mail>"` or `{ "name": "Name" }`.
  pub fn author_name(&self) -> Option<&str> {
    match self.author.as_ref()? {
      Value::String(author) => Some(author.as_str()),
      Value::Object(author) => author.get("name").and_then(Value::as_str),
      _ => None,
    }
  }
}

#[test]
fn test_find_walks_up() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(
    dir.path().join("package.json"),
    r#"{ "name": "my-lib", "version": "1.2.3", "author": { "name": "Jane" }, "moduleName": "MyLib" }"#,
  )
  .unwrap();
  let nested = dir.path().join("src").join("deep");
  std::fs::create_dir_all(&nested).unwrap();

  let package_json = PackageJson::find(&nested).unwrap().unwrap();
  assert_eq!(package_json.name.as_deref(), Some("my-lib"));
  assert_eq!(package_json.version.as_deref(), Some("1.2.3"));
  assert_eq!(package_json.module_name.as_deref(), Some("MyLib"));
  assert_eq!(package_json.author_name(), Some("Jane"));
  assert_eq!(package_json.path, dir.path().join("package.json"));
}

#[test]
fn test_invalid_manifest_is_a_config_error() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("package.json"), "{ not json").unwrap();
  let error = PackageJson::find(dir.path()).unwrap_err();
  assert!(error.is_config_error());
}
