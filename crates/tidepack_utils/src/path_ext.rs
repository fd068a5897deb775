use std::{borrow::Cow, path::Path};

use sugar_path::SugarPath;

pub trait PathExt {
  fn to_slash_string(&self) -> String;

  fn file_stem_str(&self) -> Cow<str>;

  fn is_path_like_specifier(&self) -> bool;
}

impl PathExt for Path {
  fn to_slash_string(&self) -> String {
    self.to_slash_lossy().into_owned()
  }

  fn file_stem_str(&self) -> Cow<str> {
    self.file_stem().map_or_else(|| self.to_string_lossy(), |stem| stem.to_string_lossy())
  }

  /// `./foo`, `../foo` and `/foo` are paths, `foo` and `@scope/foo` are package names.
  fn is_path_like_specifier(&self) -> bool {
    let raw = self.to_string_lossy();
    raw.starts_with('.') || self.is_absolute()
  }
}

#[test]
fn test_file_stem_str() {
  assert_eq!(Path::new("src/index.js").file_stem_str(), "index");
  assert_eq!(Path::new("src/index.d.ts").file_stem_str(), "index.d");
  assert_eq!(Path::new("main").file_stem_str(), "main");
}

#[test]
fn test_is_path_like_specifier() {
  assert!(Path::new("./foo").is_path_like_specifier());
  assert!(Path::new("../foo").is_path_like_specifier());
  assert!(!Path::new("react").is_path_like_specifier());
  assert!(!Path::new("@scope/pkg").is_path_like_specifier());
}
