use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
  template: String,
}

impl FilenameTemplate {
  pub fn new(template: impl Into<String>) -> Self {
    Self { template: template.into() }
  }

  pub fn template(&self) -> &str {
    &self.template
  }

  /// Replaces every `[key]` with its value. Tokens without a substitution are kept verbatim,
  /// and substituted values are never expanded again.
  pub fn render(&self, substitutions: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(self.template.len());
    let mut rest = self.template.as_str();
    while let Some(open) = rest.find('[') {
      rendered.push_str(&rest[..open]);
      let after_open = &rest[open + 1..];
      let value = after_open.find(']').and_then(|close| {
        let key = &after_open[..close];
        substitutions.iter().find(|(k, _)| *k == key).map(|(_, value)| (*value, close))
      });
      match value {
        Some((value, close)) => {
          rendered.push_str(value);
          rest = &after_open[close + 1..];
        }
        None => {
          rendered.push('[');
          rest = after_open;
        }
      }
    }
    rendered.push_str(rest);
    rendered
  }
}

impl From<String> for FilenameTemplate {
  fn from(template: String) -> Self {
    Self { template }
  }
}

/// `index.cjs.js` -> `index.cjs.min.js`, `index` -> `index.min`.
pub fn insert_min_marker(path: &Path) -> PathBuf {
  let Some(file_name) = path.file_name().map(|name| name.to_string_lossy().into_owned()) else {
    return path.to_path_buf();
  };
  let marked = match file_name.rfind('.') {
    Some(dot) if dot > 0 => format!("{}.min{}", &file_name[..dot], &file_name[dot..]),
    _ => format!("{file_name}.min"),
  };
  path.with_file_name(marked)
}

#[test]
fn test_render() {
  let template = FilenameTemplate::new("[name][suffix].js");
  assert_eq!(template.render(&[("name", "index"), ("suffix", ".cjs")]), "index.cjs.js");
  assert_eq!(template.render(&[("name", "index"), ("suffix", "")]), "index.js");

  let template = FilenameTemplate::new("[name]/[name].[hash].js");
  assert_eq!(template.render(&[("name", "vue")]), "vue/vue.[hash].js");
}

#[test]
fn test_render_without_tokens_is_identity() {
  for pattern in ["bundle.js", "dist/out.mjs", "", "[unknown].js"] {
    let template = FilenameTemplate::new(pattern);
    assert_eq!(template.render(&[("name", "index"), ("suffix", ".m")]), pattern);
  }
}

#[test]
fn test_substituted_values_are_not_expanded() {
  let template = FilenameTemplate::new("[name][suffix].js");
  assert_eq!(
    template.render(&[("name", "lib[suffix]"), ("suffix", ".cjs")]),
    "lib[suffix].cjs.js"
  );

  let template = FilenameTemplate::new("[[name]]-[name.js");
  assert_eq!(template.render(&[("name", "index")]), "[index]-[name.js");
}

#[test]
fn test_insert_min_marker() {
  assert_eq!(insert_min_marker(Path::new("dist/index.cjs.js")), Path::new("dist/index.cjs.min.js"));
  assert_eq!(insert_min_marker(Path::new("dist/index.js")), Path::new("dist/index.min.js"));
  assert_eq!(insert_min_marker(Path::new("dist/index")), Path::new("dist/index.min"));
  assert_eq!(insert_min_marker(Path::new(".hidden")), Path::new(".hidden.min"));
}
