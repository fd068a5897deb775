use tidepack_common::{Banner, PackageJson};

/// `banner: true` builds a license comment out of the manifest, a string is used verbatim.
pub fn resolve_banner(banner: Option<Banner>, package_json: Option<&PackageJson>) -> Option<String> {
  match banner? {
    Banner::Text(text) => Some(text),
    Banner::Enabled(false) => None,
    Banner::Enabled(true) => package_json.map(license_comment),
  }
}

fn license_comment(package_json: &PackageJson) -> String {
  let mut lines = vec!["/*!".to_string()];
  match (&package_json.name, &package_json.version) {
    (Some(name), Some(version)) => lines.push(format!(" * {name} v{version}")),
    (Some(name), None) => lines.push(format!(" * {name}")),
    _ => {}
  }
  if let Some(author) = package_json.author_name() {
    lines.push(format!(" * (c) {author}"));
  }
  if let Some(license) = &package_json.license {
    lines.push(format!(" * Released under the {license} License."));
  }
  lines.push(" */".to_string());
  lines.join("\n")
}

#[test]
fn test_resolve_banner() {
  let package_json = PackageJson {
    name: Some("my-lib".into()),
    version: Some("1.0.0".into()),
    author: Some(serde_json::json!("Jane Doe <jane@example.com>")),
    license: Some("MIT".into()),
    ..PackageJson::default()
  };

  assert_eq!(
    resolve_banner(Some(Banner::Enabled(true)), Some(&package_json)).unwrap(),
    "/*!\n * my-lib v1.0.0\n * (c) Jane Doe <jane@example.com>\n * Released under the MIT License.\n */"
  );
  assert_eq!(
    resolve_banner(Some(Banner::Text("/* hi */".into())), Some(&package_json)).as_deref(),
    Some("/* hi */")
  );
  assert_eq!(resolve_banner(Some(Banner::Enabled(false)), Some(&package_json)), None);
  assert_eq!(resolve_banner(None, Some(&package_json)), None);
  assert_eq!(resolve_banner(Some(Banner::Enabled(true)), None), None);
}
