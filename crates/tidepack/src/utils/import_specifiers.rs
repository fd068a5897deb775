use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

// `from "x"`, `import "x"`, `import("x")` and `require("x")`.
static IMPORT_SPECIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?P<prefix>\b(?:from|import|require)\s*\(?\s*)(?P<quote>['"])(?P<specifier>[^'"\r\n]+)['"]"#)
    .unwrap()
});

pub fn scan_import_specifiers(code: &str) -> Vec<&str> {
  IMPORT_SPECIFIER_RE
    .captures_iter(code)
    .filter_map(|caps| caps.name("specifier").map(|specifier| specifier.as_str()))
    .collect()
}

/// Rewrites every import specifier for which `rewrite` returns `Some`.
pub fn rewrite_import_specifiers<'a>(
  code: &'a str,
  rewrite: impl Fn(&str) -> Option<String>,
) -> Cow<'a, str> {
  IMPORT_SPECIFIER_RE.replace_all(code, |caps: &Captures| match rewrite(&caps["specifier"]) {
    Some(rewritten) => format!("{}{}{rewritten}{}", &caps["prefix"], &caps["quote"], &caps["quote"]),
    None => caps[0].to_string(),
  })
}

#[test]
fn test_scan_import_specifiers() {
  let code = r#"
import React from 'react';
import './style.css';
export * from "./utils";
const lazy = import('./lazy');
const fs = require("fs");
const from = 1;
"#;
  assert_eq!(scan_import_specifiers(code), vec!["react", "./style.css", "./utils", "./lazy", "fs"]);
}

#[test]
fn test_rewrite_import_specifiers() {
  let code = "import a from 'a';\nimport b from \"b\";\n";
  let rewritten =
    rewrite_import_specifiers(code, |specifier| (specifier == "a").then(|| "./vendor/a".to_string()));
  assert_eq!(rewritten, "import a from './vendor/a';\nimport b from \"b\";\n");
}
