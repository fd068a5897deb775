use std::path::{Path, PathBuf};

use sugar_path::SugarPath;
use tidepack_error::{Error, Result};
use tidepack_utils::{indexmap::FxIndexSet, path_ext::PathExt};
use walkdir::WalkDir;

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Expands the input patterns against the project directory `cwd`.
///
/// Matches are returned relative to `process_cwd`, without duplicates and in pattern order.
/// Patterns starting with `!` remove earlier matches.
pub fn resolve_inputs(patterns: &[String], cwd: &Path, process_cwd: &Path) -> Result<Vec<PathBuf>> {
  let mut matched = FxIndexSet::default();
  let (excludes, includes): (Vec<_>, Vec<_>) =
    patterns.iter().partition(|pattern| pattern.starts_with('!'));

  for pattern in includes {
    if is_glob(pattern) {
      matched.extend(walk_matches(pattern, cwd));
    } else {
      let file = Path::new(pattern).absolutize_with(cwd);
      if file.is_file() {
        matched.insert(file);
      }
    }
  }

  for pattern in excludes.iter().map(|pattern| &pattern[1..]) {
    matched.retain(|file| !matches_pattern(pattern, file, cwd));
  }

  if matched.is_empty() {
    return Err(Error::no_matched_files(patterns.to_vec(), cwd));
  }

  Ok(matched.into_iter().map(|file| file.relative(process_cwd)).collect())
}

fn is_glob(pattern: &str) -> bool {
  pattern.contains(GLOB_CHARS)
}

fn matches_pattern(pattern: &str, file: &Path, cwd: &Path) -> bool {
  if Path::new(pattern).is_absolute() {
    return fast_glob::glob_match(pattern, file.to_slash_string().as_str());
  }
  if is_glob(pattern) {
    fast_glob::glob_match(pattern, file.relative(cwd).to_slash_string().as_str())
  } else {
    Path::new(pattern).absolutize_with(cwd) == file
  }
}

fn walk_matches<'a>(pattern: &'a str, cwd: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
  WalkDir::new(cwd)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| {
      entry.depth() == 0 || !entry.file_type().is_dir() || !is_ignored_dir(entry.file_name())
    })
    .filter_map(std::result::Result::ok)
    .filter(|entry| entry.file_type().is_file())
    .map(walkdir::DirEntry::into_path)
    .filter(move |file| matches_pattern(pattern, file, cwd))
}

fn is_ignored_dir(name: &std::ffi::OsStr) -> bool {
  let name = name.to_string_lossy();
  name == "node_modules" || name.starts_with('.')
}
