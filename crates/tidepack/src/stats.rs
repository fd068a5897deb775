use std::{fmt::Display, io::Write, path::PathBuf};

use ansi_term::Colour;
use flate2::{Compression, write::GzEncoder};
use tidepack_common::{ArtifactRecord, Format};
use tidepack_error::Result;
use tidepack_utils::indexmap::FxIndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRow {
  pub file: String,
  pub format: Format,
  pub compress: bool,
  pub size: usize,
  pub gzip_size: usize,
}

/// The size table printed after a build.
#[derive(Debug, Clone, Default)]
pub struct StatsReport {
  pub rows: Vec<StatsRow>,
}

impl StatsReport {
  pub fn from_artifacts(artifacts: &FxIndexMap<PathBuf, ArtifactRecord>) -> Result<Self> {
    let mut rows = artifacts
      .values()
      .map(|artifact| {
        Ok(StatsRow {
          file: artifact.relative.clone(),
          format: artifact.format,
          compress: artifact.compress,
          size: artifact.code.len(),
          gzip_size: gzip_size(artifact.code.as_bytes())?,
        })
      })
      .collect::<Result<Vec<_>>>()?;
    rows.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(Self { rows })
  }
}

impl Display for StatsReport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let cells = self
      .rows
      .iter()
      .map(|row| {
        let format = if row.compress {
          format!("{}{}", row.format, Format::MIN_MARKER)
        } else {
          row.format.to_string()
        };
        (row.file.as_str(), format, human_size(row.size), human_size(row.gzip_size))
      })
      .collect::<Vec<_>>();

    let width = |len: fn(&(&str, String, String, String)) -> usize, header: &str| {
      cells.iter().map(len).max().unwrap_or(0).max(header.len())
    };
    let file_width = width(|cell| cell.0.len(), "File");
    let format_width = width(|cell| cell.1.len(), "Format");
    let size_width = width(|cell| cell.2.len(), "Size");

    let dim = Colour::White.dimmed();
    let bold = Colour::White.bold();
    writeln!(
      f,
      "{}{:file_pad$}  {}{:format_pad$}  {}{:size_pad$}  {}",
      bold.paint("File"),
      "",
      bold.paint("Format"),
      "",
      bold.paint("Size"),
      "",
      bold.paint("Gzipped"),
      file_pad = file_width - "File".len(),
      format_pad = format_width - "Format".len(),
      size_pad = size_width - "Size".len(),
    )?;
    for (file, format, size, gzip_size) in &cells {
      writeln!(
        f,
        "{}{:file_pad$}  {}{:format_pad$}  {:>size_width$}  {}",
        Colour::Cyan.paint(*file),
        "",
        dim.paint(format.as_str()),
        "",
        size,
        Colour::Green.paint(gzip_size.as_str()),
        file_pad = file_width - file.len(),
        format_pad = format_width - format.len(),
      )?;
    }
    Ok(())
  }
}

fn gzip_size(bytes: &[u8]) -> Result<usize> {
  let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
  encoder.write_all(bytes)?;
  Ok(encoder.finish()?.len())
}

/// `512 B`, `1.50 kB`, `2.00 MB`.
pub fn human_size(bytes: usize) -> String {
  const KB: f64 = 1024.0;
  #[allow(clippy::cast_precision_loss)]
  let bytes = bytes as f64;
  if bytes < KB {
    format!("{bytes} B")
  } else if bytes < KB * KB {
    format!("{:.2} kB", bytes / KB)
  } else {
    format!("{:.2} MB", bytes / KB / KB)
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use tidepack_common::{ArtifactRecord, Format};
  use tidepack_utils::indexmap::FxIndexMap;

  use super::{StatsReport, human_size};

  fn artifact(relative: &str, format: Format, compress: bool, code: String) -> ArtifactRecord {
    ArtifactRecord {
      absolute: PathBuf::from("/work").join(relative),
      relative: relative.to_string(),
      input: PathBuf::from("src/index.js"),
      format,
      compress,
      code,
    }
  }

  #[test]
  fn test_rows_are_sorted_and_compressed() {
    let mut artifacts = FxIndexMap::default();
    for record in [
      artifact("dist/index.m.js", Format::Es, false, "export default 1;\n".repeat(200)),
      artifact("dist/index.cjs.js", Format::Cjs, false, "module.exports = 1;\n".repeat(200)),
      artifact("dist/index.min.js", Format::Umd, true, "var a=1;".repeat(50)),
    ] {
      artifacts.insert(record.absolute.clone(), record);
    }

    let report = StatsReport::from_artifacts(&artifacts).unwrap();
    let files = report.rows.iter().map(|row| row.file.as_str()).collect::<Vec<_>>();
    assert_eq!(files, vec!["dist/index.cjs.js", "dist/index.m.js", "dist/index.min.js"]);
    for row in &report.rows {
      assert!(row.gzip_size > 0);
      assert!(row.gzip_size <= row.size, "{row:?}");
    }

    let rendered = report.to_string();
    assert!(rendered.contains("dist/index.cjs.js"));
    assert!(rendered.contains("umd-min"));
  }

  #[test]
  fn test_human_size() {
    assert_eq!(human_size(0), "0 B");
    assert_eq!(human_size(512), "512 B");
    assert_eq!(human_size(1536), "1.50 kB");
    assert_eq!(human_size(2 * 1024 * 1024), "2.00 MB");
  }
}
