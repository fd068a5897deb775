use std::{fmt::Display, str::FromStr};

use tidepack_error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
  Cjs,
  Es,
  Umd,
}

impl Format {
  /// `umd-min` builds the `umd` format and minifies it.
  pub const MIN_MARKER: &'static str = "-min";

  /// The part spliced into `[suffix]` of the filename template.
  #[inline]
  pub fn suffix(self) -> &'static str {
    match self {
      Self::Cjs => ".cjs",
      Self::Es => ".m",
      Self::Umd => "",
    }
  }

  /// Resolves the suffix of a format name, failing on anything but `cjs`, `es` and `umd`.
  pub fn get_suffix(name: &str) -> Result<&'static str> {
    name.parse::<Self>().map(Self::suffix)
  }

  /// Splits a user facing format name like `cjs-min` into the format and the compress flag.
  pub fn parse_with_compress(name: &str) -> Result<(Self, bool)> {
    match name.strip_suffix(Self::MIN_MARKER) {
      Some(canonical) => Ok((canonical.parse()?, true)),
      None => Ok((name.parse()?, false)),
    }
  }

  #[inline]
  pub fn is_umd(self) -> bool {
    matches!(self, Self::Umd)
  }

  #[inline]
  pub fn is_es(self) -> bool {
    matches!(self, Self::Es)
  }
}

impl FromStr for Format {
  type Err = Error;

  fn from_str(value: &str) -> Result<Self> {
    match value {
      "cjs" => Ok(Self::Cjs),
      "es" => Ok(Self::Es),
      "umd" => Ok(Self::Umd),
      _ => Err(Error::unsupported_format(value)),
    }
  }
}

impl Display for Format {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Cjs => write!(f, "cjs"),
      Self::Es => write!(f, "es"),
      Self::Umd => write!(f, "umd"),
    }
  }
}

#[test]
fn test_get_suffix() {
  assert_eq!(Format::get_suffix("cjs").unwrap(), ".cjs");
  assert_eq!(Format::get_suffix("es").unwrap(), ".m");
  assert_eq!(Format::get_suffix("umd").unwrap(), "");

  let error = Format::get_suffix("foo").unwrap_err();
  assert!(error.is_config_error());
  assert_eq!(error.code(), "UNSUPPORTED_FORMAT");
  assert!(Format::get_suffix("esm").is_err());
}

#[test]
fn test_parse_with_compress() {
  assert_eq!(Format::parse_with_compress("cjs").unwrap(), (Format::Cjs, false));
  assert_eq!(Format::parse_with_compress("umd-min").unwrap(), (Format::Umd, true));
  assert_eq!(Format::parse_with_compress("es-min").unwrap(), (Format::Es, true));
  assert!(Format::parse_with_compress("iife-min").is_err());
  assert!(Format::parse_with_compress("-min").is_err());
}
