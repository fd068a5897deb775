use std::path::Path;

#[derive(Debug)]
pub struct ResolveIdArgs<'a> {
  pub specifier: &'a str,
  pub importer: Option<&'a Path>,
}

#[derive(Debug)]
pub struct TransformArgs<'a> {
  pub id: &'a Path,
  pub code: &'a str,
}

#[derive(Debug)]
pub struct RenderChunkArgs<'a> {
  pub input: &'a Path,
  pub file: &'a Path,
  pub code: &'a str,
}

#[derive(Debug)]
pub struct GenerateBundleArgs<'a> {
  pub input: &'a Path,
  pub file: &'a Path,
  pub code: &'a str,
}
