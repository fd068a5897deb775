use std::path::{Path, PathBuf};

use oxc_resolver::{ResolveOptions, Resolver};
use tidepack_plugin::{
  Plugin, PluginContext, PluginName, ResolveIdArgs, ResolveIdOutput, ResolvedId,
};
use tidepack_utils::path_ext::PathExt;

/// Resolves bare specifiers to files under `node_modules`, so the engine can inline them.
pub struct NodeResolvePlugin {
  cwd: PathBuf,
  resolver: Resolver,
}

impl NodeResolvePlugin {
  pub fn new(cwd: PathBuf) -> Self {
    let resolver = Resolver::new(ResolveOptions {
      extensions: vec![".js".into(), ".mjs".into(), ".cjs".into(), ".json".into()],
      main_fields: vec!["module".into(), "main".into()],
      condition_names: vec!["import".into(), "require".into(), "default".into()],
      ..ResolveOptions::default()
    });
    Self { cwd, resolver }
  }
}

impl std::fmt::Debug for NodeResolvePlugin {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NodeResolvePlugin").field("cwd", &self.cwd).finish_non_exhaustive()
  }
}

#[async_trait::async_trait]
impl Plugin for NodeResolvePlugin {
  fn name(&self) -> PluginName {
    "node-resolve".into()
  }

  async fn resolve_id(&self, _ctx: &PluginContext, args: &ResolveIdArgs<'_>) -> ResolveIdOutput {
    if Path::new(args.specifier).is_path_like_specifier() {
      return Ok(None);
    }
    let dir = args.importer.and_then(Path::parent).unwrap_or(self.cwd.as_path());
    match self.resolver.resolve(dir, args.specifier) {
      Ok(resolution) => Ok(Some(ResolvedId { id: resolution.full_path(), external: false })),
      Err(err) => {
        tracing::trace!(specifier = args.specifier, %err, "node-resolve miss");
        Ok(None)
      }
    }
  }
}

#[tokio::test]
async fn test_resolves_packages_from_node_modules() {
  let dir = tempfile::tempdir().unwrap();
  let package_dir = dir.path().join("node_modules").join("tiny");
  std::fs::create_dir_all(&package_dir).unwrap();
  std::fs::write(package_dir.join("package.json"), r#"{ "name": "tiny", "main": "main.js" }"#)
    .unwrap();
  std::fs::write(package_dir.join("main.js"), "module.exports = 1;").unwrap();
  std::fs::create_dir_all(dir.path().join("src")).unwrap();

  let plugin = NodeResolvePlugin::new(dir.path().to_path_buf());
  let ctx = PluginContext::default();
  let importer = dir.path().join("src").join("index.js");

  let resolved = plugin
    .resolve_id(&ctx, &ResolveIdArgs { specifier: "tiny", importer: Some(&importer) })
    .await
    .unwrap()
    .unwrap();
  assert!(resolved.id.ends_with("node_modules/tiny/main.js"));

  let missing = plugin
    .resolve_id(&ctx, &ResolveIdArgs { specifier: "missing-pkg", importer: Some(&importer) })
    .await
    .unwrap();
  assert!(missing.is_none());

  let relative = plugin
    .resolve_id(&ctx, &ResolveIdArgs { specifier: "./tiny", importer: Some(&importer) })
    .await
    .unwrap();
  assert!(relative.is_none());
}
