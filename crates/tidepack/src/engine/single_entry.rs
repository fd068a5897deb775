use std::{
  path::{Path, PathBuf},
  time::{Duration, Instant},
};

use anyhow::Context;
use notify::{EventKind, RecursiveMode, Watcher};
use sugar_path::SugarPath;
use tidepack_common::{EngineConfig, OutputAsset, WatchEvent, WatchSession};
use tidepack_error::{Error, Result};
use tidepack_plugin::{
  GenerateBundleArgs, PluginContext, RenderChunkArgs, ResolveIdArgs, TransformArgs, Warning,
};
use tidepack_utils::path_ext::PathExt;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use super::Engine;
use crate::utils::import_specifiers::scan_import_specifiers;

const RELATIVE_IMPORT_CANDIDATES: &[&str] =
  &["", ".js", ".mjs", ".cjs", ".json", "/index.js", "/index.mjs"];

// Editors tend to emit several events per save.
const REBUILD_DEBOUNCE: Duration = Duration::from_millis(30);

/// Runs the plugin pipeline over the entry module alone.
///
/// Imports are resolved to report the ones that go nowhere, but they are never inlined and the
/// module syntax is left as the transpiler printed it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleEntryEngine;

impl SingleEntryEngine {
  pub fn new() -> Self {
    Self
  }

  async fn bundle(config: &EngineConfig) -> Result<OutputAsset> {
    let input = &config.input.input;
    let file = &config.output.file;
    let plugins = &config.input.plugins;
    let ctx = PluginContext::new(config.input.on_warn.clone());

    let mut code = tokio::fs::read_to_string(input)
      .await
      .with_context(|| format!("Could not read entry module \"{}\"", input.display()))?;

    for plugin in plugins {
      let transformed = plugin
        .transform(&ctx, &TransformArgs { id: input, code: &code })
        .await
        .with_context(|| {
          format!("[plugin {}] Failed to transform \"{}\"", plugin.name(), input.display())
        })?;
      if let Some(transformed) = transformed {
        code = transformed;
      }
    }

    Self::check_imports(config, &ctx, &code).await?;

    if let Some(banner) = &config.output.banner {
      code = format!("{banner}\n{code}");
    }

    for plugin in plugins {
      let rendered = plugin
        .render_chunk(&ctx, &RenderChunkArgs { input, file, code: &code })
        .await
        .with_context(|| {
          format!("[plugin {}] Failed to render \"{}\"", plugin.name(), file.display())
        })?;
      if let Some(rendered) = rendered {
        code = rendered;
      }
    }

    for plugin in plugins {
      plugin
        .generate_bundle(&ctx, &GenerateBundleArgs { input, file, code: &code })
        .await
        .with_context(|| format!("[plugin {}] generateBundle failed", plugin.name()))?;
    }

    Ok(OutputAsset { file: file.clone(), content: code })
  }

  /// Warns about every import that is neither external nor resolvable.
  async fn check_imports(config: &EngineConfig, ctx: &PluginContext, code: &str) -> Result<()> {
    let input = &config.input.input;
    let importer_dir = input.parent().unwrap_or(Path::new("/"));

    'specifiers: for specifier in scan_import_specifiers(code) {
      if is_external(specifier, importer_dir, &config.input.external) {
        continue;
      }
      for plugin in &config.input.plugins {
        let args = ResolveIdArgs { specifier, importer: Some(input) };
        let resolved = plugin.resolve_id(ctx, &args).await.with_context(|| {
          format!("[plugin {}] Failed to resolve \"{specifier}\"", plugin.name())
        })?;
        if resolved.is_some() {
          continue 'specifiers;
        }
      }
      if Path::new(specifier).is_path_like_specifier() {
        if resolve_relative(specifier, importer_dir).is_none() {
          ctx.warn(
            Warning::new(
              Warning::UNRESOLVED_IMPORT,
              format!("Could not resolve \"{specifier}\" from \"{}\"", input.display()),
            )
            .with_id(input.clone()),
          );
        }
      } else {
        ctx.warn(
          Warning::new(
            Warning::UNRESOLVED_IMPORT,
            format!("\"{specifier}\" could not be resolved, treating it as an external dependency"),
          )
          .with_id(input.clone()),
        );
      }
    }
    Ok(())
  }

  async fn write_asset(asset: &OutputAsset) -> Result<()> {
    if let Some(dir) = asset.file.parent() {
      tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(&asset.file, asset.content_as_bytes()).await?;
    Ok(())
  }
}

#[async_trait::async_trait]
impl Engine for SingleEntryEngine {
  async fn generate(&self, config: &EngineConfig) -> Result<Vec<OutputAsset>> {
    Ok(vec![Self::bundle(config).await?])
  }

  async fn write(&self, config: &EngineConfig) -> Result<Vec<OutputAsset>> {
    let asset = Self::bundle(config).await?;
    Self::write_asset(&asset).await?;
    Ok(vec![asset])
  }

  fn watch(&self, config: EngineConfig) -> Result<WatchSession> {
    let (event_tx, event_rx) = unbounded_channel();
    let (change_tx, change_rx) = unbounded_channel();

    let output = config.output.file.clone();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
      let change = match event {
        Ok(event) if !is_relevant_change(&event, &output) => return,
        Ok(_) => Ok(()),
        Err(err) => Err(err),
      };
      // The session is over once the receiver is gone.
      let _ = change_tx.send(change);
    })
    .map_err(|err| Error::engine(err.into()))?;

    let watch_dir = config.input.input.parent().map(Path::to_path_buf).unwrap_or_default();
    watcher
      .watch(&watch_dir, RecursiveMode::Recursive)
      .with_context(|| format!("Could not watch \"{}\"", watch_dir.display()))?;
    tracing::debug!(dir = %watch_dir.display(), "watching");

    tokio::spawn(rebuild_loop(config, event_tx, change_rx));
    Ok(WatchSession::new(event_rx, watcher))
  }
}

/// Builds once, then again after every batch of changes. Rebuild failures are sent as
/// [`WatchEvent::Error`] and the loop goes on; a watcher failure ends it with
/// [`WatchEvent::Fatal`].
async fn rebuild_loop(
  config: EngineConfig,
  tx: UnboundedSender<WatchEvent>,
  mut changes: tokio::sync::mpsc::UnboundedReceiver<notify::Result<()>>,
) {
  loop {
    if !rebuild(&config, &tx).await {
      return;
    }

    let Some(first) = changes.recv().await else {
      return;
    };
    tokio::time::sleep(REBUILD_DEBOUNCE).await;
    let mut batch = vec![first];
    while let Ok(change) = changes.try_recv() {
      batch.push(change);
    }
    // A failing watcher backend cannot be trusted to report further changes.
    if let Some(err) = batch.into_iter().find_map(std::result::Result::err) {
      let _ = tx.send(WatchEvent::Fatal(Error::engine(
        anyhow::Error::from(err).context("File watcher failed"),
      )));
      return;
    }
  }
}

/// Returns `false` once nobody listens to the session anymore.
async fn rebuild(config: &EngineConfig, tx: &UnboundedSender<WatchEvent>) -> bool {
  let input = config.input.input.clone();
  let start = Instant::now();
  if tx.send(WatchEvent::Start).is_err()
    || tx.send(WatchEvent::BundleStart { input: input.clone() }).is_err()
  {
    return false;
  }

  let event = match SingleEntryEngine.write(config).await {
    Ok(_) => WatchEvent::BundleEnd {
      input,
      output: config.output.file.clone(),
      duration: start.elapsed(),
    },
    Err(err) => WatchEvent::Error(err),
  };
  tx.send(event).is_ok() && tx.send(WatchEvent::End).is_ok()
}

/// Reads and writes of the output file itself never trigger a rebuild.
fn is_relevant_change(event: &notify::Event, output: &Path) -> bool {
  if matches!(event.kind, EventKind::Access(_)) {
    return false;
  }
  event.paths.is_empty() || event.paths.iter().any(|path| path != output)
}

fn is_external(specifier: &str, importer_dir: &Path, externals: &[String]) -> bool {
  if Path::new(specifier).is_path_like_specifier() {
    let absolute = Path::new(specifier).absolutize_with(importer_dir).to_slash_string();
    return externals.iter().any(|external| *external == absolute);
  }
  externals.iter().any(|external| {
    specifier == external
      || specifier.strip_prefix(external.as_str()).is_some_and(|rest| rest.starts_with('/'))
  })
}

fn resolve_relative(specifier: &str, importer_dir: &Path) -> Option<PathBuf> {
  let base = Path::new(specifier).absolutize_with(importer_dir);
  RELATIVE_IMPORT_CANDIDATES.iter().find_map(|candidate| {
    let mut path = base.clone().into_os_string();
    path.push(candidate);
    let path = PathBuf::from(path);
    path.is_file().then_some(path)
  })
}

#[cfg(test)]
mod tests {
  use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
  };

  use tidepack_common::{
    EngineConfig, Format, InputConfig, OutputConfig, OutputExports, WatchEvent, WatchSession,
  };
  use tidepack_plugin::{
    Plugin, PluginContext, PluginName, RenderChunkArgs, RenderChunkOutput, SharedPlugin,
    TransformArgs, TransformOutput, Warning,
  };
  use tokio::sync::mpsc::unbounded_channel;

  use super::{Engine, SingleEntryEngine, is_external, is_relevant_change, rebuild_loop};
  use crate::plugins::{TranspileOptions, TranspilePlugin};

  #[derive(Debug)]
  struct Upper;

  #[async_trait::async_trait]
  impl Plugin for Upper {
    fn name(&self) -> PluginName {
      "upper".into()
    }

    async fn transform(&self, _ctx: &PluginContext, args: &TransformArgs<'_>) -> TransformOutput {
      Ok(Some(args.code.replace("hello", "HELLO")))
    }
  }

  #[derive(Debug)]
  struct Footer;

  #[async_trait::async_trait]
  impl Plugin for Footer {
    fn name(&self) -> PluginName {
      "footer".into()
    }

    async fn render_chunk(
      &self,
      _ctx: &PluginContext,
      args: &RenderChunkArgs<'_>,
    ) -> RenderChunkOutput {
      Ok(Some(format!("{}// footer\n", args.code)))
    }
  }

  fn config(
    dir: &Path,
    plugins: Vec<SharedPlugin>,
    warnings: &Arc<Mutex<Vec<String>>>,
  ) -> EngineConfig {
    let warnings = Arc::clone(warnings);
    EngineConfig {
      input: InputConfig {
        input: dir.join("src").join("index.js"),
        external: vec!["react".to_string()],
        plugins,
        on_warn: Arc::new(move |warning: &Warning| {
          warnings.lock().unwrap().push(format!("{}: {}", warning.code, warning.message));
        }),
      },
      output: OutputConfig {
        format: Format::Cjs,
        globals: Default::default(),
        name: None,
        file: dir.join("dist").join("index.cjs.js"),
        banner: Some("/* banner */".to_string()),
        exports: OutputExports::Auto,
        sourcemap: false,
      },
    }
  }

  fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(
      dir.path().join("src").join("index.js"),
      "import React from 'react';
import dom from 'react/dom';
import { a } from './a';
import b from './missing';
import lodash from 'lodash';
console.log('hello');
",
    )
    .unwrap();
    std::fs::write(dir.path().join("src").join("a.js"), "export const a = 1;\n").unwrap();
    dir
  }

  #[tokio::test]
  async fn test_write_runs_hooks_in_order() {
    let dir = project();
    let warnings = Arc::new(Mutex::new(vec![]));
    let config = config(dir.path(), vec![Arc::new(Upper), Arc::new(Footer)], &warnings);

    let assets = SingleEntryEngine.write(&config).await.unwrap();
    assert_eq!(assets.len(), 1);
    let written = std::fs::read_to_string(dir.path().join("dist").join("index.cjs.js")).unwrap();
    assert_eq!(written, assets[0].content);
    assert!(written.starts_with("/* banner */\n"));
    assert!(written.contains("console.log('HELLO');"));
    assert!(written.ends_with("// footer\n"));

    let warnings = warnings.lock().unwrap();
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(warnings[0].contains("./missing"));
    assert!(warnings[1].contains("lodash"));
  }

  #[tokio::test]
  async fn test_generate_does_not_touch_the_disk() {
    let dir = project();
    let warnings = Arc::new(Mutex::new(vec![]));
    let config = config(dir.path(), vec![], &warnings);

    let assets = SingleEntryEngine.generate(&config).await.unwrap();
    assert_eq!(assets[0].file, dir.path().join("dist").join("index.cjs.js"));
    assert!(!dir.path().join("dist").exists());
  }

  #[tokio::test]
  async fn test_missing_entry() {
    let dir = tempfile::tempdir().unwrap();
    let warnings = Arc::new(Mutex::new(vec![]));
    let error =
      SingleEntryEngine.generate(&config(dir.path(), vec![], &warnings)).await.unwrap_err();
    assert_eq!(error.code(), "ENGINE_ERROR");
    assert!(error.to_string().contains("index.js"));
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn test_watch_builds_once_up_front() {
    let dir = project();
    let warnings = Arc::new(Mutex::new(vec![]));
    let mut session = SingleEntryEngine.watch(config(dir.path(), vec![], &warnings)).unwrap();

    assert!(matches!(session.next_event().await, Some(WatchEvent::Start)));
    assert!(matches!(session.next_event().await, Some(WatchEvent::BundleStart { .. })));
    match session.next_event().await {
      Some(WatchEvent::BundleEnd { output, .. }) => {
        assert_eq!(output, dir.path().join("dist").join("index.cjs.js"));
      }
      other => panic!("unexpected event {other:?}"),
    }
    assert!(matches!(session.next_event().await, Some(WatchEvent::End)));
    assert!(dir.path().join("dist").join("index.cjs.js").is_file());
  }

  fn transpiler() -> SharedPlugin {
    Arc::new(TranspilePlugin::new(TranspileOptions::default()))
  }

  async fn next_matching(
    session: &mut WatchSession,
    matches: impl Fn(&WatchEvent) -> bool,
  ) -> WatchEvent {
    tokio::time::timeout(Duration::from_secs(10), async {
      loop {
        match session.next_event().await {
          Some(event) if matches(&event) => return event,
          Some(_) => {}
          None => panic!("watch session ended"),
        }
      }
    })
    .await
    .expect("timed out waiting for a watch event")
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn test_watch_survives_a_failed_rebuild() {
    let dir = project();
    let entry = dir.path().join("src").join("index.js");
    let output = dir.path().join("dist").join("index.cjs.js");
    let warnings = Arc::new(Mutex::new(vec![]));
    let mut session =
      SingleEntryEngine.watch(config(dir.path(), vec![transpiler()], &warnings)).unwrap();
    next_matching(&mut session, |event| matches!(event, WatchEvent::End)).await;

    std::fs::write(&entry, "let = ;\n").unwrap();
    match next_matching(&mut session, |event| matches!(event, WatchEvent::Error(_))).await {
      WatchEvent::Error(err) => assert!(err.to_string().contains("index.js"), "{err}"),
      other => panic!("unexpected event {other:?}"),
    }

    std::fs::write(&entry, "export const fixed = 1;\n").unwrap();
    next_matching(&mut session, |event| matches!(event, WatchEvent::BundleEnd { .. })).await;
    assert!(std::fs::read_to_string(&output).unwrap().contains("fixed"));
  }

  #[tokio::test]
  async fn test_rebuild_loop_reports_errors_and_keeps_going() {
    let dir = project();
    let entry = dir.path().join("src").join("index.js");
    std::fs::write(&entry, "let = ;\n").unwrap();
    let warnings = Arc::new(Mutex::new(vec![]));
    let (tx, mut rx) = unbounded_channel();
    let (change_tx, change_rx) = unbounded_channel();
    let handle = tokio::spawn(rebuild_loop(
      config(dir.path(), vec![transpiler()], &warnings),
      tx,
      change_rx,
    ));

    assert!(matches!(rx.recv().await, Some(WatchEvent::Start)));
    assert!(matches!(rx.recv().await, Some(WatchEvent::BundleStart { .. })));
    assert!(matches!(rx.recv().await, Some(WatchEvent::Error(_))));
    assert!(matches!(rx.recv().await, Some(WatchEvent::End)));

    std::fs::write(&entry, "export const fixed = 1;\n").unwrap();
    change_tx.send(Ok(())).unwrap();
    assert!(matches!(rx.recv().await, Some(WatchEvent::Start)));
    assert!(matches!(rx.recv().await, Some(WatchEvent::BundleStart { .. })));
    assert!(matches!(rx.recv().await, Some(WatchEvent::BundleEnd { .. })));
    assert!(matches!(rx.recv().await, Some(WatchEvent::End)));

    drop(change_tx);
    handle.await.unwrap();
    assert!(rx.recv().await.is_none());
  }

  #[tokio::test]
  async fn test_watcher_failure_is_fatal() {
    let dir = project();
    let warnings = Arc::new(Mutex::new(vec![]));
    let (tx, mut rx) = unbounded_channel();
    let (change_tx, change_rx) = unbounded_channel();
    change_tx.send(Ok(())).unwrap();
    change_tx.send(Err(notify::Error::generic("inotify watch limit reached"))).unwrap();
    tokio::spawn(rebuild_loop(config(dir.path(), vec![], &warnings), tx, change_rx))
      .await
      .unwrap();

    let mut events = vec![];
    while let Some(event) = rx.recv().await {
      events.push(event);
    }
    assert_eq!(events.len(), 5, "{events:?}");
    assert!(matches!(events[2], WatchEvent::BundleEnd { .. }));
    match &events[4] {
      WatchEvent::Fatal(err) => {
        assert!(err.to_string().contains("File watcher failed"));
        assert!(crate::render_error(err).contains("inotify watch limit reached"));
      }
      other => panic!("unexpected event {other:?}"),
    }
  }

  #[test]
  fn test_is_external() {
    let externals = vec!["react".to_string(), "/project/src/local.js".to_string()];
    let dir = Path::new("/project/src");
    assert!(is_external("react", dir, &externals));
    assert!(is_external("react/jsx-runtime", dir, &externals));
    assert!(!is_external("react-dom", dir, &externals));
    assert!(is_external("./local.js", dir, &externals));
    assert!(!is_external("./other.js", dir, &externals));
  }

  #[test]
  fn test_output_changes_are_ignored() {
    let output = Path::new("/project/dist/index.js");
    let event = |paths: &[&str]| {
      paths.iter().fold(
        notify::Event::new(notify::EventKind::Modify(notify::event::ModifyKind::Any)),
        |event, path| event.add_path(PathBuf::from(path)),
      )
    };
    assert!(!is_relevant_change(&event(&["/project/dist/index.js"]), output));
    assert!(is_relevant_change(&event(&["/project/src/index.js"]), output));
    assert!(is_relevant_change(
      &event(&["/project/dist/index.js", "/project/src/a.js"]),
      output
    ));
  }
}
