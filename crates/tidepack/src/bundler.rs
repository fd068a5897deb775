use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use ansi_term::Colour;
use futures::future::{join_all, try_join_all};
use sugar_path::SugarPath;
use tidepack_common::{
  BuildOptions, Format, NormalizedBuildOptions, PackageJson, ResolvedTask, WatchEvent,
  WatchSession,
};
use tidepack_error::{Error, Result};
use tidepack_utils::indexmap::FxIndexMap;
use tokio::sync::mpsc::unbounded_channel;

use crate::{
  config_builder::ConfigBuilder,
  engine::{SharedEngine, SingleEntryEngine},
  handle_error::handle_error,
  plugin_loader::PluginRegistry,
  stats::StatsReport,
  types::bundle_output::BundleOutput,
  utils::{normalize_options::normalize_options, resolve_inputs::resolve_inputs},
};

/// Resolves the inputs and formats of a build into tasks and drives the engine over them.
#[derive(Debug)]
pub struct Tidepack {
  options: NormalizedBuildOptions,
  package_json: Option<PackageJson>,
  process_cwd: PathBuf,
  engine: SharedEngine,
  registry: PluginRegistry,
}

impl Tidepack {
  /// Uses the reference engine and the builtin plugins.
  pub fn new(options: BuildOptions) -> Result<Self> {
    Self::with_engine(options, Arc::new(SingleEntryEngine), PluginRegistry::with_builtins())
  }

  pub fn with_engine(
    options: BuildOptions,
    engine: SharedEngine,
    registry: PluginRegistry,
  ) -> Result<Self> {
    let process_cwd = std::env::current_dir()?;
    let project_dir = options.cwd.as_ref().map_or_else(
      || process_cwd.clone(),
      |cwd| if cwd.is_absolute() { cwd.clone() } else { cwd.absolutize_with(&process_cwd) },
    );
    let package_json = PackageJson::find(&project_dir)?;
    let options = normalize_options(options, &process_cwd, package_json.as_ref());
    tracing::debug!(cwd = %options.cwd.display(), "normalized options");

    Ok(Self { options, package_json, process_cwd, engine, registry })
  }

  pub fn options(&self) -> &NormalizedBuildOptions {
    &self.options
  }

  pub fn package_json(&self) -> Option<&PackageJson> {
    self.package_json.as_ref()
  }

  /// The input files, relative to the working directory of the process.
  pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
    tracing::debug!(patterns = ?self.options.input, "resolving inputs");
    resolve_inputs(&self.options.input, &self.options.cwd, &self.process_cwd)
  }

  /// Every input paired with every format.
  pub fn resolve_tasks(&self) -> Result<Vec<ResolvedTask>> {
    let inputs = self.resolve_inputs()?;
    let formats = self
      .options
      .formats
      .iter()
      .map(|format| Format::parse_with_compress(format))
      .collect::<Result<Vec<_>>>()?;

    Ok(
      inputs
        .iter()
        .flat_map(|input| {
          formats.iter().map(|&(format, compress)| ResolvedTask {
            input: input.clone(),
            format,
            compress,
          })
        })
        .collect(),
    )
  }

  /// Builds in memory, nothing is written and no stats are computed.
  pub async fn generate(&self) -> Result<BundleOutput> {
    self.bundle(false).await
  }

  /// Builds to disk. In watch mode this only returns once every watch session has ended.
  pub async fn write(&self) -> Result<BundleOutput> {
    if self.options.watch {
      return self.watch().await;
    }
    let mut output = self.bundle(true).await?;
    output.stats = Some(StatsReport::from_artifacts(&output.artifacts)?);
    Ok(output)
  }

  fn config_builder(&self) -> ConfigBuilder<'_> {
    ConfigBuilder::new(&self.options, &self.registry, self.package_json.as_ref(), &self.process_cwd)
  }

  async fn bundle(&self, write: bool) -> Result<BundleOutput> {
    let tasks = self.resolve_tasks()?;

    tracing::debug!(tasks = tasks.len(), "building configs");
    let builder = self.config_builder();
    let mut configs = Vec::with_capacity(tasks.len());
    let mut receivers = Vec::with_capacity(tasks.len());
    for task in &tasks {
      let (tx, rx) = unbounded_channel();
      configs.push(builder.build(task, tx)?);
      receivers.push(rx);
    }

    tracing::debug!(write, "executing");
    let engine = &self.engine;
    let assets = try_join_all(configs.into_iter().map(|config| async move {
      // Dropping the config closes the artifact channel of the task.
      if write { engine.write(&config).await } else { engine.generate(&config).await }
    }))
    .await?;

    tracing::debug!("aggregating");
    let mut artifacts = FxIndexMap::default();
    for mut rx in receivers {
      while let Some(record) = rx.recv().await {
        artifacts.insert(record.absolute.clone(), record);
      }
    }

    if artifacts.len() < tasks.len() {
      return Err(Error::filename_conflict(
        tasks.len(),
        artifacts.len(),
        self.options.filename.template(),
      ));
    }

    Ok(BundleOutput {
      assets: assets.into_iter().flatten().collect(),
      artifacts,
      stats: None,
    })
  }

  async fn watch(&self) -> Result<BundleOutput> {
    let tasks = self.resolve_tasks()?;
    let builder = self.config_builder();

    let mut sessions = Vec::with_capacity(tasks.len());
    for task in &tasks {
      // Nothing is aggregated in watch mode, the receiver is dropped right away.
      let (tx, _) = unbounded_channel();
      sessions.push(self.engine.watch(builder.build(task, tx)?)?);
    }

    tracing::debug!(sessions = sessions.len(), "watching");
    let quiet = self.options.quiet;
    let process_cwd = self.process_cwd.clone();
    let handles = sessions
      .into_iter()
      .map(|session| tokio::spawn(report_watch_events(session, process_cwd.clone(), quiet)))
      .collect::<Vec<_>>();
    for result in join_all(handles).await {
      if let Err(err) = result {
        tracing::debug!("watch session panicked: {err}");
      }
    }
    Ok(BundleOutput::default())
  }
}

#[allow(clippy::print_stdout)]
async fn report_watch_events(mut session: WatchSession, process_cwd: PathBuf, quiet: bool) {
  while let Some(event) = session.next_event().await {
    match event {
      WatchEvent::BundleEnd { input, output, duration } => {
        tracing::debug!(?duration, "rebuilt");
        if !quiet {
          println!(
            "{} {} {}",
            Colour::Cyan.paint(display_path(&input, &process_cwd)),
            Colour::White.dimmed().paint("→"),
            Colour::Green.paint(display_path(&output, &process_cwd)),
          );
        }
      }
      WatchEvent::Error(err) => handle_error(&err),
      WatchEvent::Fatal(err) => {
        handle_error(&err);
        return;
      }
      event => tracing::debug!(?event, "watch event"),
    }
  }
}

fn display_path(path: &Path, process_cwd: &Path) -> String {
  let path = if path.is_absolute() { path.relative(process_cwd) } else { path.to_path_buf() };
  path.display().to_string()
}

#[cfg(test)]
mod tests {
  use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
  };

  use tidepack_common::{BuildOptions, EngineConfig, OutputAsset, WatchEvent, WatchSession};
  use tidepack_error::{Error, Result};
  use tidepack_plugin::{GenerateBundleArgs, PluginContext};

  use super::Tidepack;
  use crate::{
    engine::{Engine, SingleEntryEngine},
    plugin_loader::PluginRegistry,
  };

  /// Hands every output straight to the plugins and remembers what it was asked to build.
  #[derive(Debug, Default)]
  struct RecordingEngine {
    calls: Mutex<Vec<PathBuf>>,
    // Watch sessions stay open until their engine is dropped.
    watchers: Mutex<Vec<tokio::sync::mpsc::UnboundedSender<WatchEvent>>>,
  }

  impl RecordingEngine {
    async fn run(&self, config: &EngineConfig) -> Result<Vec<OutputAsset>> {
      let file = config.output.file.clone();
      self.calls.lock().unwrap().push(file.clone());
      let code = format!("// {}\n", config.input.input.display());
      let ctx = PluginContext::default();
      for plugin in &config.input.plugins {
        plugin
          .generate_bundle(
            &ctx,
            &GenerateBundleArgs { input: &config.input.input, file: &file, code: &code },
          )
          .await?;
      }
      Ok(vec![OutputAsset { file, content: code }])
    }

    fn calls(&self) -> Vec<PathBuf> {
      self.calls.lock().unwrap().clone()
    }
  }

  #[async_trait::async_trait]
  impl Engine for RecordingEngine {
    async fn generate(&self, config: &EngineConfig) -> Result<Vec<OutputAsset>> {
      self.run(config).await
    }

    async fn write(&self, config: &EngineConfig) -> Result<Vec<OutputAsset>> {
      self.run(config).await
    }

    /// A failed rebuild, a successful one, then a watcher failure.
    fn watch(&self, config: EngineConfig) -> Result<WatchSession> {
      let input = config.input.input.clone();
      let output = config.output.file.clone();
      self.calls.lock().unwrap().push(output.clone());

      let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
      for event in [
        WatchEvent::Start,
        WatchEvent::BundleStart { input: input.clone() },
        WatchEvent::Error(Error::engine(anyhow::anyhow!("Unexpected token"))),
        WatchEvent::End,
        WatchEvent::Start,
        WatchEvent::BundleStart { input: input.clone() },
        WatchEvent::BundleEnd { input, output, duration: Duration::from_millis(3) },
        WatchEvent::End,
        WatchEvent::Fatal(Error::engine(anyhow::anyhow!("File watcher failed"))),
      ] {
        tx.send(event).unwrap();
      }
      self.watchers.lock().unwrap().push(tx);
      Ok(WatchSession::new(rx, ()))
    }
  }

  fn project(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
      let path = dir.path().join(file);
      std::fs::create_dir_all(path.parent().unwrap()).unwrap();
      std::fs::write(path, "export default 1;\n").unwrap();
    }
    dir
  }

  fn tidepack(dir: &Path, options: BuildOptions) -> (Tidepack, Arc<RecordingEngine>) {
    let engine = Arc::new(RecordingEngine::default());
    let tidepack = Tidepack::with_engine(
      BuildOptions { cwd: Some(dir.to_path_buf()), ..options },
      Arc::clone(&engine) as _,
      PluginRegistry::with_builtins(),
    )
    .unwrap();
    (tidepack, engine)
  }

  #[tokio::test]
  async fn test_no_matched_files_fails_before_the_engine() {
    let dir = project(&["src/main.ts"]);
    let (tidepack, engine) = tidepack(dir.path(), BuildOptions::default());

    let error = tidepack.write().await.unwrap_err();
    assert_eq!(error.code(), "NO_MATCHED_FILES");
    assert!(error.is_config_error());
    assert!(engine.calls().is_empty());
  }

  #[tokio::test]
  async fn test_unsupported_format_fails_before_the_engine() {
    let dir = project(&["src/index.js"]);
    let (tidepack, engine) = tidepack(
      dir.path(),
      BuildOptions { formats: Some(vec!["cjs".into(), "iife".into()]), ..BuildOptions::default() },
    );

    let error = tidepack.generate().await.unwrap_err();
    assert_eq!(error.code(), "UNSUPPORTED_FORMAT");
    assert!(engine.calls().is_empty());
  }

  #[tokio::test]
  async fn test_one_artifact_per_input_and_format() {
    let dir = project(&["src/a.js", "src/b.js"]);
    let (tidepack, engine) = tidepack(
      dir.path(),
      BuildOptions {
        input: Some(vec!["src/*.js".into()]),
        formats: Some(vec!["cjs".into(), "es".into(), "umd-min".into()]),
        ..BuildOptions::default()
      },
    );

    assert_eq!(tidepack.resolve_tasks().unwrap().len(), 6);

    let output = tidepack.write().await.unwrap();
    assert_eq!(engine.calls().len(), 6);
    assert_eq!(output.artifacts.len(), 6);
    assert_eq!(output.assets.len(), 6);
    assert!(output.artifacts.contains_key(&dir.path().join("dist").join("a.cjs.js")));
    assert!(output.artifacts.contains_key(&dir.path().join("dist").join("b.m.js")));
    assert!(output.artifacts.contains_key(&dir.path().join("dist").join("b.min.js")));

    let stats = output.stats.unwrap();
    let files = stats.rows.iter().map(|row| row.file.as_str()).collect::<Vec<_>>();
    assert_eq!(
      files,
      vec![
        "dist/a.cjs.js",
        "dist/a.m.js",
        "dist/a.min.js",
        "dist/b.cjs.js",
        "dist/b.m.js",
        "dist/b.min.js"
      ]
    );
  }

  #[tokio::test]
  async fn test_write_in_watch_mode_reports_until_fatal() {
    let dir = project(&["src/index.js"]);
    let (tidepack, engine) = tidepack(
      dir.path(),
      BuildOptions {
        formats: Some(vec!["cjs".into(), "es".into()]),
        watch: Some(true),
        quiet: Some(true),
        ..BuildOptions::default()
      },
    );

    // The sessions never close on their own, so this only returns after both were fatal.
    let output = tokio::time::timeout(Duration::from_secs(10), tidepack.write())
      .await
      .expect("watch mode should stop after a fatal event")
      .unwrap();
    assert!(output.artifacts.is_empty());
    assert!(output.stats.is_none());
    assert_eq!(
      engine.calls(),
      vec![dir.path().join("dist").join("index.cjs.js"), dir.path().join("dist").join("index.m.js")]
    );
    assert!(!dir.path().join("dist").exists());
  }

  #[tokio::test]
  async fn test_generate_has_no_stats() {
    let dir = project(&["src/index.js"]);
    let (tidepack, _) = tidepack(dir.path(), BuildOptions::default());
    let output = tidepack.generate().await.unwrap();
    assert_eq!(output.artifacts.len(), 1);
    assert!(output.stats.is_none());
  }

  #[tokio::test]
  async fn test_filename_conflict() {
    let dir = project(&["src/index.js"]);
    let (tidepack, engine) = tidepack(
      dir.path(),
      BuildOptions {
        filename: Some("bundle.js".into()),
        formats: Some(vec!["cjs".into(), "es".into()]),
        ..BuildOptions::default()
      },
    );

    let error = tidepack.write().await.unwrap_err();
    assert_eq!(error.code(), "FILENAME_CONFLICT");
    assert!(error.is_config_error());
    assert!(error.to_string().contains("Expected 2 output files but only got 1"));
    assert_eq!(engine.calls().len(), 2);
  }

  #[tokio::test]
  async fn test_missing_plugin_fails_before_the_engine() {
    let dir = project(&["src/index.js"]);
    let (tidepack, engine) = tidepack(
      dir.path(),
      BuildOptions { plugins: vec!["vue".into()], ..BuildOptions::default() },
    );

    let error = tidepack.write().await.unwrap_err();
    assert_eq!(error.code(), "MISSING_PLUGIN");
    assert!(error.to_string().contains("tidepack-plugin-vue"));
    assert!(engine.calls().is_empty());
  }

  #[tokio::test]
  async fn test_write_with_reference_engine() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(
      dir.path().join("package.json"),
      r#"{ "name": "my-lib", "version": "0.1.0", "license": "MIT" }"#,
    )
    .unwrap();
    std::fs::write(
      dir.path().join("src").join("index.js"),
      "#!/usr/bin/env node\nconst answer = process.env.ANSWER;\nexport default answer;\n",
    )
    .unwrap();

    let tidepack = Tidepack::with_engine(
      BuildOptions {
        cwd: Some(dir.path().to_path_buf()),
        formats: Some(vec!["cjs".into(), "umd-min".into()]),
        banner: Some(tidepack_common::Banner::Enabled(true)),
        env: Some([("ANSWER".to_string(), serde_json::json!(42))].into_iter().collect()),
        ..BuildOptions::default()
      },
      Arc::new(SingleEntryEngine),
      PluginRegistry::with_builtins(),
    )
    .unwrap();

    let output = tidepack.write().await.unwrap();
    assert_eq!(output.artifacts.len(), 2);

    let cjs = std::fs::read_to_string(dir.path().join("dist").join("index.cjs.js")).unwrap();
    assert!(cjs.starts_with("#!/usr/bin/env node\n/*!\n * my-lib v0.1.0"), "{cjs}");
    assert!(cjs.contains("42"), "{cjs}");

    let min = std::fs::read_to_string(dir.path().join("dist").join("index.min.js")).unwrap();
    assert!(min.starts_with("#!/usr/bin/env node\n/*!"), "{min}");
    assert!(min.len() < cjs.len());
  }
}
