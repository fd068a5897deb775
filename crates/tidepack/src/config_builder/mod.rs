mod pipeline;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use serde_json::{Value, json};
use sugar_path::SugarPath;
use tidepack_common::{
  ArtifactRecord, EngineConfig, Format, InputConfig, NormalizedBuildOptions, OutputConfig,
  PackageJson, ResolvedTask, insert_min_marker,
};
use tidepack_error::{Error, Result};
use tidepack_plugin::{SharedPlugin, Warning, WarningHandler};
use tidepack_utils::{
  camel_case::camel_case, indexmap::FxIndexSet, json_merge::merge_json, path_ext::PathExt,
};
use tokio::sync::mpsc::UnboundedSender;

pub use self::pipeline::PipelineBuilder;
use crate::{
  plugin_loader::{PluginRegistry, from_options, load_plugins},
  plugins::{
    AliasPlugin, CollectorPlugin, EnvPlugin, JsonPlugin, MinifyPlugin, MinifyPluginOptions,
    NodeResolvePlugin, ReplacePlugin, ShebangPlugin,
  },
};

/// Turns a [`ResolvedTask`] into the [`EngineConfig`] the engine consumes.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder<'a> {
  options: &'a NormalizedBuildOptions,
  registry: &'a PluginRegistry,
  package_json: Option<&'a PackageJson>,
  /// Task inputs are relative to this directory.
  process_cwd: &'a Path,
}

impl<'a> ConfigBuilder<'a> {
  pub fn new(
    options: &'a NormalizedBuildOptions,
    registry: &'a PluginRegistry,
    package_json: Option<&'a PackageJson>,
    process_cwd: &'a Path,
  ) -> Self {
    Self { options, registry, package_json, process_cwd }
  }

  /// `[name]` is the input's file stem unless `name` is set, `[suffix]` comes from the format.
  pub fn output_file(&self, task: &ResolvedTask) -> PathBuf {
    let name = match &self.options.name {
      Some(name) => name.clone(),
      None => task.input.file_stem_str().into_owned(),
    };
    let filename =
      self.options.filename.render(&[("name", name.as_str()), ("suffix", task.format.suffix())]);
    let file = Path::new(&filename).absolutize_with(&self.options.out_dir);
    if task.compress { insert_min_marker(&file) } else { file }
  }

  pub fn build(
    &self,
    task: &ResolvedTask,
    tx: UnboundedSender<ArtifactRecord>,
  ) -> Result<EngineConfig> {
    let options = self.options;
    let file = self.output_file(task);
    let input = task.input.absolutize_with(self.process_cwd);
    let inline = options.inline.unwrap_or_else(|| task.format.is_umd());

    let user_plugins = load_plugins(self.registry, options, &file)?;
    let transpiler = self.transpiler(task.format)?;
    let minify = if task.compress { Some(self.minify_plugin(task.format)?) } else { None };
    let env = if options.env.is_empty() {
      None
    } else {
      Some(EnvPlugin::new(&options.env).map_err(|err| {
        Error::invalid_options(format!("\"env\" must contain JSON values: {err}"))
      })?)
    };
    let replace = if options.replace.is_empty() {
      None
    } else {
      Some(ReplacePlugin::new(&options.replace).map_err(|err| {
        Error::invalid_options(format!("\"replace\" keys could not be compiled: {err}"))
      })?)
    };
    let collector = CollectorPlugin::new(
      tx,
      file.relative(&options.cwd).to_slash_string(),
      task.input.clone(),
      task.format,
      task.compress,
    );

    let plugins = PipelineBuilder::new()
      .stage(ShebangPlugin::default())
      .stages(user_plugins)
      .shared_stage(transpiler)
      .stage_if(inline, || NodeResolvePlugin::new(options.cwd.clone()))
      .stage(JsonPlugin)
      .optional_stage(minify)
      .stage_if(!options.alias.is_empty(), || AliasPlugin::new(&options.alias, &options.cwd))
      .optional_stage(replace)
      .stage(collector)
      .optional_stage(env)
      .build();

    tracing::debug!(
      input = %task.input.display(),
      format = %task.format,
      compress = task.compress,
      file = %file.display(),
      "built engine config"
    );

    Ok(EngineConfig {
      input: InputConfig {
        input,
        external: self.externals(),
        plugins,
        on_warn: warning_handler(options.quiet),
      },
      output: OutputConfig {
        format: task.format,
        globals: options.globals.clone(),
        name: if task.format.is_umd() { self.module_name() } else { None },
        file,
        banner: options.banner.clone(),
        exports: options.exports,
        sourcemap: options.map.unwrap_or(task.compress),
      },
    })
  }

  /// The `js` plugin with format aware defaults under the user's options for it.
  fn transpiler(&self, format: Format) -> Result<SharedPlugin> {
    let options = self.options;
    let mut transpiler_options = json!({
      "jsx": options.jsx,
      "target": if format.is_es() { "esnext" } else { "es2015" },
      "sourceType": "module",
    });
    if let Some(user_options) = options.plugin_options(&options.js) {
      merge_json(&mut transpiler_options, user_options.clone());
    }
    self.registry.instantiate(&options.js, transpiler_options)
  }

  /// `uglifyEs` configures the minifier for `es` outputs, `uglify` for the others.
  fn minify_plugin(&self, format: Format) -> Result<MinifyPlugin> {
    let (key, raw) = if format.is_es() {
      ("uglifyEs", &self.options.uglify_es)
    } else {
      ("uglify", &self.options.uglify)
    };
    let minify_options = match raw {
      Some(raw @ Value::Object(_)) => from_options::<MinifyPluginOptions>(raw.clone())
        .map_err(|err| Error::invalid_options(format!("\"{key}\": {err}")))?,
      _ => MinifyPluginOptions::default(),
    };
    Ok(MinifyPlugin::new(&minify_options, self.options.banner.clone()))
  }

  /// User externals followed by the keys of `globals`. Local paths are made absolute.
  pub fn externals(&self) -> Vec<String> {
    let options = self.options;
    options
      .externals
      .iter()
      .chain(options.globals.keys())
      .map(|external| {
        if Path::new(external).is_path_like_specifier() {
          Path::new(external).absolutize_with(&options.cwd).to_slash_string()
        } else {
          external.clone()
        }
      })
      .collect::<FxIndexSet<_>>()
      .into_iter()
      .collect()
  }

  /// `moduleName`, then the manifest's `moduleName`, then the camel cased manifest `name`.
  pub fn module_name(&self) -> Option<String> {
    if let Some(module_name) = &self.options.module_name {
      return Some(module_name.clone());
    }
    let package_json = self.package_json?;
    package_json
      .module_name
      .clone()
      .or_else(|| package_json.name.as_deref().map(camel_case))
  }
}

pub fn should_report(warning: &Warning, quiet: bool) -> bool {
  !quiet && !matches!(warning.code, Warning::UNRESOLVED_IMPORT | Warning::THIS_IS_UNDEFINED)
}

pub fn warning_handler(quiet: bool) -> WarningHandler {
  Arc::new(move |warning: &Warning| {
    if should_report(warning, quiet) {
      tracing::warn!(code = warning.code, "{warning}");
    }
  })
}

#[cfg(test)]
mod tests {
  use std::path::{Path, PathBuf};

  use serde_json::json;
  use tidepack_common::{BuildOptions, Format, PackageJson, ResolvedTask};
  use tidepack_plugin::Warning;

  use super::{ConfigBuilder, should_report};
  use crate::{plugin_loader::PluginRegistry, utils::normalize_options::normalize_options};

  fn task(input: &str, format: Format, compress: bool) -> ResolvedTask {
    ResolvedTask { input: PathBuf::from(input), format, compress }
  }

  fn plugin_names(config: &tidepack_common::EngineConfig) -> Vec<String> {
    config.input.plugins.iter().map(|plugin| plugin.name().into_owned()).collect()
  }

  #[test]
  fn test_output_file() {
    let options = normalize_options(BuildOptions::default(), Path::new("/work"), None);
    let registry = PluginRegistry::with_builtins();
    let builder = ConfigBuilder::new(&options, &registry, None, Path::new("/work"));

    assert_eq!(
      builder.output_file(&task("src/index.js", Format::Cjs, false)),
      Path::new("/work/dist/index.cjs.js")
    );
    assert_eq!(
      builder.output_file(&task("src/index.js", Format::Cjs, true)),
      Path::new("/work/dist/index.cjs.min.js")
    );
    assert_eq!(
      builder.output_file(&task("src/index.js", Format::Es, false)),
      Path::new("/work/dist/index.m.js")
    );
    assert_eq!(
      builder.output_file(&task("src/index.js", Format::Umd, true)),
      Path::new("/work/dist/index.min.js")
    );
  }

  #[test]
  fn test_output_file_with_name_override() {
    let options = normalize_options(
      BuildOptions {
        name: Some("vue".into()),
        filename: Some("[name].[format].js".into()),
        ..BuildOptions::default()
      },
      Path::new("/work"),
      None,
    );
    let registry = PluginRegistry::with_builtins();
    let builder = ConfigBuilder::new(&options, &registry, None, Path::new("/work"));
    assert_eq!(
      builder.output_file(&task("src/main.js", Format::Es, false)),
      Path::new("/work/dist/vue.[format].js")
    );
  }

  #[test]
  fn test_pipeline_order() {
    let mut raw = BuildOptions {
      alias: Some([("@".to_string(), "./src".to_string())].into_iter().collect()),
      replace: Some([("__VERSION__".to_string(), "\"1.0.0\"".to_string())].into_iter().collect()),
      env: Some([("NODE_ENV".to_string(), json!("production"))].into_iter().collect()),
      plugins: vec!["replace".into()],
      ..BuildOptions::default()
    };
    raw.plugin_options.insert("replace".to_string(), json!({ "DEBUG": "false" }));
    let options = normalize_options(raw, Path::new("/work"), None);
    let registry = PluginRegistry::with_builtins();
    let builder = ConfigBuilder::new(&options, &registry, None, Path::new("/work"));

    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let config = builder.build(&task("src/index.js", Format::Umd, true), tx).unwrap();
    assert_eq!(
      plugin_names(&config),
      vec![
        "shebang",
        "replace",
        "oxc",
        "node-resolve",
        "json",
        "minify",
        "alias",
        "replace",
        "collector",
        "env"
      ]
    );

    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let config = builder.build(&task("src/index.js", Format::Cjs, false), tx).unwrap();
    assert_eq!(
      plugin_names(&config),
      vec!["shebang", "replace", "oxc", "json", "alias", "replace", "collector", "env"]
    );
  }

  #[test]
  fn test_minimal_pipeline() {
    let options = normalize_options(BuildOptions::default(), Path::new("/work"), None);
    let registry = PluginRegistry::with_builtins();
    let builder = ConfigBuilder::new(&options, &registry, None, Path::new("/work"));
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let config = builder.build(&task("src/index.js", Format::Es, false), tx).unwrap();

    assert_eq!(plugin_names(&config), vec!["shebang", "oxc", "json", "collector"]);
    assert_eq!(config.input.input, Path::new("/work/src/index.js"));
    assert_eq!(config.output.file, Path::new("/work/dist/index.m.js"));
    assert_eq!(config.output.name, None);
    assert!(!config.output.sourcemap);
  }

  #[test]
  fn test_explicit_inline_and_map() {
    let options = normalize_options(
      BuildOptions { inline: Some(true), map: Some(false), ..BuildOptions::default() },
      Path::new("/work"),
      None,
    );
    let registry = PluginRegistry::with_builtins();
    let builder = ConfigBuilder::new(&options, &registry, None, Path::new("/work"));
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let config = builder.build(&task("src/index.js", Format::Cjs, true), tx).unwrap();

    assert!(plugin_names(&config).contains(&"node-resolve".to_string()));
    assert!(!config.output.sourcemap);
  }

  #[test]
  fn test_unknown_transpiler() {
    let options = normalize_options(
      BuildOptions { js: Some("buble".into()), ..BuildOptions::default() },
      Path::new("/work"),
      None,
    );
    let registry = PluginRegistry::with_builtins();
    let builder = ConfigBuilder::new(&options, &registry, None, Path::new("/work"));
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let error = builder.build(&task("src/index.js", Format::Cjs, false), tx).unwrap_err();
    assert_eq!(error.code(), "MISSING_PLUGIN");
    assert!(error.to_string().contains("tidepack-plugin-buble"));
  }

  #[test]
  fn test_externals() {
    let options = normalize_options(
      BuildOptions {
        externals: Some(vec!["react".into(), "./src/local.js".into(), "react".into()]),
        globals: Some(
          [("vue".to_string(), "Vue".to_string()), ("react".to_string(), "React".to_string())]
            .into_iter()
            .collect(),
        ),
        ..BuildOptions::default()
      },
      Path::new("/work"),
      None,
    );
    let registry = PluginRegistry::with_builtins();
    let builder = ConfigBuilder::new(&options, &registry, None, Path::new("/work"));
    assert_eq!(builder.externals(), vec!["react", "/work/src/local.js", "vue"]);
  }

  #[test]
  fn test_module_name() {
    let package_json = PackageJson {
      name: Some("my-lib".into()),
      ..PackageJson::default()
    };
    let registry = PluginRegistry::with_builtins();

    let options = normalize_options(BuildOptions::default(), Path::new("/work"), None);
    let builder = ConfigBuilder::new(&options, &registry, Some(&package_json), Path::new("/work"));
    assert_eq!(builder.module_name().as_deref(), Some("myLib"));

    let with_manifest_name =
      PackageJson { module_name: Some("MyLib".into()), ..package_json.clone() };
    let builder =
      ConfigBuilder::new(&options, &registry, Some(&with_manifest_name), Path::new("/work"));
    assert_eq!(builder.module_name().as_deref(), Some("MyLib"));

    let options = normalize_options(
      BuildOptions { module_name: Some("Explicit".into()), ..BuildOptions::default() },
      Path::new("/work"),
      None,
    );
    let builder =
      ConfigBuilder::new(&options, &registry, Some(&with_manifest_name), Path::new("/work"));
    assert_eq!(builder.module_name().as_deref(), Some("Explicit"));

    let builder = ConfigBuilder::new(&options, &registry, None, Path::new("/work"));
    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
    let config = builder.build(&task("src/index.js", Format::Cjs, false), tx).unwrap();
    assert_eq!(config.output.name, None);
  }

  #[test]
  fn test_warning_filter() {
    let unresolved = Warning::new(Warning::UNRESOLVED_IMPORT, "cannot resolve \"lodash\"");
    let this_undefined = Warning::new(Warning::THIS_IS_UNDEFINED, "`this` is undefined");
    let plugin = Warning::new(Warning::PLUGIN_WARNING, "something odd");

    assert!(!should_report(&unresolved, false));
    assert!(!should_report(&this_undefined, false));
    assert!(should_report(&plugin, false));
    assert!(!should_report(&plugin, true));
  }
}
