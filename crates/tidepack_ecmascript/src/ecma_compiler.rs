use oxc::{
  allocator::Allocator,
  codegen::{Codegen, CodegenOptions},
  minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions},
  parser::Parser,
  span::SourceType,
};

#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
pub struct MinifyOptions {
  pub mangle: bool,
  pub compress: bool,
  pub drop_console: bool,
  pub drop_debugger: bool,
}

impl Default for MinifyOptions {
  fn default() -> Self {
    Self { mangle: true, compress: true, drop_console: false, drop_debugger: true }
  }
}

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// Parses `source` and prints it back, failing on any syntax error.
  pub fn reprint(source: &str, source_type: SourceType) -> anyhow::Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
      let messages = ret.errors.iter().map(ToString::to_string).collect::<Vec<_>>();
      anyhow::bail!("Parse failed: {}", messages.join("\n"));
    }
    Ok(Codegen::new().build(&ret.program).code)
  }

  pub fn minify(source_text: &str, options: &MinifyOptions) -> anyhow::Result<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();

    let ret = Parser::new(&allocator, source_text, source_type).parse();
    if !ret.errors.is_empty() {
      let messages = ret.errors.iter().map(ToString::to_string).collect::<Vec<_>>();
      anyhow::bail!("Minify failed: {}", messages.join("\n"));
    }
    let program = allocator.alloc(ret.program);

    let ret = Minifier::new(MinifierOptions {
      mangle: options.mangle.then(MangleOptions::default),
      compress: options.compress.then(|| CompressOptions {
        drop_console: options.drop_console,
        drop_debugger: options.drop_debugger,
        ..CompressOptions::default()
      }),
    })
    .build(&allocator, program);

    // Comments are dropped, legal ones included. Banners are added back by the caller.
    let ret = Codegen::new()
      .with_options(CodegenOptions::minify())
      .with_scoping(ret.scoping)
      .build(program);

    Ok(ret.code)
  }
}

#[test]
fn basic_test() {
  let code = EcmaCompiler::reprint("const a = 1;", SourceType::mjs()).unwrap();
  assert_eq!(code, "const a = 1;\n");
}

#[test]
fn reprint_reports_syntax_errors() {
  assert!(EcmaCompiler::reprint("const = ;", SourceType::mjs()).is_err());
}

#[test]
fn minify_shrinks_code() {
  let source = "export function add(first, second) {\n  return first + second;\n}\n";
  let minified = EcmaCompiler::minify(source, &MinifyOptions::default()).unwrap();
  assert!(minified.len() < source.len());
  assert!(minified.contains("export"));
}
