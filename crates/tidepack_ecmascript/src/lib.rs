mod ecma_compiler;

pub use crate::ecma_compiler::{EcmaCompiler, MinifyOptions};

pub use oxc::span::SourceType;
