/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The dual-program compile pipeline.
//!
//! Three explicit stages — parse, compile, codegen — each a decorator that
//! delegates the per-program work to a base implementation backed by the
//! host engine and adds the front-matter behavior around it. Composition is
//! used instead of subclassing: every stage receives its inner stage by
//! value and never reaches into host-engine internals.

pub mod codegen;
pub mod compile;
pub mod parse;

pub use codegen::{CodeGenerator, CodegenOptions, EngineCodegen, GeneratedOutput, ProgramCodegen};
pub use compile::{DocumentCompiler, EngineCompiler, ProgramCompiler};
pub use parse::{DocumentParser, EngineParser, ParsedDocument, Program, ProgramParser};

use crate::artifact::{CompiledTemplate, PrecompiledTemplate};
use crate::error::WhiskersResult;

/// Options for one compile call.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Template name attached to the body program for error reporting.
    pub name: Option<String>,
    /// Original source name recorded in emitted source maps. Without it,
    /// source-text codegen emits no map.
    pub src_name: Option<String>,
}

/// The assembled pipeline: parse, compile, codegen.
#[derive(Default)]
pub struct WhiskersCompiler {
    parser: DocumentParser,
    compiler: DocumentCompiler,
    codegen: CodeGenerator,
}

impl WhiskersCompiler {
    pub fn new() -> Self {
        WhiskersCompiler::default()
    }

    /// Compile a template document to the in-memory artifact
    /// (structured-object codegen mode).
    pub fn compile(&self, source: &str, options: &CompileOptions) -> WhiskersResult<CompiledTemplate> {
        let document = self.parser.parse(source, options)?;
        let compiled = self.compiler.compile(document)?;
        Ok(self.codegen.emit_object(compiled))
    }

    /// Compile a template document to serialized artifact text plus an
    /// optional source map (source-text codegen mode).
    pub fn precompile(
        &self,
        source: &str,
        options: &CompileOptions,
    ) -> WhiskersResult<GeneratedOutput> {
        let document = self.parser.parse(source, options)?;
        let compiled = self.compiler.compile(document)?;
        let codegen_options = CodegenOptions {
            src_name: options.src_name.clone(),
        };
        Ok(self.codegen.emit_source(&compiled, &codegen_options))
    }
}

/// Load serialized artifact text back into a renderable artifact.
pub fn load_precompiled(code: &str) -> WhiskersResult<CompiledTemplate> {
    PrecompiledTemplate::from_code(code)?.into_compiled()
}
