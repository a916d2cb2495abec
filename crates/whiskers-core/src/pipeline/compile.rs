/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compile stage.
//!
//! The base compiler finalizes one parsed program into a [`CompiledProgram`].
//! The document compiler decorates it: after delegating the body, it
//! compiles the attached front-matter program through its own private
//! compiler instance and attaches the result — plus the body-begin offset —
//! to the output artifact. Front-matter programs are rendered later through
//! an isolated environment, so body helpers and partials never collide with
//! them.

use crate::artifact::{CompiledProgram, CompiledTemplate};
use crate::error::WhiskersResult;
use crate::pipeline::parse::{ParsedDocument, Program};

/// The per-program compile seam.
pub trait ProgramCompiler {
    fn compile_program(&self, program: Program) -> WhiskersResult<CompiledProgram>;
}

/// Base compiler: packages the host engine's tree as an executable program.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineCompiler;

impl ProgramCompiler for EngineCompiler {
    fn compile_program(&self, program: Program) -> WhiskersResult<CompiledProgram> {
        Ok(CompiledProgram {
            template: program.template,
            source: program.source,
        })
    }
}

/// Decorating compiler: body via the inner stage, front matter via a
/// private instance of the same stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCompiler<C: ProgramCompiler = EngineCompiler> {
    inner: C,
    front_matter_inner: C,
}

impl<C: ProgramCompiler> DocumentCompiler<C> {
    pub fn with_inner(inner: C, front_matter_inner: C) -> Self {
        DocumentCompiler {
            inner,
            front_matter_inner,
        }
    }

    /// Compile a parsed document into the annotated artifact. A failure in
    /// either sub-program fails the whole call; no partial artifact exists.
    pub fn compile(&self, document: ParsedDocument) -> WhiskersResult<CompiledTemplate> {
        let body = self.inner.compile_program(document.body)?;
        let front_matter = match document.front_matter {
            Some(program) => Some(self.front_matter_inner.compile_program(program)?),
            None => None,
        };
        Ok(CompiledTemplate {
            body,
            front_matter,
            body_begin: document.body_begin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{CompileOptions, DocumentParser};
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> CompiledTemplate {
        let parser: DocumentParser = DocumentParser::default();
        let compiler: DocumentCompiler = DocumentCompiler::default();
        let document = parser.parse(source, &CompileOptions::default()).unwrap();
        compiler.compile(document).unwrap()
    }

    #[test]
    fn annotation_is_absent_without_header() {
        let compiled = compile("plain body");
        assert!(compiled.front_matter.is_none());
        assert_eq!(compiled.body_begin, 1);
    }

    #[test]
    fn annotation_carries_front_matter_and_offset() {
        let compiled = compile("---\na: 1\n---\nbody");
        assert_eq!(compiled.front_matter.unwrap().source(), "a: 1\n");
        assert_eq!(compiled.body_begin, 4);
        assert_eq!(compiled.body.source(), "body");
    }
}
