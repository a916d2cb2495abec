/*
 * parse.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Parse stage.
//!
//! The base parser turns one sub-program's text into the host engine's
//! syntax tree. The document parser decorates it: it splits the document
//! first, parses body and front matter independently, and carries the
//! front-matter tree and the body-begin offset in an explicit wrapper
//! struct rather than on the host tree.

use handlebars::template::Template;

use crate::error::WhiskersResult;
use crate::frontmatter;
use crate::pipeline::CompileOptions;

/// A parsed sub-program: the host engine's tree plus the source it came
/// from (kept for the codegen stage).
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) template: Template,
    pub(crate) source: String,
}

/// A parsed document: the body program, the optional front-matter program,
/// and the 1-indexed line at which the body began.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub body: Program,
    pub front_matter: Option<Program>,
    pub body_begin: usize,
}

/// The per-program parse seam.
pub trait ProgramParser {
    fn parse_program(&self, source: &str, name: Option<&str>) -> WhiskersResult<Program>;
}

/// Base parser: the host engine's own parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineParser;

impl ProgramParser for EngineParser {
    fn parse_program(&self, source: &str, name: Option<&str>) -> WhiskersResult<Program> {
        let mut template = Template::compile(source)?;
        template.name = name.map(str::to_owned);
        Ok(Program {
            template,
            source: source.to_owned(),
        })
    }
}

/// Decorating parser: document splitting plus dual-program parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentParser<P: ProgramParser = EngineParser> {
    inner: P,
}

impl<P: ProgramParser> DocumentParser<P> {
    pub fn with_inner(inner: P) -> Self {
        DocumentParser { inner }
    }

    /// Split and parse. Parse errors from either sub-program propagate
    /// unchanged; nothing partial is returned.
    pub fn parse(&self, source: &str, options: &CompileOptions) -> WhiskersResult<ParsedDocument> {
        let split = frontmatter::split(source);
        let body = self
            .inner
            .parse_program(split.body, options.name.as_deref())?;
        let front_matter = match split.front_matter {
            Some(text) => Some(self.inner.parse_program(text, None)?),
            None => None,
        };
        Ok(ParsedDocument {
            body,
            front_matter,
            body_begin: split.body_begin,
        })
    }
}
