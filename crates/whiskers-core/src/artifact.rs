/*
 * artifact.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compiled artifacts.
//!
//! Host-engine structures are never annotated in place; front matter and the
//! body-begin offset ride alongside the engine's own program in explicit
//! wrapper structs.

use handlebars::template::Template;
use serde::{Deserialize, Serialize};

use crate::error::{WhiskersError, WhiskersResult};

/// Compiler stamp written into serialized artifacts and checked on load.
pub const COMPILER_VERSION: [u32; 2] = [1, 0];

/// One compiled sub-program (body or front matter): the host engine's
/// program plus the source it came from.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub(crate) template: Template,
    pub(crate) source: String,
}

impl CompiledProgram {
    /// The original source text of this sub-program.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn into_template(self) -> Template {
        self.template
    }
}

/// The body program annotated with its optional front-matter sub-program and
/// the line at which the body started in the original document.
///
/// When no header was present at compile time, `front_matter` is `None` —
/// never a placeholder — and `body_begin` is 1.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    pub body: CompiledProgram,
    pub front_matter: Option<CompiledProgram>,
    pub body_begin: usize,
}

impl CompiledTemplate {
    /// Map a 1-indexed line within the body back to its line in the original
    /// document.
    pub fn original_line(&self, body_line: usize) -> usize {
        self.body_begin + body_line - 1
    }
}

/// The persisted form of a compiled artifact.
///
/// Program text is stored as one string per source line so that the
/// generated artifact text stays line-addressable for source maps. The
/// codegen stage emits this structure itself (to weave in positions);
/// deserialization goes through serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecompiledTemplate {
    pub compiler: [u32; 2],
    #[serde(rename = "bodyBegin")]
    pub body_begin: usize,
    #[serde(rename = "frontMatter", skip_serializing_if = "Option::is_none")]
    pub front_matter: Option<Vec<String>>,
    pub main: Vec<String>,
}

impl PrecompiledTemplate {
    /// Parse serialized artifact text, checking the compiler stamp.
    pub fn from_code(code: &str) -> WhiskersResult<PrecompiledTemplate> {
        let parsed: PrecompiledTemplate = serde_json::from_str(code)?;
        if parsed.compiler != COMPILER_VERSION {
            return Err(WhiskersError::ArtifactVersion {
                found: parsed.compiler,
                expected: COMPILER_VERSION,
            });
        }
        Ok(parsed)
    }

    /// Reconstruct a renderable artifact: both sub-programs are recompiled
    /// from their stored source lines.
    pub fn into_compiled(self) -> WhiskersResult<CompiledTemplate> {
        let body = program_from_lines(&self.main)?;
        let front_matter = match &self.front_matter {
            Some(lines) => Some(program_from_lines(lines)?),
            None => None,
        };
        Ok(CompiledTemplate {
            body,
            front_matter,
            body_begin: self.body_begin,
        })
    }
}

pub(crate) fn split_lines(source: &str) -> Vec<String> {
    source.split('\n').map(str::to_owned).collect()
}

fn program_from_lines(lines: &[String]) -> WhiskersResult<CompiledProgram> {
    let source = lines.join("\n");
    let template = Template::compile(&source)?;
    Ok(CompiledProgram { template, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_lines_round_trips_trailing_newline() {
        let source = "a\nb\n";
        assert_eq!(split_lines(source).join("\n"), source);
        assert_eq!(split_lines("").join("\n"), "");
    }

    #[test]
    fn version_stamp_is_checked() {
        let code = r#"{"compiler": [9, 9], "bodyBegin": 1, "main": [""]}"#;
        let err = PrecompiledTemplate::from_code(code).unwrap_err();
        assert!(matches!(err, WhiskersError::ArtifactVersion { found: [9, 9], .. }));
    }

    #[test]
    fn missing_front_matter_field_loads_as_none() {
        let code = r#"{"compiler": [1, 0], "bodyBegin": 1, "main": ["hello"]}"#;
        let compiled = PrecompiledTemplate::from_code(code)
            .unwrap()
            .into_compiled()
            .unwrap();
        assert!(compiled.front_matter.is_none());
        assert_eq!(compiled.body.source(), "hello");
    }

    #[test]
    fn original_line_offsets_by_body_begin() {
        let compiled = PrecompiledTemplate::from_code(
            r#"{"compiler": [1, 0], "bodyBegin": 4, "frontMatter": ["t: 1", ""], "main": ["x"]}"#,
        )
        .unwrap()
        .into_compiled()
        .unwrap();
        assert_eq!(compiled.original_line(1), 4);
        assert_eq!(compiled.original_line(3), 6);
    }
}
