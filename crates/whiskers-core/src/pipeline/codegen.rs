/*
 * codegen.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Codegen stage.
//!
//! Two output modes. Object mode hands back the in-memory artifact for
//! immediate rendering, front-matter sub-artifact attached. Source-text mode
//! emits the persisted artifact: a JSON object literal whose program fields
//! are line-addressable arrays, assembled from positioned source nodes so
//! the emission also yields a source map back to the original document.
//!
//! Position weaving, front matter present:
//! - the front-matter node is generated as if it began at document line 1
//!   and then moved down past the opening fence line;
//! - the emitted object literal itself maps to `body_begin - 1`;
//! - the body's main node, generated as if the body began at line 1, is
//!   moved down to `body_begin`.
//!
//! Both rebase passes recurse with visited tracking, so shared nodes are
//! offset exactly once. Without front matter the emission is identical to
//! the undecorated base path.

use whiskers_source_map::{Chunk, NodeRef, SourceMap, SourceNode};

use crate::artifact::{split_lines, CompiledProgram, CompiledTemplate, COMPILER_VERSION};

/// Options for source-text emission.
#[derive(Debug, Clone, Default)]
pub struct CodegenOptions {
    /// Source name recorded in the map. `None` suppresses map output.
    pub src_name: Option<String>,
}

/// Serialized artifact text plus its optional source map.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

/// The per-program codegen seam: one sub-program to a positioned node.
pub trait ProgramCodegen {
    fn program_node(&self, program: &CompiledProgram, src_name: Option<&str>) -> NodeRef;
}

/// Base codegen: a program becomes a JSON array of source lines, one
/// positioned node per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineCodegen;

impl ProgramCodegen for EngineCodegen {
    fn program_node(&self, program: &CompiledProgram, src_name: Option<&str>) -> NodeRef {
        let lines = split_lines(&program.source);
        let root = SourceNode::root();
        root.borrow_mut().add_text("[\n");
        let last = lines.len() - 1;
        for (index, line) in lines.iter().enumerate() {
            let node = SourceNode::positioned(index + 1, 0, src_name.map(str::to_owned));
            let literal = serde_json::to_string(line).expect("strings serialize");
            let separator = if index == last { "\n" } else { ",\n" };
            node.borrow_mut().add_text(format!("        {literal}{separator}"));
            root.borrow_mut().add_node(node);
        }
        root.borrow_mut().add_text("    ]");
        root
    }
}

/// Decorating codegen: emits the whole artifact for the top-level
/// compilation unit, weaving the front-matter node and offsets in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator<G: ProgramCodegen = EngineCodegen> {
    inner: G,
}

impl<G: ProgramCodegen> CodeGenerator<G> {
    pub fn with_inner(inner: G) -> Self {
        CodeGenerator { inner }
    }

    /// Structured-object mode: the artifact is used in process as-is; the
    /// front-matter sub-artifact is already attached as its own field.
    pub fn emit_object(&self, compiled: CompiledTemplate) -> CompiledTemplate {
        compiled
    }

    /// Source-text mode: emit the persisted artifact.
    pub fn emit_source(
        &self,
        compiled: &CompiledTemplate,
        options: &CodegenOptions,
    ) -> GeneratedOutput {
        let src_name = options.src_name.as_deref();
        let main_node = self.inner.program_node(&compiled.body, src_name);

        let mut fields: Vec<(&str, Chunk)> = vec![
            (
                "compiler",
                Chunk::Text(format!("[{}, {}]", COMPILER_VERSION[0], COMPILER_VERSION[1])),
            ),
            ("bodyBegin", Chunk::Text(compiled.body_begin.to_string())),
        ];

        let mut root_line = None;
        if let Some(front) = &compiled.front_matter {
            let front_node = self.inner.program_node(front, src_name);
            SourceNode::rebase(&front_node, 2, 0);
            fields.push(("frontMatter", Chunk::Node(front_node)));

            root_line = Some(compiled.body_begin - 1);
            SourceNode::rebase(&main_node, compiled.body_begin, 0);
        }
        fields.push(("main", Chunk::Node(main_node)));

        let object = object_literal(fields, root_line);
        let emitted = SourceNode::emit(&object);
        GeneratedOutput {
            code: emitted.code,
            map: src_name.map(|_| emitted.map),
        }
    }
}

/// The object-literal emission point: named fields, front-matter node
/// injected by the caller as just another field.
fn object_literal(fields: Vec<(&str, Chunk)>, line: Option<usize>) -> NodeRef {
    let root = match line {
        Some(line) => SourceNode::positioned(line, 0, None),
        None => SourceNode::root(),
    };
    let last = fields.len() - 1;
    root.borrow_mut().add_text("{\n");
    for (index, (name, value)) in fields.into_iter().enumerate() {
        root.borrow_mut().add_text(format!("    \"{name}\": "));
        match value {
            Chunk::Text(text) => root.borrow_mut().add_text(text),
            Chunk::Node(node) => root.borrow_mut().add_node(node),
        }
        root.borrow_mut()
            .add_text(if index == last { "\n" } else { ",\n" });
    }
    root.borrow_mut().add_text("}");
    root
}
