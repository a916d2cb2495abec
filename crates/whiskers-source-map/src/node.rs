//! Positioned source-node trees
//!
//! A [`SourceNode`] is a tree of text chunks. Nodes may be shared between
//! parents (they are reference counted), so position adjustments track
//! visited nodes and touch each node exactly once.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::map::{Mapping, SourceMap};

/// Shared handle to a source node.
pub type NodeRef = Rc<RefCell<SourceNode>>;

/// A chunk of generated output: literal text or a nested node.
#[derive(Debug, Clone)]
pub enum Chunk {
    Text(String),
    Node(NodeRef),
}

/// A node in the generated-output tree.
///
/// `line` and `column` are the position in the *original* document that this
/// node's text came from. Nodes without a position contribute text but no
/// mapping.
#[derive(Debug, Clone, Default)]
pub struct SourceNode {
    /// 1-indexed original line, if known.
    pub line: Option<usize>,
    /// 0-indexed original column, if known.
    pub column: Option<usize>,
    /// Name of the original source, if known.
    pub source: Option<String>,
    pub children: Vec<Chunk>,
}

/// Result of emitting a node tree: the generated text and its map.
#[derive(Debug, Clone)]
pub struct Emitted {
    pub code: String,
    pub map: SourceMap,
}

impl SourceNode {
    /// An unpositioned container node.
    pub fn root() -> NodeRef {
        Rc::new(RefCell::new(SourceNode::default()))
    }

    /// A node positioned at `line`/`column` in `source`.
    pub fn positioned(line: usize, column: usize, source: Option<String>) -> NodeRef {
        Rc::new(RefCell::new(SourceNode {
            line: Some(line),
            column: Some(column),
            source,
            children: Vec::new(),
        }))
    }

    pub fn add_text(&mut self, text: impl Into<String>) {
        self.children.push(Chunk::Text(text.into()));
    }

    pub fn add_node(&mut self, node: NodeRef) {
        self.children.push(Chunk::Node(node));
    }

    /// Reposition `node` so that content generated as if it began at line 1
    /// begins at `first_line` instead, shifting columns by `column_delta`.
    ///
    /// Recurses into nested nodes, offsetting shared nodes exactly once.
    pub fn rebase(node: &NodeRef, first_line: usize, column_delta: usize) {
        let mut visited: HashSet<*const RefCell<SourceNode>> = HashSet::new();
        rebase_inner(node, first_line, column_delta, &mut visited);
    }

    /// Emit the tree: concatenated text plus position mappings.
    pub fn emit(node: &NodeRef) -> Emitted {
        let mut out = Emitted {
            code: String::new(),
            map: SourceMap::default(),
        };
        let mut line = 1usize;
        let mut column = 0usize;
        emit_inner(node, &mut out, &mut line, &mut column);
        out
    }
}

fn rebase_inner(
    node: &NodeRef,
    first_line: usize,
    column_delta: usize,
    visited: &mut HashSet<*const RefCell<SourceNode>>,
) {
    if !visited.insert(Rc::as_ptr(node)) {
        return;
    }
    let mut inner = node.borrow_mut();
    if let Some(line) = inner.line.as_mut() {
        *line += first_line - 1;
    }
    if let Some(column) = inner.column.as_mut() {
        *column += column_delta;
    }
    // Collect child handles first; a child may alias an ancestor.
    let children: Vec<NodeRef> = inner
        .children
        .iter()
        .filter_map(|c| match c {
            Chunk::Node(n) => Some(Rc::clone(n)),
            Chunk::Text(_) => None,
        })
        .collect();
    drop(inner);
    for child in children {
        rebase_inner(&child, first_line, column_delta, visited);
    }
}

fn emit_inner(node: &NodeRef, out: &mut Emitted, line: &mut usize, column: &mut usize) {
    let inner = node.borrow();
    if let (Some(original_line), Some(original_column)) = (inner.line, inner.column) {
        out.map.mappings.push(Mapping {
            generated_line: *line,
            generated_column: *column,
            source: inner.source.clone(),
            original_line,
            original_column,
        });
    }
    for chunk in &inner.children {
        match chunk {
            Chunk::Text(text) => {
                out.code.push_str(text);
                let breaks = text.matches('\n').count();
                if breaks > 0 {
                    *line += breaks;
                    *column = text.len() - text.rfind('\n').map(|i| i + 1).unwrap_or(0);
                } else {
                    *column += text.len();
                }
            }
            Chunk::Node(child) => emit_inner(child, out, line, column),
        }
    }
}
