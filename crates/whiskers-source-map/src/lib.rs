//! Source mapping for generated whiskers artifacts
//!
//! This crate provides a small source-node tree: generated text is assembled
//! from chunks, each optionally annotated with the position it came from in
//! the original template document. Emitting the tree yields the generated
//! text together with a line/column map back to the original source.
//!
//! The core types are:
//! - [`SourceNode`]: a positioned tree node holding text and child nodes
//! - [`SourceMap`]: the serialized position mappings for one emission
//!
//! # Example
//!
//! ```rust
//! use whiskers_source_map::SourceNode;
//!
//! let root = SourceNode::root();
//! root.borrow_mut().add_text("prefix ");
//! let inner = SourceNode::positioned(1, 0, Some("t.hbs".into()));
//! inner.borrow_mut().add_text("mapped");
//! root.borrow_mut().add_node(inner);
//!
//! let out = SourceNode::emit(&root);
//! assert_eq!(out.code, "prefix mapped");
//! assert_eq!(out.map.mappings[0].generated_column, 7);
//! ```

pub mod map;
pub mod node;

pub use map::{Mapping, SourceMap};
pub use node::{Chunk, Emitted, NodeRef, SourceNode};
