/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Front-matter-aware template compilation and themed rendering for whiskers.
//!
//! This crate extends the [`handlebars`] engine so that templates can:
//!
//! - carry a structured front-matter header that is itself a template,
//!   compiled as an independent sub-program and merged into the render
//!   context at render time;
//! - receive an injected color-palette context (`flavors`, `labels`,
//!   `accents` tables plus a per-flavor layer) with defined precedence;
//! - emit raw values through the `unquote` helper, tunneled past the
//!   engine's auto-escaping and decoded in a post-render pass;
//! - use a library of color transform/format helpers.
//!
//! # Architecture
//!
//! Compilation is an explicit three-stage pipeline ([`pipeline`]): a parse
//! stage that splits the document and parses body and front matter as two
//! independent programs, a compile stage that packages them into a
//! [`CompiledTemplate`], and a codegen stage with two output modes (the
//! in-memory artifact, or serialized source text plus a source map with
//! front-matter positions woven in). Each stage is a decorator over a base
//! stage that delegates to the host engine; the host engine's own structures
//! are never mutated — annotations live in explicit wrapper structs.
//!
//! # Example
//!
//! ```rust
//! use whiskers_core::{CompileOptions, RenderOptions, Renderer, WhiskersCompiler};
//! use whiskers_palette::Palette;
//!
//! let compiler = WhiskersCompiler::new();
//! let artifact = compiler
//!     .compile("---\ntitle: Hello {{name}}\n---\n{{title}}", &CompileOptions::default())
//!     .unwrap();
//!
//! let mut renderer = Renderer::new(Palette::builtin());
//! renderer.register_template("greeting", artifact);
//!
//! let mut ctx = serde_json::Map::new();
//! ctx.insert("name".into(), "World".into());
//! let out = renderer.render("greeting", &ctx, &RenderOptions::default()).unwrap();
//! assert_eq!(out, "Hello World");
//! ```

pub mod artifact;
pub mod environment;
pub mod error;
pub mod frontmatter;
pub mod helpers;
pub mod pipeline;
pub mod renderer;
pub mod unquote;

// Re-export main types at crate root
pub use artifact::{CompiledProgram, CompiledTemplate, PrecompiledTemplate};
pub use environment::Environment;
pub use error::{WhiskersError, WhiskersResult};
pub use frontmatter::{split, SplitResult};
pub use pipeline::{
    load_precompiled, CodegenOptions, CompileOptions, GeneratedOutput, WhiskersCompiler,
};
pub use renderer::{RenderOptions, Renderer};
