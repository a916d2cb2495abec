/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template compilation and rendering.

use thiserror::Error;

/// Errors that can occur during whiskers operations.
///
/// Host-engine parse and render errors propagate wrapped but unchanged in
/// classification; the source chain is preserved. Raw-value tunnel decode
/// issues are never errors (they degrade to inline markers and warnings).
#[derive(Debug, Error)]
pub enum WhiskersError {
    /// The host engine rejected a template sub-program.
    #[error("Template parse error: {0}")]
    Parse(#[from] handlebars::TemplateError),

    /// The host engine failed while rendering.
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// A caller-supplied flavor name is not in the palette. Raised before
    /// rendering begins.
    #[error("Unknown flavor: {name}")]
    UnknownFlavor { name: String },

    /// A render was requested for a name that was never registered.
    #[error("Unknown template: {name}")]
    UnknownTemplate { name: String },

    /// Rendered front matter did not parse as structured data.
    #[error("Invalid front matter data: {message}")]
    FrontMatterData { message: String },

    /// A precompiled artifact could not be deserialized.
    #[error("Invalid precompiled artifact: {0}")]
    ArtifactFormat(#[from] serde_json::Error),

    /// A precompiled artifact was produced by an incompatible compiler.
    #[error("Unsupported artifact compiler version {found:?}, expected {expected:?}")]
    ArtifactVersion { found: [u32; 2], expected: [u32; 2] },
}

/// Result type for whiskers operations.
pub type WhiskersResult<T> = Result<T, WhiskersError>;
