/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The whiskers helper library.
//!
//! Helpers are registered onto a host-engine registry by [`register_all`];
//! the [`crate::Environment`] does this for every environment it creates.

mod colors;
mod misc;
mod theme;

use handlebars::Handlebars;

use crate::unquote::UnquoteHelper;

/// Register every whiskers helper (colors, strings/numbers, theme selection,
/// and the raw-value tunnel encoder) onto a registry.
pub fn register_all(registry: &mut Handlebars<'static>) {
    colors::register(registry);
    misc::register(registry);
    theme::register(registry);
    registry.register_helper("unquote", Box::new(UnquoteHelper));
}
