/*
 * environment.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Host-engine environments.
//!
//! An [`Environment`] owns one host-engine registry with the whiskers helper
//! library pre-registered. Callers may add their own helpers and partials on
//! top. Front-matter sub-programs always execute in a separate, isolated
//! environment so caller additions never leak into them.

use handlebars::{Handlebars, HelperDef};

use crate::error::WhiskersResult;
use crate::helpers;

/// A host-engine registry with the whiskers helpers registered.
pub struct Environment {
    registry: Handlebars<'static>,
}

impl Environment {
    /// A fresh environment with all whiskers helpers and the engine's
    /// default (HTML) escaping.
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        helpers::register_all(&mut registry);
        Environment { registry }
    }

    /// An isolated environment, independent of every other instance.
    ///
    /// Equivalent to [`Environment::new`]; the separate constructor marks
    /// call sites whose isolation is load-bearing.
    pub fn isolated() -> Self {
        Environment::new()
    }

    /// Register an additional helper.
    pub fn register_helper(&mut self, name: &str, def: Box<dyn HelperDef + Send + Sync>) {
        self.registry.register_helper(name, def);
    }

    /// Register a partial template.
    pub fn register_partial(&mut self, name: &str, source: &str) -> WhiskersResult<()> {
        self.registry.register_partial(name, source)?;
        Ok(())
    }

    /// Toggle the engine's strict mode (missing values error instead of
    /// rendering empty).
    pub fn set_strict_mode(&mut self, strict: bool) {
        self.registry.set_strict_mode(strict);
    }

    pub(crate) fn registry(&self) -> &Handlebars<'static> {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Handlebars<'static> {
        &mut self.registry
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_are_preregistered() {
        let env = Environment::new();
        let out = env
            .registry()
            .render_template("{{uppercase \"abc\"}}", &serde_json::json!({}))
            .unwrap();
        assert_eq!(out, "ABC");
    }

    #[test]
    fn environments_are_independent() {
        let mut a = Environment::new();
        let b = Environment::isolated();
        a.register_partial("p", "from a").unwrap();

        let ctx = serde_json::json!({});
        assert_eq!(a.registry().render_template("{{> p}}", &ctx).unwrap(), "from a");
        assert!(b.registry().render_template("{{> p}}", &ctx).is_err());
    }
}
