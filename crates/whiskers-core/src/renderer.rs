/*
 * renderer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The runtime context composer.
//!
//! A [`Renderer`] owns two environments: the body environment, which callers
//! may extend with helpers and partials, and a private front-matter
//! environment that callers cannot touch. Registered artifacts put their
//! body program in the former and their front-matter program in the latter;
//! a side table carries the per-template annotations.
//!
//! Rendering composes the effective context in layers, lowest to highest
//! precedence: palette tables, the per-flavor layer, the `flavor` key, the
//! rendered front-matter data, the caller context. Rendering is `&self` and
//! touches no shared mutable state, so concurrent renders need no
//! coordination.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;
use whiskers_palette::Palette;

use crate::artifact::CompiledTemplate;
use crate::environment::Environment;
use crate::error::{WhiskersError, WhiskersResult};
use crate::pipeline::{CompileOptions, WhiskersCompiler};
use crate::unquote;

/// Per-render options. Everything whiskers-specific lives here; the host
/// engine never sees a foreign option key.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Flavor supplying the per-flavor context layer. Unknown names error
    /// before any host-engine invocation.
    pub flavor: Option<String>,
}

#[derive(Debug, Clone)]
struct Annotation {
    has_front_matter: bool,
    body_begin: usize,
}

/// Renders compiled artifacts against palette, front-matter and caller
/// context layers.
pub struct Renderer<'p> {
    env: Environment,
    front_matter_env: Environment,
    palette: &'p Palette,
    annotations: HashMap<String, Annotation>,
}

impl<'p> Renderer<'p> {
    /// A renderer over the given palette, with fresh environments.
    pub fn new(palette: &'p Palette) -> Self {
        Renderer {
            env: Environment::new(),
            front_matter_env: Environment::isolated(),
            palette,
            annotations: HashMap::new(),
        }
    }

    /// The caller-extensible body environment.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Strict mode for body rendering (missing values error instead of
    /// rendering empty). Front matter always renders non-strict.
    pub fn set_strict_mode(&mut self, strict: bool) {
        self.env.set_strict_mode(strict);
    }

    /// Register a compiled artifact under a name.
    pub fn register_template(&mut self, name: &str, artifact: CompiledTemplate) {
        let CompiledTemplate {
            body,
            front_matter,
            body_begin,
        } = artifact;
        let has_front_matter = front_matter.is_some();
        self.env
            .registry_mut()
            .register_template(name, body.into_template());
        if let Some(front) = front_matter {
            self.front_matter_env
                .registry_mut()
                .register_template(name, front.into_template());
        }
        self.annotations.insert(
            name.to_owned(),
            Annotation {
                has_front_matter,
                body_begin,
            },
        );
        debug!(name, has_front_matter, "registered template");
    }

    /// Map a 1-indexed line within a registered template's body back to its
    /// line in the original document, for attributing render errors.
    pub fn original_line(&self, name: &str, body_line: usize) -> WhiskersResult<usize> {
        let annotation = self
            .annotations
            .get(name)
            .ok_or_else(|| WhiskersError::UnknownTemplate {
                name: name.to_owned(),
            })?;
        Ok(annotation.body_begin + body_line - 1)
    }

    /// Render a registered template.
    pub fn render(
        &self,
        name: &str,
        context: &Map<String, Value>,
        options: &RenderOptions,
    ) -> WhiskersResult<String> {
        let annotation = self
            .annotations
            .get(name)
            .ok_or_else(|| WhiskersError::UnknownTemplate {
                name: name.to_owned(),
            })?;

        // Flavor resolution happens before anything renders.
        let flavor = match options.flavor.as_deref() {
            Some(flavor_name) => Some(
                self.palette
                    .flavor(flavor_name)
                    .map(|f| (flavor_name, f))
                    .ok_or_else(|| WhiskersError::UnknownFlavor {
                        name: flavor_name.to_owned(),
                    })?,
            ),
            None => None,
        };

        // Layers (a)-(c): palette tables, per-flavor map, flavor name.
        let mut effective = self.palette.tables_context();
        if let Some((flavor_name, flavor_data)) = flavor {
            for (key, value) in flavor_data.context() {
                effective.insert(key, value);
            }
            effective.insert("flavor".into(), Value::String(flavor_name.to_owned()));
        }

        // Layer (d): front matter, template-expanded and parsed as
        // structured data. The expansion sees the caller context too, but
        // the parsed output sits below the caller layer in precedence.
        if annotation.has_front_matter {
            let mut input = effective.clone();
            for (key, value) in context {
                input.insert(key.clone(), value.clone());
            }
            let output = self
                .front_matter_env
                .registry()
                .render(name, &Value::Object(input))?;
            merge_front_matter(&mut effective, &output)?;
        }

        // Layer (e): caller context wins key-by-key.
        for (key, value) in context {
            effective.insert(key.clone(), value.clone());
        }

        // The host engine sees only its own options; `flavor` was consumed
        // above and is not forwarded.
        let rendered = self.env.registry().render(name, &Value::Object(effective))?;
        Ok(unquote::decode(&rendered))
    }

    /// Compile a template document and render it once.
    pub fn render_source(
        &mut self,
        source: &str,
        context: &Map<String, Value>,
        options: &RenderOptions,
    ) -> WhiskersResult<String> {
        const INLINE: &str = "__whiskers_inline__";
        let artifact = WhiskersCompiler::new().compile(source, &CompileOptions::default())?;
        self.register_template(INLINE, artifact);
        let result = self.render(INLINE, context, options);
        self.env.registry_mut().unregister_template(INLINE);
        self.front_matter_env.registry_mut().unregister_template(INLINE);
        self.annotations.remove(INLINE);
        result
    }
}

/// Merge rendered front-matter output into the context. A non-mapping
/// document lands under the synthetic key `this`; an empty document
/// contributes nothing.
fn merge_front_matter(effective: &mut Map<String, Value>, output: &str) -> WhiskersResult<()> {
    let data: serde_yaml::Value =
        serde_yaml::from_str(output).map_err(|e| WhiskersError::FrontMatterData {
            message: e.to_string(),
        })?;
    let data: Value = serde_json::to_value(data).map_err(|e| WhiskersError::FrontMatterData {
        message: e.to_string(),
    })?;
    match data {
        Value::Object(map) => {
            for (key, value) in map {
                effective.insert(key, value);
            }
        }
        Value::Null => {}
        other => {
            effective.insert("this".into(), other);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn renderer() -> Renderer<'static> {
        Renderer::new(Palette::builtin())
    }

    fn ctx(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn flavored(flavor: &str) -> RenderOptions {
        RenderOptions {
            flavor: Some(flavor.to_owned()),
        }
    }

    #[test]
    fn unknown_flavor_errors_before_rendering() {
        let mut r = renderer();
        let err = r
            .render_source("{{base}}", &Map::new(), &flavored("nonexistent"))
            .unwrap_err();
        assert!(matches!(err, WhiskersError::UnknownFlavor { name } if name == "nonexistent"));
    }

    #[test]
    fn unknown_template_name_errors() {
        let r = renderer();
        assert!(matches!(
            r.render("missing", &Map::new(), &RenderOptions::default()),
            Err(WhiskersError::UnknownTemplate { .. })
        ));
    }

    #[test]
    fn flavor_layer_provides_label_colors() {
        let mut r = renderer();
        let out = r
            .render_source("{{base}}", &Map::new(), &flavored("mocha"))
            .unwrap();
        assert_eq!(out, "1e1e2e");
    }

    #[test]
    fn palette_tables_are_always_present() {
        let mut r = renderer();
        let out = r
            .render_source("{{flavors.latte.base}}", &Map::new(), &RenderOptions::default())
            .unwrap();
        assert_eq!(out, "eff1f5");
    }

    #[test]
    fn caller_context_overrides_flavor_layer() {
        let mut r = renderer();
        let out = r
            .render_source(
                "{{base}}",
                &ctx(&[("base", Value::String("ffffff".into()))]),
                &flavored("mocha"),
            )
            .unwrap();
        assert_eq!(out, "ffffff");
    }

    #[test]
    fn front_matter_is_template_expanded_then_merged() {
        let mut r = renderer();
        let out = r
            .render_source(
                "---\ntitle: Hello {{name}}\n---\n{{title}}",
                &ctx(&[("name", Value::String("World".into()))]),
                &RenderOptions::default(),
            )
            .unwrap();
        assert_eq!(out, "Hello World");
    }

    #[test]
    fn front_matter_sees_flavor_layers() {
        let mut r = renderer();
        let out = r
            .render_source(
                "---\nbg: {{base}}\n---\n{{bg}}",
                &Map::new(),
                &flavored("mocha"),
            )
            .unwrap();
        assert_eq!(out, "1e1e2e");
    }

    #[test]
    fn caller_context_overrides_front_matter() {
        let mut r = renderer();
        let out = r
            .render_source(
                "---\ntitle: from header\n---\n{{title}}",
                &ctx(&[("title", Value::String("from caller".into()))]),
                &RenderOptions::default(),
            )
            .unwrap();
        assert_eq!(out, "from caller");
    }

    #[test]
    fn non_mapping_front_matter_lands_under_this() {
        let mut r = renderer();
        // `this` is an engine keyword, so the key is reached via `lookup`.
        let out = r
            .render_source(
                "---\njust a string\n---\n{{lookup this \"this\"}}",
                &Map::new(),
                &RenderOptions::default(),
            )
            .unwrap();
        assert_eq!(out, "just a string");
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut r = renderer();
        let artifact = WhiskersCompiler::new()
            .compile("---\nt: {{mauve}}\n---\n{{t}} {{base}}", &CompileOptions::default())
            .unwrap();
        r.register_template("t", artifact);
        let context = Map::new();
        let a = r.render("t", &context, &flavored("mocha")).unwrap();
        let b = r.render("t", &context, &flavored("mocha")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "cba6f7 1e1e2e");
    }

    #[test]
    fn body_helpers_do_not_leak_into_front_matter() {
        use handlebars::handlebars_helper;
        handlebars_helper!(shout: |s: str| s.to_uppercase());

        let mut r = renderer();
        r.environment_mut().register_helper("shout", Box::new(shout));
        // The body may use the caller-registered helper...
        let out = r
            .render_source("{{shout \"ok\"}}", &Map::new(), &RenderOptions::default())
            .unwrap();
        assert_eq!(out, "OK");
        // ...but front matter renders in the isolated environment.
        assert!(r
            .render_source(
                "---\nt: {{shout \"no\"}}\n---\n{{t}}",
                &Map::new(),
                &RenderOptions::default(),
            )
            .is_err());
    }

    #[test]
    fn original_line_accounts_for_the_header() {
        let mut r = renderer();
        let artifact = WhiskersCompiler::new()
            .compile("---\na: 1\n---\n{{a}}\n{{b}}", &CompileOptions::default())
            .unwrap();
        r.register_template("t", artifact);
        // Body line 2 sits at document line 5 (two fences, one header line).
        assert_eq!(r.original_line("t", 1).unwrap(), 4);
        assert_eq!(r.original_line("t", 2).unwrap(), 5);
        assert!(matches!(
            r.original_line("missing", 1),
            Err(WhiskersError::UnknownTemplate { .. })
        ));
    }

    #[test]
    fn strict_mode_applies_to_body_rendering() {
        let mut r = renderer();
        r.set_strict_mode(true);
        assert!(r
            .render_source("{{missing}}", &Map::new(), &RenderOptions::default())
            .is_err());
    }
}
