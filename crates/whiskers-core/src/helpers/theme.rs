/*
 * theme.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Flavor-dependent selection helpers.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson,
};
use serde_json::Value;

/// `darklight dark light`: picks `light` when the root context says the
/// active flavor is light, `dark` otherwise.
///
/// Requires the palette-provided `isLight`/`isDark` flags in the root
/// context, which are only present when a flavor was supplied.
struct DarkLightHelper;

impl HelperDef for DarkLightHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let root = ctx.data();
        let is_light = root.get("isLight").and_then(Value::as_bool);
        let is_dark = root.get("isDark").and_then(Value::as_bool);

        let light = match (is_light, is_dark) {
            (None, None) => {
                return Err(RenderErrorReason::Other(
                    "No isLight or isDark in root context. Did you supply a flavor?".to_string(),
                )
                .into())
            }
            (Some(l), Some(d)) if l == d => {
                return Err(RenderErrorReason::Other(format!(
                    "isLight and isDark disagree (both {l})"
                ))
                .into())
            }
            (l, d) => l.unwrap_or_else(|| !d.unwrap_or(true)),
        };

        let index = if light { 1 } else { 0 };
        let value = h
            .param(index)
            .map(|p| p.value().clone())
            .unwrap_or(Value::Null);
        Ok(ScopedJson::Derived(value))
    }
}

pub(crate) fn register(registry: &mut Handlebars<'static>) {
    registry.register_helper("darklight", Box::new(DarkLightHelper));
}
