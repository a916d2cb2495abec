/*
 * misc.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! String and number helpers.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson,
};
use serde_json::{json, Value};

fn string_param(h: &Helper<'_>, index: usize) -> String {
    match h.param(index).map(|p| p.value()) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn number_param(h: &Helper<'_>, index: usize) -> Result<f64, RenderError> {
    let value = h.param(index).map(|p| p.value().clone()).unwrap_or(Value::Null);
    match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| RenderErrorReason::Other(format!("{}: {value} is not a number", h.name())).into())
}

struct StringHelper(fn(&str) -> String);

impl HelperDef for StringHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        Ok(ScopedJson::Derived(json!((self.0)(&string_param(h, 0)))))
    }
}

/// `trunc num places`: truncate toward zero at `places` decimals.
struct TruncHelper;

impl HelperDef for TruncHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let num = number_param(h, 0)?;
        let places = number_param(h, 1)?;
        let factor = 10f64.powf(places);
        Ok(ScopedJson::Derived(json!((num * factor).trunc() / factor)))
    }
}

/// `round num places`: round half away from zero, formatted with exactly
/// `places` decimals.
struct RoundHelper;

impl HelperDef for RoundHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let num = number_param(h, 0)?;
        let places = number_param(h, 1)?.max(0.0) as usize;
        Ok(ScopedJson::Derived(json!(format!("{num:.places$}"))))
    }
}

/// `get obj key...`: walk a key chain into an object, one step per argument.
/// A missing key or a step into a non-container yields null for the rest of
/// the chain.
struct GetHelper;

impl HelperDef for GetHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let mut current = h
            .param(0)
            .map(|p| p.value().clone())
            .unwrap_or(Value::Null);
        for key in h.params().iter().skip(1) {
            if current.is_null() {
                break;
            }
            current = get_step(&current, key.value());
        }
        Ok(ScopedJson::Derived(current))
    }
}

fn get_step(value: &Value, key: &Value) -> Value {
    match (value, key) {
        (Value::Object(map), Value::String(k)) => map.get(k).cloned().unwrap_or(Value::Null),
        (Value::Array(items), Value::Number(n)) => n
            .as_u64()
            .and_then(|i| items.get(i as usize))
            .cloned()
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

pub(crate) fn titlecase(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn register(registry: &mut Handlebars<'static>) {
    registry.register_helper("uppercase", Box::new(StringHelper(|s| s.to_uppercase())));
    registry.register_helper("lowercase", Box::new(StringHelper(|s| s.to_lowercase())));
    registry.register_helper("titlecase", Box::new(StringHelper(titlecase)));
    registry.register_helper("trunc", Box::new(TruncHelper));
    registry.register_helper("round", Box::new(RoundHelper));
    registry.register_helper("get", Box::new(GetHelper));
}
