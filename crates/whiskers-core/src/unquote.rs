/*
 * unquote.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The raw-value tunnel.
//!
//! The host engine auto-escapes helper return values, which is wrong for
//! values meant to be spliced verbatim into non-markup output (a bare color
//! literal in a config file, say). The `unquote` helper escapes its argument
//! the way the engine would, base64-encodes the escaped text, and emits it
//! wrapped in a sentinel the engine is told to trust. After the body program
//! has rendered, [`decode`] replaces each sentinel that sits immediately
//! inside a matching pair of quotes with the decoded payload, quotes
//! included.
//!
//! Decode problems are never fatal: a payload that fails to decode is
//! replaced by a literal error marker, and sentinels left outside quotes are
//! reported as a warning while the output is returned as-is.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use handlebars::{
    html_escape, Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::warn;

/// Marker substituted for a sentinel whose payload failed to decode.
pub const UNQUOTE_ERROR: &str = "{WHISKERS:UNQUOTE_ERROR}";

// The regex crate has no backreferences, so the "same quote on both sides"
// rule is spelled out as one alternative per quote character.
static QUOTED_SENTINEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"'\{WHISKERS:UNQUOTE:([A-Za-z0-9+/]+={0,2})\}'",
        r#"|"\{WHISKERS:UNQUOTE:([A-Za-z0-9+/]+={0,2})\}""#,
    ))
    .expect("valid sentinel regex")
});

static BARE_SENTINEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{WHISKERS:UNQUOTE:[A-Za-z0-9+/]+={0,2}\}").expect("valid sentinel regex")
});

/// Encode a value for tunneling: engine-escape it first (so the payload
/// round-trips through the encoding the engine would otherwise apply), then
/// wrap the base64 of the escaped text in the sentinel.
pub fn encode(value: &str) -> String {
    format!("{{WHISKERS:UNQUOTE:{}}}", BASE64.encode(html_escape(value)))
}

/// Post-render decode pass over the full rendered output.
///
/// Replaces every `<quote>{WHISKERS:UNQUOTE:payload}<same-quote>` span with
/// the decoded payload. Undecodable payloads become [`UNQUOTE_ERROR`];
/// leftover unquoted sentinels are warned about and left in place.
pub fn decode(rendered: &str) -> String {
    let decoded = QUOTED_SENTINEL.replace_all(rendered, |caps: &Captures<'_>| {
        let payload = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match BASE64
            .decode(payload)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
        {
            Some(text) => text,
            None => {
                warn!(payload, "failed to decode unquote section; this is probably a bug");
                UNQUOTE_ERROR.to_string()
            }
        }
    });

    if BARE_SENTINEL.is_match(&decoded) {
        warn!(
            "unquote helper used without being immediately surrounded by single or double \
             quotes; the sentinel remains in the output"
        );
    }

    decoded.into_owned()
}

/// The renderer-visible `unquote` helper.
///
/// Writes the sentinel directly to the output stream, which the engine does
/// not re-escape; the payload inside has already been engine-escaped.
pub struct UnquoteHelper;

impl HelperDef for UnquoteHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let raw = match h.param(0).map(|p| p.value()) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        out.write(&encode(&raw))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip_single_quoted() {
        let sentinel = encode("#a6e3a1");
        let output = format!("color = '{sentinel}'");
        assert_eq!(decode(&output), "color = #a6e3a1");
    }

    #[test]
    fn round_trip_double_quoted() {
        let sentinel = encode("1 < 2");
        let output = format!("check = \"{sentinel}\"");
        // The payload stays engine-escaped, byte for byte.
        assert_eq!(decode(&output), format!("check = {}", html_escape("1 < 2")));
    }

    #[test]
    fn mismatched_quotes_are_left_alone() {
        let sentinel = encode("x");
        let output = format!("'{sentinel}\"");
        assert_eq!(decode(&output), output);
    }

    #[test]
    fn unquoted_sentinel_is_left_in_output() {
        let sentinel = encode("x");
        assert_eq!(decode(&sentinel), sentinel);
    }

    #[test]
    fn bad_payload_becomes_error_marker() {
        // "!!!" is not in the sentinel alphabet, but a well-formed payload
        // that is not valid base64-of-utf8 still decodes to bytes; force a
        // decode failure with a payload whose length is invalid for base64.
        let output = "'{WHISKERS:UNQUOTE:abcde}'";
        assert_eq!(decode(output), UNQUOTE_ERROR);
    }

    #[test]
    fn multiple_sentinels_decode_independently() {
        let a = encode("one");
        let b = encode("two");
        let output = format!("'{a}' and \"{b}\"");
        assert_eq!(decode(&output), "one and two");
    }

    #[test]
    fn decode_is_total_on_plain_text() {
        assert_eq!(decode("no sentinels here"), "no sentinels here");
    }
}
