/*
 * colors.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Color transform and format helpers.
//!
//! Every helper parses its first argument as a color, accepting a bare
//! 6-digit hex form by retrying the parse with a leading `#`. Helpers taking
//! a numeric amount validate it and fail the render when it is not a number.
//! Color-returning helpers emit a bare lowercase 6-digit hex string.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson,
};
use palette::{FromColor, Hsl, RgbHue, Srgb};
use serde_json::{json, Value};

/// A parsed color: sRGB components plus an alpha channel.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Color {
    pub rgb: Srgb<f32>,
    pub alpha: f32,
}

pub(crate) fn parse_color(raw: &str) -> Result<Color, RenderError> {
    raw.parse::<Srgb<u8>>()
        .or_else(|_| format!("#{raw}").parse::<Srgb<u8>>())
        .map(|c| Color {
            rgb: c.into_format(),
            alpha: 1.0,
        })
        .map_err(|_| RenderErrorReason::Other(format!("Invalid color {raw}")).into())
}

fn color_param(h: &Helper<'_>) -> Result<Color, RenderError> {
    let value = h
        .param(0)
        .map(|p| p.value().clone())
        .ok_or_else(|| RenderErrorReason::Other(format!("{}: missing color argument", h.name())))?;
    let raw = match value {
        Value::String(s) => s,
        other => other.to_string(),
    };
    parse_color(&raw)
}

fn amount_param(h: &Helper<'_>) -> Result<f32, RenderError> {
    let value = h.param(1).map(|p| p.value().clone()).unwrap_or(Value::Null);
    let amount = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.map(|a| a as f32).ok_or_else(|| {
        RenderErrorReason::Other(format!(
            "Amount argument {value} could not be converted to a number"
        ))
        .into()
    })
}

pub(crate) fn to_hex(color: Color) -> String {
    let c: Srgb<u8> = color.rgb.into_format();
    format!("{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

fn with_hsl(color: Color, f: impl FnOnce(&mut Hsl)) -> Color {
    let mut hsl = Hsl::from_color(color.rgb);
    f(&mut hsl);
    hsl.saturation = hsl.saturation.clamp(0.0, 1.0);
    hsl.lightness = hsl.lightness.clamp(0.0, 1.0);
    Color {
        rgb: Srgb::from_color(hsl),
        alpha: color.alpha,
    }
}

fn channel(value: f32) -> i64 {
    (value * 255.0).round() as i64
}

/// Alpha rounded to two decimals and printed without trailing zeros
/// (`1`, `0.5`, `0.25`).
fn alpha_str(alpha: f32) -> String {
    let rounded = (f64::from(alpha) * 100.0).round() / 100.0;
    format!("{rounded}")
}

fn hsl_parts(color: Color) -> (i64, i64, i64) {
    let hsl = Hsl::from_color(color.rgb);
    (
        hsl.hue.into_positive_degrees().round() as i64,
        (hsl.saturation * 100.0).round() as i64,
        (hsl.lightness * 100.0).round() as i64,
    )
}

/// A helper over one parsed color argument.
struct ColorHelper(fn(Color) -> Value);

impl HelperDef for ColorHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        Ok(ScopedJson::Derived((self.0)(color_param(h)?)))
    }
}

/// A helper over a color argument plus a validated numeric amount.
struct ColorAmountHelper(fn(Color, f32) -> Value);

impl HelperDef for ColorAmountHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let color = color_param(h)?;
        let amount = amount_param(h)?;
        Ok(ScopedJson::Derived((self.0)(color, amount)))
    }
}

pub(crate) fn register(registry: &mut Handlebars<'static>) {
    // Transforms with a validated amount argument.
    registry.register_helper(
        "saturate",
        Box::new(ColorAmountHelper(|c, a| {
            json!(to_hex(with_hsl(c, |hsl| hsl.saturation += a)))
        })),
    );
    registry.register_helper(
        "desaturate",
        Box::new(ColorAmountHelper(|c, a| {
            json!(to_hex(with_hsl(c, |hsl| hsl.saturation -= a)))
        })),
    );
    registry.register_helper(
        "lighten",
        Box::new(ColorAmountHelper(|c, a| {
            json!(to_hex(with_hsl(c, |hsl| hsl.lightness += a)))
        })),
    );
    registry.register_helper(
        "darken",
        Box::new(ColorAmountHelper(|c, a| {
            json!(to_hex(with_hsl(c, |hsl| hsl.lightness -= a)))
        })),
    );
    registry.register_helper(
        "opacity",
        Box::new(ColorAmountHelper(|c, a| {
            json!(to_hex(Color {
                alpha: a.clamp(0.0, 1.0),
                ..c
            }))
        })),
    );
    registry.register_helper(
        "rotate",
        Box::new(ColorAmountHelper(|c, a| {
            json!(to_hex(with_hsl(c, |hsl| {
                hsl.hue = RgbHue::from_degrees(hsl.hue.into_degrees() + a);
            })))
        })),
    );

    // Formatters.
    registry.register_helper("hex", Box::new(ColorHelper(|c| json!(to_hex(c)))));
    registry.register_helper(
        "rgb",
        Box::new(ColorHelper(|c| {
            json!(format!(
                "rgb({}, {}, {})",
                channel(c.rgb.red),
                channel(c.rgb.green),
                channel(c.rgb.blue)
            ))
        })),
    );
    registry.register_helper(
        "rgba",
        Box::new(ColorHelper(|c| {
            // Historical output shape: the label stays "rgb" even with alpha.
            json!(format!(
                "rgb({}, {}, {}, {})",
                channel(c.rgb.red),
                channel(c.rgb.green),
                channel(c.rgb.blue),
                alpha_str(c.alpha)
            ))
        })),
    );
    registry.register_helper(
        "hsl",
        Box::new(ColorHelper(|c| {
            let (h, s, l) = hsl_parts(c);
            json!(format!("hsl({h}, {s}%, {l}%)"))
        })),
    );
    registry.register_helper(
        "hsla",
        Box::new(ColorHelper(|c| {
            let (h, s, l) = hsl_parts(c);
            json!(format!("hsla({h}, {s}%, {l}%, {})", alpha_str(c.alpha)))
        })),
    );

    // Channel readers: integers 0-255.
    registry.register_helper("red_i", Box::new(ColorHelper(|c| json!(channel(c.rgb.red)))));
    registry.register_helper(
        "green_i",
        Box::new(ColorHelper(|c| json!(channel(c.rgb.green)))),
    );
    registry.register_helper(
        "blue_i",
        Box::new(ColorHelper(|c| json!(channel(c.rgb.blue)))),
    );
    registry.register_helper(
        "alpha_i",
        Box::new(ColorHelper(|c| json!(channel(c.alpha)))),
    );

    // Channel readers: normalized floats 0-1.
    registry.register_helper("red_f", Box::new(ColorHelper(|c| json!(c.rgb.red))));
    registry.register_helper("green_f", Box::new(ColorHelper(|c| json!(c.rgb.green))));
    registry.register_helper("blue_f", Box::new(ColorHelper(|c| json!(c.rgb.blue))));
    registry.register_helper("alpha_f", Box::new(ColorHelper(|c| json!(c.alpha))));

    // HSL readers: degrees and percents.
    registry.register_helper("hue", Box::new(ColorHelper(|c| json!(hsl_parts(c).0))));
    registry.register_helper(
        "saturation",
        Box::new(ColorHelper(|c| json!(hsl_parts(c).1))),
    );
    registry.register_helper(
        "lightness",
        Box::new(ColorHelper(|c| json!(hsl_parts(c).2))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of(raw: &str) -> String {
        to_hex(parse_color(raw).unwrap())
    }

    #[test]
    fn bare_hex_parses_via_hash_retry() {
        assert_eq!(hex_of("1e1e2e"), "1e1e2e");
        assert_eq!(hex_of("#1e1e2e"), "1e1e2e");
    }

    #[test]
    fn invalid_color_is_an_error() {
        assert!(parse_color("not-a-color").is_err());
        assert!(parse_color("12345g").is_err());
    }

    #[test]
    fn lighten_raises_hsl_lightness() {
        let base = parse_color("1e1e2e").unwrap();
        let lighter = with_hsl(base, |hsl| hsl.lightness += 0.2);
        let l0 = Hsl::from_color(base.rgb).lightness;
        let l1 = Hsl::from_color(lighter.rgb).lightness;
        assert!(l1 > l0);
        assert!((l1 - l0 - 0.2).abs() < 0.01);
    }

    #[test]
    fn darken_clamps_at_black() {
        let c = with_hsl(parse_color("1e1e2e").unwrap(), |hsl| hsl.lightness -= 5.0);
        assert_eq!(to_hex(c), "000000");
    }

    #[test]
    fn rotate_wraps_degrees() {
        let c = parse_color("ff0000").unwrap();
        let rotated = with_hsl(c, |hsl| {
            hsl.hue = RgbHue::from_degrees(hsl.hue.into_degrees() + 360.0);
        });
        assert_eq!(to_hex(rotated), "ff0000");
    }

    #[test]
    fn channel_readers_roundtrip_hex() {
        let c = parse_color("1e66f5").unwrap();
        assert_eq!(channel(c.rgb.red), 0x1e);
        assert_eq!(channel(c.rgb.green), 0x66);
        assert_eq!(channel(c.rgb.blue), 0xf5);
        assert_eq!(channel(c.alpha), 255);
    }

    #[test]
    fn hsl_parts_of_pure_red() {
        let (h, s, l) = hsl_parts(parse_color("ff0000").unwrap());
        assert_eq!((h, s, l), (0, 100, 50));
    }
}
