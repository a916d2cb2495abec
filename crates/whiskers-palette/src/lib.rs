//! # whiskers-palette
//!
//! Process-wide color palette tables for whiskers templates.
//!
//! The palette is built once from a flavor -> label -> hex data source and is
//! read-only afterwards. Besides the raw flavor table it carries two derived
//! views: the transposed label -> flavor -> hex table and the named accent
//! subset, plus per-flavor `is_light`/`is_dark` flags (a flavor is light iff
//! it is the designated light flavor of the source).
//!
//! The renderer receives the palette by reference; [`Palette::builtin`] is a
//! convenience for the embedded Catppuccin data.

mod error;
mod source;

pub use error::{Error, Result};
pub use source::PaletteSource;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// One flavor: its label colors plus derived lightness flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flavor {
    /// label -> bare 6-digit hex
    #[serde(flatten)]
    pub colors: BTreeMap<String, String>,
    #[serde(rename = "isLight")]
    pub is_light: bool,
    #[serde(rename = "isDark")]
    pub is_dark: bool,
}

/// Immutable palette tables shared by all renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// flavor -> flavor data
    pub flavors: BTreeMap<String, Flavor>,
    /// label -> flavor -> hex (transposed view)
    pub labels: BTreeMap<String, BTreeMap<String, String>>,
    /// the accent subset of `labels`
    pub accents: BTreeMap<String, BTreeMap<String, String>>,
}

static BUILTIN: Lazy<Palette> = Lazy::new(|| {
    let source: PaletteSource =
        serde_json::from_str(include_str!("../assets/palette.json"))
            .expect("embedded palette data is well-formed");
    Palette::from_source(source)
});

impl Palette {
    /// Build the palette tables and derived views from a data source.
    pub fn from_source(source: PaletteSource) -> Palette {
        let mut flavors = BTreeMap::new();
        let mut labels: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

        for (flavor_name, colors) in &source.flavors {
            let is_light = *flavor_name == source.light_flavor;
            flavors.insert(
                flavor_name.clone(),
                Flavor {
                    colors: colors.clone(),
                    is_light,
                    is_dark: !is_light,
                },
            );
            for (label, hex) in colors {
                labels
                    .entry(label.clone())
                    .or_default()
                    .insert(flavor_name.clone(), hex.clone());
            }
        }

        let accents = source
            .accent_labels
            .iter()
            .filter_map(|label| labels.get(label).map(|v| (label.clone(), v.clone())))
            .collect();

        Palette {
            flavors,
            labels,
            accents,
        }
    }

    /// The embedded Catppuccin palette, built on first use.
    pub fn builtin() -> &'static Palette {
        &BUILTIN
    }

    /// Look up a flavor by name.
    pub fn flavor(&self, name: &str) -> Option<&Flavor> {
        self.flavors.get(name)
    }

    /// The full palette tables as template context values: the `flavors`,
    /// `labels` and `accents` keys, plus every flavor spread under its own
    /// name so `{{mocha.base}}` works without the `flavors.` prefix.
    pub fn tables_context(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("flavors".into(), to_json(&self.flavors));
        map.insert("labels".into(), to_json(&self.labels));
        map.insert("accents".into(), to_json(&self.accents));
        for (name, flavor) in &self.flavors {
            map.insert(name.clone(), to_json(flavor));
        }
        map
    }
}

impl Flavor {
    /// This flavor as template context values: every label plus the
    /// `isLight`/`isDark` flags.
    pub fn context(&self) -> serde_json::Map<String, serde_json::Value> {
        match to_json(self) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!("flavor serializes to an object"),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).expect("palette values serialize to JSON")
}
