//! External palette data source format

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::Result;

/// The raw palette data supplied at process start.
///
/// `flavors` maps flavor name -> label name -> bare 6-digit hex color.
/// `light_flavor` designates the one flavor whose `is_light` flag is true.
/// `accent_labels` names the label subset exposed as the `accents` view.
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteSource {
    pub light_flavor: String,
    pub accent_labels: Vec<String>,
    pub flavors: BTreeMap<String, BTreeMap<String, String>>,
}

impl PaletteSource {
    /// Parse a palette data source from its JSON form.
    pub fn from_json(text: &str) -> Result<PaletteSource> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Palette;

    #[test]
    fn custom_source_round_trips() {
        let source = PaletteSource::from_json(
            r#"{
                "light_flavor": "day",
                "accent_labels": ["accent"],
                "flavors": {
                    "day": { "accent": "ff0000", "bg": "ffffff" },
                    "night": { "accent": "00ff00", "bg": "000000" }
                }
            }"#,
        )
        .unwrap();
        let palette = Palette::from_source(source);
        assert!(palette.flavors["day"].is_light);
        assert!(palette.flavors["night"].is_dark);
        assert_eq!(palette.labels["bg"]["night"], "000000");
        assert_eq!(palette.accents.len(), 1);
    }

    #[test]
    fn malformed_source_is_an_error() {
        assert!(PaletteSource::from_json("not json").is_err());
    }
}
