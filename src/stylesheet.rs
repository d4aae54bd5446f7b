//! Chart palette
//!
//! Layout and rendering refer to colors by symbolic token (`body-sun`,
//! `aspect-square`, `sign-even`, ...). A stylesheet maps those tokens to
//! concrete CSS colors so the same chart can be drawn in different schemes.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Failure to load a chart palette
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("cannot read palette: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid palette TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Chart palette: color tokens such as `body-sun` or `aspect-trine` mapped to CSS colors
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Color mappings: token name -> CSS color; ordered so output is stable
    pub colors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

const DEFAULT_PALETTE: &str = r##"
[metadata]
name = "classic"

[colors]
# Bodies
body-sun = "gold"
body-moon = "silver"
body-mercury = "lightgrey"
body-venus = "hotpink"
body-mars = "red"
body-jupiter = "orange"
body-saturn = "saddlebrown"
body-uranus = "cyan"
body-neptune = "blue"
body-pluto = "darkviolet"
body-chiron = "green"
body-lilith = "black"
body-north-node = "gray"
body-south-node = "gray"
body-ascendant = "#333333"
body-midheaven = "#333333"

# Aspect chords
aspect-conjunction = "#555555"
aspect-sextile = "#2196f3"
aspect-square = "#f44336"
aspect-trine = "#4caf50"
aspect-opposition = "#e65100"

# Zodiac band
sign-even = "aliceblue"
sign-odd = "#ffffff"
sign-glyph = "#666666"

# Structure
line-ring = "lightgray"
line-house = "gray"
line-axis = "#333333"
text-label = "#333333"
text-house = "#999999"
background = "#ffffff"
"##;

impl Stylesheet {
    /// Read a palette file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a palette; tokens absent from it resolve through `resolve_or_default`
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
        })
    }

    /// Resolve a token defined in this stylesheet
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a token with fallback to the default palette
    ///
    /// Fallback order:
    /// 1. This stylesheet
    /// 2. The default palette
    /// 3. A category default chosen by token prefix
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }

        let default = Self::default();
        if let Some(color) = default.resolve(token) {
            return color.to_string();
        }

        let category = token.split('-').next().unwrap_or(token);
        match category {
            "body" | "text" | "line" => "#333333",
            "aspect" => "#999999",
            "sign" | "background" => "#ffffff",
            _ => "#333333",
        }
        .to_string()
    }

    /// Layer `overrides` on top of this stylesheet
    pub fn merged_with(mut self, overrides: &Stylesheet) -> Self {
        for (token, value) in &overrides.colors {
            self.colors.insert(token.clone(), value.clone());
        }
        if overrides.name.is_some() {
            self.name = overrides.name.clone();
        }
        self
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::from_str(DEFAULT_PALETTE).expect("built-in palette parses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zodiac::{AspectKind, PointId};

    fn empty() -> Stylesheet {
        Stylesheet {
            name: None,
            description: None,
            colors: BTreeMap::new(),
        }
    }

    #[test]
    fn test_default_covers_every_point_and_aspect() {
        let stylesheet = Stylesheet::default();
        for id in PointId::ALL {
            assert!(
                stylesheet.resolve(&id.color_token()).is_some(),
                "missing {}",
                id.color_token()
            );
        }
        for kind in [
            AspectKind::Conjunction,
            AspectKind::Sextile,
            AspectKind::Square,
            AspectKind::Trine,
            AspectKind::Opposition,
        ] {
            assert!(stylesheet.resolve(kind.style_token()).is_some());
        }
    }

    #[test]
    fn test_resolve_existing_token() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve("body-sun"), Some("gold"));
        assert_eq!(stylesheet.resolve("aspect-square"), Some("#f44336"));
        assert_eq!(stylesheet.resolve("nonexistent"), None);
    }

    #[test]
    fn test_resolve_or_default_fallback() {
        assert_eq!(empty().resolve_or_default("body-moon"), "silver");
        assert_eq!(empty().resolve_or_default("aspect-quincunx"), "#999999");
        assert_eq!(empty().resolve_or_default("sign-custom"), "#ffffff");
        assert_eq!(empty().resolve_or_default("whatever"), "#333333");
    }

    #[test]
    fn test_parse_toml_with_metadata() {
        let toml_str = r##"
[metadata]
name = "Night"
description = "Dark background"

[colors]
background = "#000000"
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        assert_eq!(stylesheet.name, Some("Night".to_string()));
        assert_eq!(stylesheet.description, Some("Dark background".to_string()));
        assert_eq!(stylesheet.resolve("background"), Some("#000000"));
    }

    #[test]
    fn test_merge_overrides() {
        let night = Stylesheet::from_str("[colors]\nbody-sun = \"#ffcc00\"\n").unwrap();
        let merged = Stylesheet::default().merged_with(&night);
        assert_eq!(merged.resolve("body-sun"), Some("#ffcc00"));
        assert_eq!(merged.resolve("body-moon"), Some("silver"));
        assert_eq!(merged.name, Some("classic".to_string()));
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(Stylesheet::from_str("this is not valid toml {{{{").is_err());
    }
}
