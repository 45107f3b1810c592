//! Typed model of a scroll description document.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Output language of the generated source listing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub enum Language {
    C,
    Assembler,
}

/// Numeric base used for every emitted byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    Dec,
    Hex,
}

/// Global packing parameters.
///
/// `width` and `height` describe the tile grid of one glyph (1..=8 in
/// each dimension); `begin` is added to every emitted text byte;
/// `consolidation` selects the font-byte emission order and is required
/// whenever `height > 1`.
#[derive(Clone, Debug, Deserialize)]
pub struct Parameters {
    pub width: u8,
    pub height: u8,
    pub begin: u8,
    #[serde(default)]
    pub zero: bool,
    pub language: Language,
    pub format: NumberFormat,
    #[serde(default)]
    pub consolidation: Option<bool>,
    /// Assembler origin directive emitted before the text block.
    #[serde(default)]
    pub text_org: Option<String>,
    /// Assembler origin directives, one per font row block.
    #[serde(default)]
    pub fonts_org: Vec<String>,
}

impl Parameters {
    /// Number of 8x8 tiles making up one glyph.
    pub fn tiles_per_glyph(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// `true` when font bytes are emitted glyph by glyph; `false` when
    /// they are grouped by tile row across all glyphs.
    pub fn glyph_major(&self) -> bool {
        self.height == 1 || self.consolidation == Some(true)
    }
}

/// One font set: a primary switch marker, optional default/or markers,
/// a source font file, and the lookup table it draws tags from.
#[derive(Clone, Debug, Deserialize)]
pub struct FontSet {
    pub set: String,
    #[serde(default)]
    pub set_default: Option<String>,
    #[serde(default)]
    pub set_or: Option<String>,
    pub file: String,
    pub lookup: String,
}

impl FontSet {
    /// The default-switch marker, if declared non-empty.
    pub fn default_marker(&self) -> Option<&str> {
        self.set_default.as_deref().filter(|m| !m.is_empty())
    }

    /// The or-switch marker, if declared non-empty.
    pub fn or_marker(&self) -> Option<&str> {
        self.set_or.as_deref().filter(|m| !m.is_empty())
    }
}

/// One tag -> tile offsets mapping.
///
/// `offsets` holds exactly `width * height` cell ids in row-major order
/// (index = row * width + column). An empty tag never matches; `or` is
/// a bitmask merged into the text byte while the owning set is active
/// through its or-marker.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GlyphMapping {
    pub tag: String,
    pub offsets: Vec<u32>,
    #[serde(default)]
    pub or: Option<u8>,
}

/// A named, ordered list of glyph mappings.
#[derive(Clone, Debug, Deserialize)]
pub struct LookupTable {
    pub lookup: String,
    pub mapping: Vec<GlyphMapping>,
}

/// The whole scroll description document.
#[derive(Clone, Debug, Deserialize)]
pub struct ScrollConfig {
    /// Scroll text fragments; the scanner consumes their concatenation.
    pub scroll: Vec<String>,
    pub parameters: Parameters,
    pub fonts: Vec<FontSet>,
    pub lookups: Vec<LookupTable>,
}

impl ScrollConfig {
    /// Parse a scroll description from JSON text and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a scroll description file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The assembled scroll text.
    pub fn scroll_text(&self) -> String {
        self.scroll.concat()
    }

    /// Find a lookup table by name.
    pub fn lookup_named(&self, name: &str) -> Option<&LookupTable> {
        self.lookups.iter().find(|table| table.lookup == name)
    }

    /// First declared font set bound to the given lookup table.
    pub fn font_for_lookup(&self, lookup: &str) -> Option<(usize, &FontSet)> {
        self.fonts
            .iter()
            .enumerate()
            .find(|(_, font)| font.lookup == lookup)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn minimal_json() -> &'static str {
        r#"{
            "scroll": ["AB", "BA"],
            "parameters": {
                "width": 1, "height": 1, "begin": 32,
                "language": "C", "format": "hex"
            },
            "fonts": [
                {"set": "[", "file": "font.bin", "lookup": "main"}
            ],
            "lookups": [
                {"lookup": "main", "mapping": [
                    {"tag": "A", "offsets": [0]},
                    {"tag": "B", "offsets": [1], "or": 128}
                ]}
            ]
        }"#
    }

    #[test]
    fn parses_minimal_document() {
        let config = ScrollConfig::from_json_str(minimal_json()).unwrap();
        assert_eq!(config.scroll_text(), "ABBA");
        assert_eq!(config.parameters.begin, 32);
        assert_eq!(config.parameters.language, Language::C);
        assert_eq!(config.parameters.format, NumberFormat::Hex);
        assert!(!config.parameters.zero);
        assert_eq!(config.fonts.len(), 1);
        assert_eq!(config.lookups[0].mapping[1].or, Some(128));
    }

    #[test]
    fn glyph_major_follows_height_and_consolidation() {
        let mut config = ScrollConfig::from_json_str(minimal_json()).unwrap();
        assert!(config.parameters.glyph_major());

        config.parameters.height = 2;
        config.parameters.consolidation = Some(false);
        assert!(!config.parameters.glyph_major());

        config.parameters.consolidation = Some(true);
        assert!(config.parameters.glyph_major());
    }

    #[test]
    fn tiles_per_glyph_is_width_times_height() {
        let mut config = ScrollConfig::from_json_str(minimal_json()).unwrap();
        config.parameters.width = 4;
        config.parameters.height = 2;
        assert_eq!(config.parameters.tiles_per_glyph(), 8);
    }

    #[test]
    fn empty_markers_count_as_absent() {
        let font = FontSet {
            set: "[".to_string(),
            set_default: Some(String::new()),
            set_or: None,
            file: "font.bin".to_string(),
            lookup: "main".to_string(),
        };
        assert_eq!(font.default_marker(), None);
        assert_eq!(font.or_marker(), None);
    }

    #[test]
    fn lookup_accessors() {
        let config = ScrollConfig::from_json_str(minimal_json()).unwrap();
        assert!(config.lookup_named("main").is_some());
        assert!(config.lookup_named("other").is_none());
        let (index, font) = config.font_for_lookup("main").unwrap();
        assert_eq!(index, 0);
        assert_eq!(font.set, "[");
    }

    #[test]
    fn rejects_wrong_language_string() {
        let json = minimal_json().replace("\"C\"", "\"Pascal\"");
        assert!(matches!(
            ScrollConfig::from_json_str(&json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_or_mask() {
        let json = minimal_json().replace("\"or\": 128", "\"or\": 300");
        assert!(matches!(
            ScrollConfig::from_json_str(&json),
            Err(ConfigError::Json(_))
        ));
    }
}
