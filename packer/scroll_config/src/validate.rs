//! Semantic validation of a parsed scroll description.
//!
//! serde already guarantees shape and numeric ranges that fit the field
//! types (`begin` and `or` are `u8`, offsets are `u32`). The checks here
//! cover everything else the scanner and extractor assume: dimension
//! ranges, marker distinctness, name uniqueness, the global
//! marker-vs-tag separation, lookup references, and offsets arity.

use crate::{ConfigError, ScrollConfig};

impl ScrollConfig {
    /// Run every semantic check. Called by the loading paths; exposed
    /// for configurations assembled in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_scroll()?;
        self.check_parameters()?;
        self.check_fonts()?;
        self.check_lookups()?;
        self.check_cross_references()
    }

    fn check_scroll(&self) -> Result<(), ConfigError> {
        if self.scroll.iter().all(String::is_empty) {
            return Err(ConfigError::EmptyScroll);
        }
        Ok(())
    }

    fn check_parameters(&self) -> Result<(), ConfigError> {
        let p = &self.parameters;
        for (field, value) in [("width", p.width), ("height", p.height)] {
            if !(1..=8).contains(&value) {
                return Err(ConfigError::DimensionOutOfRange { field, value });
            }
        }
        if p.height > 1 && p.consolidation.is_none() {
            return Err(ConfigError::MissingConsolidation { height: p.height });
        }
        Ok(())
    }

    fn check_fonts(&self) -> Result<(), ConfigError> {
        if self.fonts.is_empty() {
            return Err(ConfigError::NoFonts);
        }
        for (index, font) in self.fonts.iter().enumerate() {
            for (field, value) in [
                ("set", font.set.as_str()),
                ("file", font.file.as_str()),
                ("lookup", font.lookup.as_str()),
            ] {
                if value.is_empty() {
                    return Err(ConfigError::EmptyFontField { field, index });
                }
            }
            if font.default_marker() == Some(font.set.as_str()) {
                return Err(ConfigError::MarkerEqualsSet {
                    set: font.set.clone(),
                    other: "set_default",
                });
            }
            if font.or_marker() == Some(font.set.as_str()) {
                return Err(ConfigError::MarkerEqualsSet {
                    set: font.set.clone(),
                    other: "set_or",
                });
            }
            if font.or_marker().is_some() && font.or_marker() == font.default_marker() {
                return Err(ConfigError::DefaultEqualsOr {
                    set: font.set.clone(),
                });
            }
        }
        for (i, font) in self.fonts.iter().enumerate() {
            if self.fonts[..i].iter().any(|other| other.set == font.set) {
                return Err(ConfigError::DuplicateSet {
                    set: font.set.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_lookups(&self) -> Result<(), ConfigError> {
        let expected = self.parameters.tiles_per_glyph();
        for (i, table) in self.lookups.iter().enumerate() {
            if self.lookups[..i]
                .iter()
                .any(|other| other.lookup == table.lookup)
            {
                return Err(ConfigError::DuplicateLookup {
                    lookup: table.lookup.clone(),
                });
            }
            if table.mapping.is_empty() {
                return Err(ConfigError::EmptyMapping {
                    lookup: table.lookup.clone(),
                });
            }
            for (j, mapping) in table.mapping.iter().enumerate() {
                if mapping.offsets.len() != expected {
                    return Err(ConfigError::WrongOffsetCount {
                        lookup: table.lookup.clone(),
                        tag: mapping.tag.clone(),
                        expected,
                        found: mapping.offsets.len(),
                    });
                }
                // Empty tags never match and may repeat.
                if !mapping.tag.is_empty()
                    && table.mapping[..j].iter().any(|other| other.tag == mapping.tag)
                {
                    return Err(ConfigError::DuplicateTag {
                        lookup: table.lookup.clone(),
                        tag: mapping.tag.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Markers must never collide with any lookup tag, and every font's
    /// lookup reference must resolve.
    fn check_cross_references(&self) -> Result<(), ConfigError> {
        for font in &self.fonts {
            let markers = [
                Some(font.set.as_str()),
                font.default_marker(),
                font.or_marker(),
            ];
            for marker in markers.into_iter().flatten() {
                for table in &self.lookups {
                    if table.mapping.iter().any(|m| m.tag == marker) {
                        return Err(ConfigError::MarkerMatchesTag {
                            marker: marker.to_string(),
                            set: font.set.clone(),
                            lookup: table.lookup.clone(),
                        });
                    }
                }
            }
            if self.lookup_named(&font.lookup).is_none() {
                return Err(ConfigError::UnknownLookup {
                    lookup: font.lookup.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use crate::{ConfigError, ScrollConfig};

    fn base_json() -> String {
        r#"{
            "scroll": ["AB"],
            "parameters": {
                "width": 1, "height": 1, "begin": 32,
                "language": "Assembler", "format": "dec"
            },
            "fonts": [
                {"set": "[", "set_or": "*", "file": "font.bin", "lookup": "main"}
            ],
            "lookups": [
                {"lookup": "main", "mapping": [
                    {"tag": "A", "offsets": [0]},
                    {"tag": "B", "offsets": [1]}
                ]}
            ]
        }"#
        .to_string()
    }

    fn parse(json: &str) -> Result<ScrollConfig, ConfigError> {
        ScrollConfig::from_json_str(json)
    }

    #[test]
    fn base_document_is_valid() {
        assert!(parse(&base_json()).is_ok());
    }

    #[test]
    fn rejects_empty_scroll_text() {
        let json = base_json().replace(r#"["AB"]"#, r#"["", ""]"#);
        assert!(matches!(parse(&json), Err(ConfigError::EmptyScroll)));
    }

    #[test]
    fn rejects_width_out_of_range() {
        let json = base_json().replace("\"width\": 1", "\"width\": 9");
        assert!(matches!(
            parse(&json),
            Err(ConfigError::DimensionOutOfRange { field: "width", value: 9 })
        ));
    }

    #[test]
    fn rejects_height_zero() {
        let json = base_json().replace("\"height\": 1", "\"height\": 0");
        assert!(matches!(
            parse(&json),
            Err(ConfigError::DimensionOutOfRange { field: "height", value: 0 })
        ));
    }

    #[test]
    fn tall_glyphs_require_consolidation() {
        // Height 2 needs two offsets per mapping and a consolidation flag.
        let json = base_json()
            .replace("\"height\": 1", "\"height\": 2")
            .replace("\"offsets\": [0]", "\"offsets\": [0, 2]")
            .replace("\"offsets\": [1]", "\"offsets\": [1, 3]");
        assert!(matches!(
            parse(&json),
            Err(ConfigError::MissingConsolidation { height: 2 })
        ));

        let json = json.replace("\"begin\": 32", "\"begin\": 32, \"consolidation\": false");
        assert!(parse(&json).is_ok());
    }

    #[test]
    fn rejects_marker_equal_to_set() {
        let json = base_json().replace("\"set_or\": \"*\"", "\"set_or\": \"[\"");
        assert!(matches!(
            parse(&json),
            Err(ConfigError::MarkerEqualsSet { other: "set_or", .. })
        ));
    }

    #[test]
    fn rejects_default_equal_to_or() {
        let json = base_json().replace(
            "\"set_or\": \"*\"",
            "\"set_or\": \"*\", \"set_default\": \"*\"",
        );
        assert!(matches!(parse(&json), Err(ConfigError::DefaultEqualsOr { .. })));
    }

    #[test]
    fn rejects_duplicate_sets() {
        let json = base_json().replace(
            r#"{"set": "[", "set_or": "*", "file": "font.bin", "lookup": "main"}"#,
            r#"{"set": "[", "set_or": "*", "file": "font.bin", "lookup": "main"},
               {"set": "[", "file": "other.bin", "lookup": "main"}"#,
        );
        assert!(matches!(parse(&json), Err(ConfigError::DuplicateSet { .. })));
    }

    #[test]
    fn rejects_duplicate_tags_within_lookup() {
        let json = base_json().replace("\"tag\": \"B\"", "\"tag\": \"A\"");
        assert!(matches!(parse(&json), Err(ConfigError::DuplicateTag { .. })));
    }

    #[test]
    fn allows_repeated_empty_tags() {
        let json = base_json()
            .replace("\"tag\": \"A\"", "\"tag\": \"\"")
            .replace("\"tag\": \"B\"", "\"tag\": \"\"");
        // Empty scroll text would now be unmatched, but validation passes.
        assert!(parse(&json).is_ok());
    }

    #[test]
    fn rejects_wrong_offsets_arity() {
        let json = base_json().replace("\"offsets\": [1]", "\"offsets\": [1, 2]");
        assert!(matches!(
            parse(&json),
            Err(ConfigError::WrongOffsetCount { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn rejects_marker_colliding_with_tag() {
        let json = base_json().replace("\"set_or\": \"*\"", "\"set_or\": \"B\"");
        assert!(matches!(
            parse(&json),
            Err(ConfigError::MarkerMatchesTag { .. })
        ));
    }

    #[test]
    fn rejects_unresolved_lookup_reference() {
        let json = base_json().replace("\"lookup\": \"main\"}", "\"lookup\": \"ghost\"}");
        // Only the font's reference is renamed; the table keeps its name.
        assert!(matches!(parse(&json), Err(ConfigError::UnknownLookup { .. })));
    }
}
