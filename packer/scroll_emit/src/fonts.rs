//! Font pixel-byte listing.

use scroll_config::{Language, Parameters};
use scroll_fonts::FontData;
use scroll_scan::DedupEntry;

use crate::number::number;

/// Render the font arrays for every unique glyph, in dedup order.
///
/// Consolidated layouts (single-row glyphs, or `consolidation` on) emit
/// one `fonts` array holding whole glyphs back to back. Split layouts
/// group the output by tile row instead, one `fonts<r>` array (or
/// commented C section) per row, so each row can live at its own origin.
/// Every emitted line is one 8-byte tile followed by a comment naming
/// the glyph's tag, its set and the tile's column and row.
pub fn render_fonts(params: &Parameters, dedup: &[DedupEntry], data: &FontData) -> String {
    let mut out = String::new();
    if params.glyph_major() {
        match params.language {
            Language::C => {
                out.push_str("/* fonts data */\n");
                out.push_str("uint8_t fonts[] = {\n");
            }
            Language::Assembler => {
                push_org(&mut out, params, 0);
                out.push_str("; fonts data\n");
                out.push_str("fonts");
            }
        }
        for chunk in data.emission(params) {
            if let Some(entry) = dedup.get(chunk.glyph) {
                push_row(&mut out, params, entry, chunk.bytes, chunk.row);
            }
        }
        match params.language {
            Language::C => out.push_str("};\n"),
            Language::Assembler => out.push_str("fontsen\n"),
        }
    } else {
        if params.language == Language::C {
            out.push_str("/* fonts data */\n");
            out.push_str("uint8_t fonts[] = {\n");
        }
        for row in 0..usize::from(params.height) {
            if row > 0 {
                out.push('\n');
            }
            match params.language {
                Language::C => {
                    out.push_str(&format!("\t/* row no. {row} */\n"));
                }
                Language::Assembler => {
                    push_org(&mut out, params, row);
                    out.push_str(&format!("; fonts data, row no. {row}\n"));
                    out.push_str(&format!("fonts{row}"));
                }
            }
            for (glyph, entry) in dedup.iter().enumerate() {
                let bytes = data.glyph(glyph).and_then(|glyph| glyph.rows.get(row));
                if let Some(bytes) = bytes {
                    push_row(&mut out, params, entry, bytes, row);
                }
            }
            if params.language == Language::Assembler {
                out.push_str(&format!("fonts{row}e\n"));
            }
        }
        if params.language == Language::C {
            out.push_str("};\n");
        }
    }
    out
}

/// The `fonts_org` directive for `row`, when one is configured.
fn push_org(out: &mut String, params: &Parameters, row: usize) {
    if let Some(org) = params.fonts_org.get(row) {
        if !org.is_empty() {
            out.push_str(org);
            out.push('\n');
        }
    }
}

/// One glyph row: `width` tile lines of 8 bytes each.
fn push_row(out: &mut String, params: &Parameters, entry: &DedupEntry, bytes: &[u8], row: usize) {
    for (tile, tile_bytes) in bytes.chunks(8).enumerate() {
        out.push_str(match params.language {
            Language::C => "\t",
            Language::Assembler => "\t.byte ",
        });
        for (i, &byte) in tile_bytes.iter().enumerate() {
            let last = i + 1 == tile_bytes.len();
            let value = number(params, byte);
            match params.language {
                Language::C => {
                    out.push_str(&value);
                    out.push(',');
                    if !last {
                        out.push(' ');
                    }
                }
                Language::Assembler => {
                    out.push_str(&value);
                    if !last {
                        out.push_str(", ");
                    }
                }
            }
        }
        match params.language {
            Language::C => {
                out.push_str(&format!("\t/* \"{}\" {} {}_{} */\n", entry.tag, entry.set, tile, row));
            }
            Language::Assembler => {
                out.push_str(&format!("\t; \"{}\" {} {}_{}\n", entry.tag, entry.set, tile, row));
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use pretty_assertions::assert_eq;
    use scroll_config::NumberFormat;
    use scroll_fonts::{FontSources, MemFontSource};

    use super::*;

    fn params(
        language: Language,
        width: u8,
        height: u8,
        consolidation: Option<bool>,
    ) -> Parameters {
        Parameters {
            width,
            height,
            begin: 0,
            zero: false,
            language,
            format: NumberFormat::Hex,
            consolidation,
            text_org: None,
            fonts_org: Vec::new(),
        }
    }

    fn entry(tag: &str, offsets: Vec<u32>) -> DedupEntry {
        DedupEntry {
            code: 0,
            tag: tag.to_string(),
            set: "[".to_string(),
            file: "font.bin".to_string(),
            offsets,
            or: None,
        }
    }

    /// Cell `n` holds bytes `n*8 .. n*8+8`.
    fn extract(dedup: &[DedupEntry], params: &Parameters) -> FontData {
        let mut sources = FontSources::default();
        sources.insert("[", "font.bin", Box::new(MemFontSource::new((0..64).collect())));
        FontData::extract(dedup, params, &mut sources).unwrap()
    }

    #[test]
    fn c_consolidated_single_tile_glyphs() {
        let params = params(Language::C, 1, 1, None);
        let dedup = vec![entry("A", vec![0]), entry("B", vec![1])];
        let data = extract(&dedup, &params);
        let out = render_fonts(&params, &dedup, &data);
        assert_eq!(
            out,
            "/* fonts data */\n\
             uint8_t fonts[] = {\n\
             \t0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,\t/* \"A\" [ 0_0 */\n\
             \t0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,\t/* \"B\" [ 0_0 */\n\
             };\n"
        );
    }

    #[test]
    fn assembler_consolidated_with_org() {
        let mut params = params(Language::Assembler, 1, 1, None);
        params.fonts_org = vec!["*= $3000".to_string()];
        let dedup = vec![entry("A", vec![0])];
        let data = extract(&dedup, &params);
        let out = render_fonts(&params, &dedup, &data);
        assert_eq!(
            out,
            "*= $3000\n\
             ; fonts data\n\
             fonts\t.byte $00, $01, $02, $03, $04, $05, $06, $07\t; \"A\" [ 0_0\n\
             fontsen\n"
        );
    }

    #[test]
    fn wide_glyphs_emit_one_line_per_tile() {
        let params = params(Language::C, 2, 1, None);
        let dedup = vec![entry("A", vec![1, 0])];
        let data = extract(&dedup, &params);
        let out = render_fonts(&params, &dedup, &data);
        assert_eq!(
            out,
            "/* fonts data */\n\
             uint8_t fonts[] = {\n\
             \t0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,\t/* \"A\" [ 0_0 */\n\
             \t0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,\t/* \"A\" [ 1_0 */\n\
             };\n"
        );
    }

    #[test]
    fn consolidated_tall_glyphs_stay_whole() {
        let params = params(Language::C, 1, 2, Some(true));
        let dedup = vec![entry("A", vec![0, 1]), entry("B", vec![2, 3])];
        let data = extract(&dedup, &params);
        let out = render_fonts(&params, &dedup, &data);
        assert_eq!(
            out,
            "/* fonts data */\n\
             uint8_t fonts[] = {\n\
             \t0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,\t/* \"A\" [ 0_0 */\n\
             \t0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,\t/* \"A\" [ 0_1 */\n\
             \t0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17,\t/* \"B\" [ 0_0 */\n\
             \t0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f,\t/* \"B\" [ 0_1 */\n\
             };\n"
        );
    }

    #[test]
    fn c_split_rows_are_grouped_and_commented() {
        let params = params(Language::C, 1, 2, Some(false));
        let dedup = vec![entry("A", vec![0, 1]), entry("B", vec![2, 3])];
        let data = extract(&dedup, &params);
        let out = render_fonts(&params, &dedup, &data);
        assert_eq!(
            out,
            "/* fonts data */\n\
             uint8_t fonts[] = {\n\
             \t/* row no. 0 */\n\
             \t0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,\t/* \"A\" [ 0_0 */\n\
             \t0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17,\t/* \"B\" [ 0_0 */\n\
             \n\
             \t/* row no. 1 */\n\
             \t0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,\t/* \"A\" [ 0_1 */\n\
             \t0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f,\t/* \"B\" [ 0_1 */\n\
             };\n"
        );
    }

    #[test]
    fn assembler_split_rows_get_labels_and_per_row_orgs() {
        let mut params = params(Language::Assembler, 1, 2, Some(false));
        params.fonts_org = vec!["*= $4000".to_string(), String::new()];
        let dedup = vec![entry("A", vec![0, 1])];
        let data = extract(&dedup, &params);
        let out = render_fonts(&params, &dedup, &data);
        assert_eq!(
            out,
            "*= $4000\n\
             ; fonts data, row no. 0\n\
             fonts0\t.byte $00, $01, $02, $03, $04, $05, $06, $07\t; \"A\" [ 0_0\n\
             fonts0e\n\
             \n\
             ; fonts data, row no. 1\n\
             fonts1\t.byte $08, $09, $0a, $0b, $0c, $0d, $0e, $0f\t; \"A\" [ 0_1\n\
             fonts1e\n"
        );
    }

    #[test]
    fn split_layout_keeps_row_sections_even_without_glyphs() {
        let params = params(Language::Assembler, 1, 2, Some(false));
        let data = extract(&[], &params);
        let out = render_fonts(&params, &[], &data);
        assert_eq!(
            out,
            "; fonts data, row no. 0\n\
             fonts0fonts0e\n\
             \n\
             ; fonts data, row no. 1\n\
             fonts1fonts1e\n"
        );
    }

    #[test]
    fn dec_format_in_font_rows() {
        let mut params = params(Language::C, 1, 1, None);
        params.format = NumberFormat::Dec;
        let dedup = vec![entry("A", vec![1])];
        let data = extract(&dedup, &params);
        let out = render_fonts(&params, &dedup, &data);
        assert_eq!(
            out,
            "/* fonts data */\n\
             uint8_t fonts[] = {\n\
             \t8, 9, 10, 11, 12, 13, 14, 15,\t/* \"A\" [ 0_0 */\n\
             };\n"
        );
    }
}
