//! Packed scroll-text listing.

use scroll_config::{Language, Parameters};
use scroll_scan::ScrollToken;

use crate::number::number;

/// Render the text array: 8 effective bytes per line, each full line
/// followed by a comment holding that line's concatenated tags. C gets
/// `uint8_t text[] = { ... };`, Assembler a `text`/`textend` label pair
/// with the `text_org` directive (when configured) above it.
pub fn render_text(params: &Parameters, tokens: &[ScrollToken], unique: usize) -> String {
    let mut out = String::new();
    match params.language {
        Language::C => {
            out.push_str(&format!(
                "/* scroll text, length: {}, unique characters: {} */\n",
                tokens.len(),
                unique
            ));
            out.push_str("uint8_t text[] = {\n");
        }
        Language::Assembler => {
            if let Some(org) = params.text_org.as_deref() {
                if !org.is_empty() {
                    out.push_str(org);
                    out.push('\n');
                }
            }
            out.push_str(&format!(
                "; scroll text, length: {}, unique characters: {}\n",
                tokens.len(),
                unique
            ));
            out.push_str("text");
        }
    }

    let mut tags = String::new();
    for (count, token) in tokens.iter().enumerate() {
        if count % 8 == 0 {
            out.push_str(match params.language {
                Language::C => "\t",
                Language::Assembler => "\t.byte ",
            });
        }
        tags.push_str(token.tag());

        let value = number(params, token.effective_byte(params.begin));
        let line_end = count % 8 == 7;
        let last = count + 1 == tokens.len();
        match params.language {
            // C keeps the trailing comma on line-final bytes.
            Language::C => {
                out.push_str(&value);
                out.push(',');
                if !line_end && !last {
                    out.push(' ');
                }
            }
            Language::Assembler => {
                out.push_str(&value);
                if !line_end && !last {
                    out.push_str(", ");
                }
            }
        }

        if line_end {
            push_tag_comment(&mut out, params, &tags, last);
            tags.clear();
        }
    }
    if !tags.is_empty() {
        push_tag_comment(&mut out, params, &tags, true);
    }

    out.push('\n');
    match params.language {
        Language::C => out.push_str("};\n"),
        Language::Assembler => out.push_str("textend\n"),
    }
    out.push('\n');
    out
}

/// The tag comment closing one byte line. The comment of the very last
/// line carries no newline of its own; `render_text` closes it.
fn push_tag_comment(out: &mut String, params: &Parameters, tags: &str, last: bool) {
    match params.language {
        Language::C => {
            out.push_str(&format!("\t/* {tags} */"));
        }
        Language::Assembler => {
            out.push_str(&format!("\t; {tags}"));
        }
    }
    if !last {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use scroll_config::NumberFormat;
    use scroll_scan::GlyphToken;

    use super::*;

    fn params(language: Language, format: NumberFormat) -> Parameters {
        Parameters {
            width: 1,
            height: 1,
            begin: 32,
            zero: false,
            language,
            format,
            consolidation: None,
            text_org: None,
            fonts_org: Vec::new(),
        }
    }

    fn glyph(index: usize, code: u8, tag: &str, or: Option<u8>) -> ScrollToken {
        ScrollToken::Glyph(GlyphToken {
            index,
            code,
            tag: tag.to_string(),
            set: "[".to_string(),
            file: "font.bin".to_string(),
            offsets: vec![0],
            or,
        })
    }

    #[test]
    fn c_hex_short_listing() {
        let tokens = vec![
            glyph(0, 0, "A", None),
            glyph(1, 1, "B", None),
            glyph(2, 0, "A", None),
        ];
        let out = render_text(&params(Language::C, NumberFormat::Hex), &tokens, 2);
        assert_eq!(
            out,
            "/* scroll text, length: 3, unique characters: 2 */\n\
             uint8_t text[] = {\n\
             \t0x20, 0x21, 0x20,\t/* ABA */\n\
             };\n\n"
        );
    }

    #[test]
    fn c_wraps_after_eight_bytes() {
        let mut tokens: Vec<ScrollToken> = (0..8).map(|i| glyph(i, 0, "A", None)).collect();
        tokens.push(glyph(8, 1, "B", None));
        let out = render_text(&params(Language::C, NumberFormat::Hex), &tokens, 2);
        assert_eq!(
            out,
            "/* scroll text, length: 9, unique characters: 2 */\n\
             uint8_t text[] = {\n\
             \t0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20,\t/* AAAAAAAA */\n\
             \t0x21,\t/* B */\n\
             };\n\n"
        );
    }

    #[test]
    fn assembler_hex_with_org() {
        let mut params = params(Language::Assembler, NumberFormat::Hex);
        params.text_org = Some("*= $2000".to_string());
        let tokens = vec![glyph(0, 0, "A", None), glyph(1, 1, "B", None)];
        let out = render_text(&params, &tokens, 2);
        assert_eq!(
            out,
            "*= $2000\n\
             ; scroll text, length: 2, unique characters: 2\n\
             text\t.byte $20, $21\t; AB\n\
             textend\n\n"
        );
    }

    #[test]
    fn assembler_omits_empty_org() {
        let mut params = params(Language::Assembler, NumberFormat::Dec);
        params.text_org = Some(String::new());
        let tokens = vec![glyph(0, 0, "A", None)];
        let out = render_text(&params, &tokens, 1);
        assert_eq!(
            out,
            "; scroll text, length: 1, unique characters: 1\n\
             text\t.byte 32\t; A\n\
             textend\n\n"
        );
    }

    #[test]
    fn dec_format_renders_plain_numbers() {
        let tokens = vec![glyph(0, 0, "A", None), glyph(1, 1, "B", None)];
        let out = render_text(&params(Language::C, NumberFormat::Dec), &tokens, 2);
        assert_eq!(
            out,
            "/* scroll text, length: 2, unique characters: 2 */\n\
             uint8_t text[] = {\n\
             \t32, 33,\t/* AB */\n\
             };\n\n"
        );
    }

    #[test]
    fn or_mask_and_zero_token_bytes() {
        let tokens = vec![glyph(0, 1, "X", Some(128)), ScrollToken::Zero];
        let out = render_text(&params(Language::C, NumberFormat::Hex), &tokens, 1);
        // (1 | 128) + 32 = 0xa1; the terminator is a literal zero and
        // renders the tag ZERO.
        assert_eq!(
            out,
            "/* scroll text, length: 2, unique characters: 1 */\n\
             uint8_t text[] = {\n\
             \t0xa1, 0x00,\t/* XZERO */\n\
             };\n\n"
        );
    }

    #[test]
    fn empty_token_stream_renders_empty_array() {
        let out = render_text(&params(Language::C, NumberFormat::Hex), &[], 0);
        assert_eq!(
            out,
            "/* scroll text, length: 0, unique characters: 0 */\n\
             uint8_t text[] = {\n\
             \n\
             };\n\n"
        );
    }
}
