//! Scanner output records.

/// One unique glyph: a `(tag, set)` pair with its assigned byte code.
///
/// Entries are created in first-appearance order; `code` always equals
/// the entry's index in the dedup table. `or` is copied from the
/// occurrence that created the entry and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DedupEntry {
    pub code: u8,
    pub tag: String,
    pub set: String,
    pub file: String,
    /// Cell ids, row-major, one per tile of the glyph mosaic.
    pub offsets: Vec<u32>,
    pub or: Option<u8>,
}

/// One glyph occurrence in the token stream.
///
/// `or` belongs to this occurrence alone: it is present only when the
/// occurrence was matched through the active lookup while the or-flag
/// was set, and may differ from the dedup entry's own `or`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphToken {
    /// Position in the emitted token stream.
    pub index: usize,
    /// Byte code of the referenced [`DedupEntry`].
    pub code: u8,
    pub tag: String,
    pub set: String,
    pub file: String,
    pub offsets: Vec<u32>,
    pub or: Option<u8>,
}

/// One element of the output token stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrollToken {
    Glyph(GlyphToken),
    /// Synthetic terminator appended when the `zero` parameter is set.
    /// Its effective text byte is always 0; it never appears in the
    /// dedup table and is never passed to the font extractor.
    Zero,
}

impl ScrollToken {
    /// The text byte this token contributes to the packed stream.
    ///
    /// Glyphs emit `(code | or) + begin`. The capacity check plus the
    /// upstream `or`/`begin` ranges keep this inside `u8` for any sane
    /// configuration; an overflowing combination is a configuration
    /// defect, so the addition simply wraps rather than panicking.
    pub fn effective_byte(&self, begin: u8) -> u8 {
        match self {
            ScrollToken::Glyph(glyph) => {
                (glyph.code | glyph.or.unwrap_or(0)).wrapping_add(begin)
            }
            ScrollToken::Zero => 0,
        }
    }

    /// Tag rendered into listing comments.
    pub fn tag(&self) -> &str {
        match self {
            ScrollToken::Glyph(glyph) => &glyph.tag,
            ScrollToken::Zero => "ZERO",
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn glyph(code: u8, or: Option<u8>) -> ScrollToken {
        ScrollToken::Glyph(GlyphToken {
            index: 0,
            code,
            tag: "A".to_string(),
            set: "[".to_string(),
            file: "font.bin".to_string(),
            offsets: vec![0],
            or,
        })
    }

    #[test]
    fn effective_byte_adds_begin() {
        assert_eq!(glyph(0, None).effective_byte(32), 32);
        assert_eq!(glyph(1, None).effective_byte(32), 33);
    }

    #[test]
    fn effective_byte_merges_or_before_begin() {
        assert_eq!(glyph(1, Some(128)).effective_byte(32), (1 | 128) + 32);
    }

    #[test]
    fn zero_token_is_always_zero() {
        assert_eq!(ScrollToken::Zero.effective_byte(0), 0);
        assert_eq!(ScrollToken::Zero.effective_byte(200), 0);
        assert_eq!(ScrollToken::Zero.tag(), "ZERO");
    }
}
