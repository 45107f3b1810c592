//! Shared number formatting.

use scroll_config::{Language, NumberFormat, Parameters};

/// One byte in the configured radix, with the language's hex prefix.
pub(crate) fn number(params: &Parameters, value: u8) -> String {
    match (params.format, params.language) {
        (NumberFormat::Hex, Language::C) => format!("0x{value:02x}"),
        (NumberFormat::Hex, Language::Assembler) => format!("${value:02x}"),
        (NumberFormat::Dec, _) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn params(language: Language, format: NumberFormat) -> Parameters {
        Parameters {
            width: 1,
            height: 1,
            begin: 0,
            zero: false,
            language,
            format,
            consolidation: None,
            text_org: None,
            fonts_org: Vec::new(),
        }
    }

    #[test]
    fn hex_uses_language_prefix() {
        assert_eq!(number(&params(Language::C, NumberFormat::Hex), 10), "0x0a");
        assert_eq!(
            number(&params(Language::Assembler, NumberFormat::Hex), 255),
            "$ff"
        );
    }

    #[test]
    fn dec_has_no_prefix_or_padding() {
        assert_eq!(number(&params(Language::C, NumberFormat::Dec), 7), "7");
        assert_eq!(
            number(&params(Language::Assembler, NumberFormat::Dec), 200),
            "200"
        );
    }
}
