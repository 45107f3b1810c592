//! Generated-file header comment.

use scroll_config::{Language, Parameters};

const TOOL: &str = "scrollpack";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The one-line provenance comment opening every generated file,
/// followed by a blank line. The timestamp is passed in preformatted so
/// rendering stays deterministic under test.
pub fn render_header(params: &Parameters, input_name: &str, timestamp: &str) -> String {
    match params.language {
        Language::C => {
            format!("/* \"{TOOL}\" v{VERSION}, {timestamp}, \"{input_name}\" */\n\n")
        }
        Language::Assembler => {
            format!("; \"{TOOL}\" v{VERSION}, {timestamp}, \"{input_name}\"\n\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use scroll_config::NumberFormat;

    use super::*;

    fn params(language: Language) -> Parameters {
        Parameters {
            width: 1,
            height: 1,
            begin: 0,
            zero: false,
            language,
            format: NumberFormat::Hex,
            consolidation: None,
            text_org: None,
            fonts_org: Vec::new(),
        }
    }

    #[test]
    fn c_header_is_a_block_comment() {
        let header = render_header(&params(Language::C), "scroll.json", "2024-01-01 00:00:00");
        assert_eq!(
            header,
            format!("/* \"scrollpack\" v{VERSION}, 2024-01-01 00:00:00, \"scroll.json\" */\n\n")
        );
    }

    #[test]
    fn assembler_header_is_a_line_comment() {
        let header = render_header(
            &params(Language::Assembler),
            "scroll.json",
            "2024-01-01 00:00:00",
        );
        assert_eq!(
            header,
            format!("; \"scrollpack\" v{VERSION}, 2024-01-01 00:00:00, \"scroll.json\"\n\n")
        );
    }
}
