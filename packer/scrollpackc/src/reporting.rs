//! Error reporting on stderr.

use ariadne::{Color, Label, Report, ReportKind, Source};
use scroll_scan::ScanError;

use crate::PackError;

/// Print `error` for the scroll description at `path`.
///
/// Every error gets the `"<file>": <message>` line. An undefined
/// character additionally gets a rendered report with the offending
/// span labeled over the assembled scroll text.
pub fn report(path: &str, error: &PackError) {
    eprintln!("\"{path}\": {error}");

    if let PackError::Scan {
        source:
            ScanError::UndefinedCharacter {
                character,
                byte_offset,
                ..
            },
        scroll_text,
    } = error
    {
        let span = *byte_offset..*byte_offset + character.len_utf8();
        Report::build(ReportKind::Error, path, *byte_offset)
            .with_message("scroll text contains an undefined character")
            .with_label(
                Label::new((path, span))
                    .with_message(format!(
                        "\"{character}\" is not defined in any \"tag\" of \"lookups\" nor any \"set\" of \"fonts\""
                    ))
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((path, Source::from(scroll_text.as_str())))
            .ok();
    }
}
