//! End-to-end pipeline tests over real files.

#![allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use scroll_fonts::FontError;
use scroll_scan::ScanError;
use scrollpackc::{pack, PackError};

const TIMESTAMP: &str = "2024-01-01 00:00:00";

/// Write a font file whose cell `n` holds the bytes `n*8 .. n*8+8`.
fn write_counting_font(dir: &Path, cells: u8) -> String {
    let path = dir.join("font.bin");
    let bytes: Vec<u8> = (0..cells * 8).collect();
    fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

fn write_config(dir: &Path, json: &str) -> String {
    let path = dir.join("scroll.json");
    fs::write(&path, json).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn packs_a_c_listing() {
    let dir = tempfile::tempdir().unwrap();
    let font = write_counting_font(dir.path(), 2);
    let config = write_config(
        dir.path(),
        &format!(
            r#"{{
                "scroll": ["AB", "A"],
                "parameters": {{
                    "width": 1, "height": 1, "begin": 32, "zero": true,
                    "language": "C", "format": "hex"
                }},
                "fonts": [
                    {{"set": "[", "file": "{font}", "lookup": "main"}}
                ],
                "lookups": [
                    {{"lookup": "main", "mapping": [
                        {{"tag": "A", "offsets": [0]}},
                        {{"tag": "B", "offsets": [1]}}
                    ]}}
                ]
            }}"#
        ),
    );

    let listing = pack(&config, TIMESTAMP).unwrap();
    let version = env!("CARGO_PKG_VERSION");
    assert_eq!(
        listing,
        format!(
            "/* \"scrollpack\" v{version}, {TIMESTAMP}, \"{config}\" */\n\
             \n\
             /* scroll text, length: 4, unique characters: 2 */\n\
             uint8_t text[] = {{\n\
             \t0x20, 0x21, 0x20, 0x00,\t/* ABAZERO */\n\
             }};\n\
             \n\
             /* fonts data */\n\
             uint8_t fonts[] = {{\n\
             \t0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,\t/* \"A\" [ 0_0 */\n\
             \t0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,\t/* \"B\" [ 0_0 */\n\
             }};\n"
        )
    );
}

#[test]
fn packs_an_assembler_listing() {
    let dir = tempfile::tempdir().unwrap();
    let font = write_counting_font(dir.path(), 1);
    let config = write_config(
        dir.path(),
        &format!(
            r#"{{
                "scroll": ["AA"],
                "parameters": {{
                    "width": 1, "height": 1, "begin": 0,
                    "language": "Assembler", "format": "hex",
                    "text_org": "*= $2000", "fonts_org": ["*= $3000"]
                }},
                "fonts": [
                    {{"set": "[", "file": "{font}", "lookup": "main"}}
                ],
                "lookups": [
                    {{"lookup": "main", "mapping": [
                        {{"tag": "A", "offsets": [0]}}
                    ]}}
                ]
            }}"#
        ),
    );

    let listing = pack(&config, TIMESTAMP).unwrap();
    let version = env!("CARGO_PKG_VERSION");
    assert_eq!(
        listing,
        format!(
            "; \"scrollpack\" v{version}, {TIMESTAMP}, \"{config}\"\n\
             \n\
             *= $2000\n\
             ; scroll text, length: 2, unique characters: 1\n\
             text\t.byte $00, $00\t; AA\n\
             textend\n\
             \n\
             *= $3000\n\
             ; fonts data\n\
             fonts\t.byte $00, $01, $02, $03, $04, $05, $06, $07\t; \"A\" [ 0_0\n\
             fontsen\n"
        )
    );
}

#[test]
fn missing_font_file_fails_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{
            "scroll": ["A"],
            "parameters": {
                "width": 1, "height": 1, "begin": 0,
                "language": "C", "format": "hex"
            },
            "fonts": [
                {"set": "[", "file": "/nonexistent/font.bin", "lookup": "main"}
            ],
            "lookups": [
                {"lookup": "main", "mapping": [
                    {"tag": "A", "offsets": [0]}
                ]}
            ]
        }"#,
    );

    let err = pack(&config, TIMESTAMP).unwrap_err();
    assert!(matches!(
        err,
        PackError::Font(FontError::Unavailable { file, .. }) if file == "/nonexistent/font.bin"
    ));
}

#[test]
fn undefined_character_carries_the_scroll_text() {
    let dir = tempfile::tempdir().unwrap();
    let font = write_counting_font(dir.path(), 1);
    let config = write_config(
        dir.path(),
        &format!(
            r#"{{
                "scroll": ["A?A"],
                "parameters": {{
                    "width": 1, "height": 1, "begin": 0,
                    "language": "C", "format": "hex"
                }},
                "fonts": [
                    {{"set": "[", "file": "{font}", "lookup": "main"}}
                ],
                "lookups": [
                    {{"lookup": "main", "mapping": [
                        {{"tag": "A", "offsets": [0]}}
                    ]}}
                ]
            }}"#
        ),
    );

    let err = pack(&config, TIMESTAMP).unwrap_err();
    let PackError::Scan {
        source,
        scroll_text,
    } = err
    else {
        unreachable!("expected a scan failure")
    };
    assert_eq!(scroll_text, "A?A");
    assert_eq!(
        source,
        ScanError::UndefinedCharacter {
            character: '?',
            context: "A?A".to_string(),
            position: 1,
            byte_offset: 1,
        }
    );
}

#[test]
fn invalid_description_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"{
            "scroll": ["A"],
            "parameters": {
                "width": 9, "height": 1, "begin": 0,
                "language": "C", "format": "hex"
            },
            "fonts": [
                {"set": "[", "file": "font.bin", "lookup": "main"}
            ],
            "lookups": [
                {"lookup": "main", "mapping": [
                    {"tag": "A", "offsets": [0]}
                ]}
            ]
        }"#,
    );

    let err = pack(&config, TIMESTAMP).unwrap_err();
    assert!(matches!(err, PackError::Config(_)));
}

#[test]
fn missing_description_file_is_a_config_error() {
    let err = pack("/nonexistent/scroll.json", TIMESTAMP).unwrap_err();
    assert!(matches!(err, PackError::Config(_)));
}
