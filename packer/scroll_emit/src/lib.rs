//! Source-text rendering for scrollpack.
//!
//! Turns the scanner's token stream and the extractor's font bytes into
//! C or Assembler source. Rendering is pure string building; the CLI
//! decides where the text goes. Every layout detail (8 bytes per line,
//! tag comments, labels, origin directives) is part of the output
//! contract, so the renderers are covered by golden-string tests.

mod fonts;
mod header;
mod number;
mod text;

pub use fonts::render_fonts;
pub use header::render_header;
pub use text::render_text;
