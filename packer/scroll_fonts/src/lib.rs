//! Font-file access and glyph byte extraction for scrollpack.
//!
//! Fonts are raw binary files of 8x8-pixel cells, 8 bytes per cell. The
//! scanner's dedup table names, for every unique glyph, the cells its
//! mosaic is assembled from; this crate opens the font files and turns
//! those cell references into the glyph's pixel bytes in emission
//! order.

mod error;
mod extract;
mod source;

pub use error::FontError;
pub use extract::{extract_glyph, FontData, GlyphBytes, RowChunk};
pub use source::{FileFontSource, FontSource, FontSources, MemFontSource};
