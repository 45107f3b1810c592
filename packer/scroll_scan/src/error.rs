//! Scan failures.

use thiserror::Error;

/// A fatal scan failure. Both variants are deterministic data defects;
/// nothing here is retried or recovered.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    /// No candidate class could advance the cursor.
    #[error(
        "character \"{character}\" \u{ab}{context}\u{bb} at position {position} in scroll text \
         is not defined in any \"tag\" of \"lookups\" nor any \"set\" of \"fonts\""
    )]
    UndefinedCharacter {
        /// The character the cursor is stuck on.
        character: char,
        /// Up to five characters of context on each side.
        context: String,
        /// Character position in the scroll text.
        position: usize,
        /// Byte offset of the character, for span-based rendering.
        byte_offset: usize,
    },

    /// The distinct glyph count plus `begin` left the 8-bit code space.
    #[error(
        "number of unique characters ({unique}) plus begin ({begin}) exceeds the \
         256-value code space"
    )]
    CapacityExceeded { unique: usize, begin: u8 },
}
