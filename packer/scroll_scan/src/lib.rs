//! Scroll-text scanner for scrollpack.
//!
//! A single left-to-right pass resolves the scroll text into font-set
//! switches and glyph tags. At every cursor position six candidate
//! classes are probed in a fixed priority order (primary set markers,
//! or-markers, default markers, active-lookup tags, default-lookup
//! tags, any-lookup tags); the earliest match wins, with class order
//! breaking position ties and declaration order breaking ties within a
//! class. Glyph occurrences are deduplicated into stable byte codes in
//! first-appearance order.
//!
//! The scanner is a pure batch transform: one [`scan`] call owns its
//! whole state, and the same input always produces the same output.

mod candidate;
mod error;
mod scanner;
mod token;

pub use error::ScanError;
pub use scanner::{scan, ScanOutput};
pub use token::{DedupEntry, GlyphToken, ScrollToken};
