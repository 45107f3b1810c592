//! Scroll description model for scrollpack.
//!
//! A scroll description is a single JSON document carrying the scroll
//! text, global parameters, the font set declarations, and the lookup
//! tables mapping text tags to mosaic tile offsets. This crate owns the
//! typed model, the JSON loading path, and the semantic validation that
//! the scanner and extractor rely on (dimension ranges, marker/tag
//! uniqueness, offsets arity, lookup references).
//!
//! Downstream crates receive a [`ScrollConfig`] that already satisfies
//! every invariant; they never re-validate.

mod error;
mod model;
mod validate;

pub use error::ConfigError;
pub use model::{
    FontSet, GlyphMapping, Language, LookupTable, NumberFormat, Parameters, ScrollConfig,
};
