//! Font access failures.

use std::io;

use thiserror::Error;

/// A fatal font-file failure. Every variant names the font file (or
/// set) involved so the CLI can report without extra bookkeeping.
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be opened.
    #[error("font file \"{file}\" is not available because \"{source}\"")]
    Unavailable {
        file: String,
        #[source]
        source: io::Error,
    },

    /// A byte read at `offset` failed, including reads past the end of
    /// the file.
    #[error("cannot read offset {offset} of font file \"{file}\" because \"{source}\"")]
    Read {
        file: String,
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// Releasing the font file failed.
    #[error("font file \"{file}\" cannot be closed because \"{source}\"")]
    CloseFailed {
        file: String,
        #[source]
        source: io::Error,
    },

    /// A dedup entry referenced a font set no source was opened for.
    #[error("no font source is open for set \"{set}\"")]
    UnknownSet { set: String },
}
