//! Validation and loading errors for scroll descriptions.

use thiserror::Error;

/// A defect in the scroll description document.
///
/// Every variant is fatal: the packer has no degraded mode, so a
/// description that fails any check here never reaches the scanner.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON file cannot be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("error while parsing JSON file at line {line} because \"{msg}\"", line = .0.line(), msg = .0)]
    Json(#[from] serde_json::Error),

    #[error("empty text of scroll")]
    EmptyScroll,

    #[error("value of \"{field}\" in \"parameters\" has to be between 1 and 8, got {value}")]
    DimensionOutOfRange { field: &'static str, value: u8 },

    #[error("no \"consolidation\" in \"parameters\" although height is {height}")]
    MissingConsolidation { height: u8 },

    #[error("no definition(s) of fonts detected")]
    NoFonts,

    #[error("empty \"{field}\" in \"fonts\" at index #{index}")]
    EmptyFontField { field: &'static str, index: usize },

    #[error("values of \"set\" and \"{other}\" are the same for set \"{set}\"")]
    MarkerEqualsSet { set: String, other: &'static str },

    #[error("values of \"set_default\" and \"set_or\" are the same for set \"{set}\"")]
    DefaultEqualsOr { set: String },

    #[error("set \"{set}\" is duplicated in \"fonts\"")]
    DuplicateSet { set: String },

    #[error("lookup \"{lookup}\" is duplicated in \"lookups\"")]
    DuplicateLookup { lookup: String },

    #[error("no definition(s) of \"mapping\" detected in lookup \"{lookup}\"")]
    EmptyMapping { lookup: String },

    #[error("tag \"{tag}\" is duplicated in \"mapping\" of lookup \"{lookup}\"")]
    DuplicateTag { lookup: String, tag: String },

    #[error(
        "wrong number of elements of \"offsets\" for tag \"{tag}\" in lookup \"{lookup}\": \
         expected {expected}, got {found}"
    )]
    WrongOffsetCount {
        lookup: String,
        tag: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "\"{marker}\" of set \"{set}\" has the same name as a tag of lookup \"{lookup}\""
    )]
    MarkerMatchesTag {
        marker: String,
        set: String,
        lookup: String,
    },

    #[error("lookup \"{lookup}\" in \"fonts\" refers to nonexistent entry of \"lookups\"")]
    UnknownLookup { lookup: String },
}
