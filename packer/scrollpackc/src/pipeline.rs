//! The end-to-end pack pipeline.

use scroll_config::{ConfigError, ScrollConfig};
use scroll_emit::{render_fonts, render_header, render_text};
use scroll_fonts::{FontData, FontError, FontSources};
use scroll_scan::{scan, ScanError};
use thiserror::Error;
use tracing::debug;

/// Any failure of one pack run.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The scan failed. Carries the assembled scroll text so reporting
    /// can render a span over it.
    #[error("{source}")]
    Scan {
        source: ScanError,
        scroll_text: String,
    },

    #[error("{0}")]
    Font(#[from] FontError),
}

/// Run the whole pipeline for the scroll description at `path` and
/// return the rendered listing. `timestamp` is preformatted so callers
/// (and tests) control the header.
pub fn pack(path: &str, timestamp: &str) -> Result<String, PackError> {
    let config = ScrollConfig::load(path)?;
    let scroll_text = config.scroll_text();
    debug!(length = scroll_text.len(), "scroll text assembled");

    let output = scan(&scroll_text, &config).map_err(|source| PackError::Scan {
        source,
        scroll_text: scroll_text.clone(),
    })?;

    let mut sources = FontSources::open_files(&config.fonts)?;
    let data = FontData::extract(&output.dedup, &config.parameters, &mut sources)?;
    sources.close()?;

    let mut listing = render_header(&config.parameters, path, timestamp);
    listing.push_str(&render_text(
        &config.parameters,
        &output.tokens,
        output.dedup.len(),
    ));
    listing.push_str(&render_fonts(&config.parameters, &output.dedup, &data));
    Ok(listing)
}
