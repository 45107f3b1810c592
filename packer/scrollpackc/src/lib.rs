//! Scroll packer command line tool.
//!
//! Thin driver over the library crates: load and validate the scroll
//! description, scan the text, extract the font bytes and render the
//! whole listing to stdout. All failures are fatal and reported on
//! stderr with the input file name.

mod pipeline;
mod reporting;

pub use pipeline::{pack, PackError};
pub use reporting::report;
