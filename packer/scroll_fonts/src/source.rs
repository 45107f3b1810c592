//! Byte-addressable font sources.
//!
//! The extractor only ever needs single bytes at computed offsets, so
//! the seam is exactly that: [`FontSource::read_at`]. Production runs
//! use [`FileFontSource`]; tests and embedders use [`MemFontSource`].

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use rustc_hash::FxHashMap;
use scroll_config::FontSet;
use tracing::debug;

use crate::FontError;

/// Random-access byte reads into one font file.
pub trait FontSource {
    fn read_at(&mut self, offset: u64) -> io::Result<u8>;

    /// Release the source. The default is a no-op. Plain files close on
    /// drop and cannot report a failure; implementations whose release
    /// genuinely can fail surface the error here.
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for dyn FontSource + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FontSource")
    }
}

/// A font source backed by an open [`File`].
pub struct FileFontSource {
    file: File,
}

impl FileFontSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }
}

impl FontSource for FileFontSource {
    fn read_at(&mut self, offset: u64) -> io::Result<u8> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut byte = [0u8; 1];
        self.file.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}

/// An in-memory font source.
pub struct MemFontSource {
    bytes: Vec<u8>,
}

impl MemFontSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl FontSource for MemFontSource {
    fn read_at(&mut self, offset: u64) -> io::Result<u8> {
        usize::try_from(offset)
            .ok()
            .and_then(|offset| self.bytes.get(offset))
            .copied()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "offset past end of font data")
            })
    }
}

#[derive(Debug)]
struct NamedSource {
    file: String,
    source: Box<dyn FontSource>,
}

/// The open font sources of one pack run, keyed by set name.
///
/// All files are opened up front so a missing font fails the run before
/// any extraction happens, and every source stays open until [`close`]
/// releases the whole table.
///
/// [`close`]: FontSources::close
#[derive(Debug, Default)]
pub struct FontSources {
    table: FxHashMap<String, NamedSource>,
}

impl FontSources {
    /// Open one [`FileFontSource`] per font set.
    pub fn open_files(fonts: &[FontSet]) -> Result<Self, FontError> {
        let mut sources = Self::default();
        for font in fonts {
            debug!(set = %font.set, file = %font.file, "opening font file");
            let source = FileFontSource::open(&font.file).map_err(|source| {
                FontError::Unavailable {
                    file: font.file.clone(),
                    source,
                }
            })?;
            sources.insert(&font.set, &font.file, Box::new(source));
        }
        Ok(sources)
    }

    /// Register a source for `set`. A second insert for the same set
    /// replaces the first.
    pub fn insert(&mut self, set: &str, file: &str, source: Box<dyn FontSource>) {
        self.table.insert(
            set.to_string(),
            NamedSource {
                file: file.to_string(),
                source,
            },
        );
    }

    /// The source registered for `set`, with its file name for error
    /// reporting.
    pub(crate) fn source_for(
        &mut self,
        set: &str,
    ) -> Result<(&str, &mut dyn FontSource), FontError> {
        let named = self.table.get_mut(set).ok_or_else(|| FontError::UnknownSet {
            set: set.to_string(),
        })?;
        Ok((named.file.as_str(), named.source.as_mut()))
    }

    /// Release every source, surfacing the first close failure.
    pub fn close(self) -> Result<(), FontError> {
        for (_, named) in self.table {
            named.source.close().map_err(|source| FontError::CloseFailed {
                file: named.file,
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mem_source_reads_bytes() {
        let mut source = MemFontSource::new(vec![10, 20, 30]);
        assert_eq!(source.read_at(0).unwrap(), 10);
        assert_eq!(source.read_at(2).unwrap(), 30);
    }

    #[test]
    fn mem_source_fails_past_end() {
        let mut source = MemFontSource::new(vec![10]);
        let err = source.read_at(1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn file_source_reads_and_closes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[1, 2, 3, 4]).unwrap();
        file.flush().unwrap();

        let mut source = FileFontSource::open(file.path()).unwrap();
        assert_eq!(source.read_at(3).unwrap(), 4);
        assert_eq!(source.read_at(0).unwrap(), 1);
        assert!(source.read_at(4).is_err());
        Box::new(source).close().unwrap();
    }

    struct BrokenClose;

    impl FontSource for BrokenClose {
        fn read_at(&mut self, _offset: u64) -> io::Result<u8> {
            Ok(0)
        }

        fn close(self: Box<Self>) -> io::Result<()> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn close_failure_names_the_file() {
        let mut sources = FontSources::default();
        sources.insert("[", "font.bin", Box::new(BrokenClose));
        let err = sources.close().unwrap_err();
        assert!(matches!(err, FontError::CloseFailed { file, .. } if file == "font.bin"));
    }

    #[test]
    fn open_files_fails_on_missing_font() {
        let fonts = vec![FontSet {
            set: "[".to_string(),
            set_default: None,
            set_or: None,
            file: "/nonexistent/font.bin".to_string(),
            lookup: "main".to_string(),
        }];
        let err = FontSources::open_files(&fonts).unwrap_err();
        assert!(matches!(err, FontError::Unavailable { file, .. } if file == "/nonexistent/font.bin"));
    }

    #[test]
    fn unknown_set_is_reported() {
        let mut sources = FontSources::default();
        let err = sources.source_for("missing").unwrap_err();
        assert!(matches!(err, FontError::UnknownSet { set } if set == "missing"));
    }
}
