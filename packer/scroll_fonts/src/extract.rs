//! Mosaic glyph byte extraction.
//!
//! A glyph is a `width x height` mosaic of 8x8-pixel tiles. Each dedup
//! entry's `offsets` name the font-file cell of every tile, row-major.
//! A cell is 8 consecutive bytes, one per pixel sub-row, at absolute
//! file offset `cell * 8`. Extraction walks tile rows top to bottom and
//! within a row reads each tile's 8 bytes in column order, so one
//! extracted row is `width * 8` bytes.

use scroll_config::Parameters;
use scroll_scan::DedupEntry;
use tracing::debug;

use crate::source::{FontSource, FontSources};
use crate::FontError;

/// One extracted glyph: `height` rows of `width * 8` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBytes {
    pub rows: Vec<Vec<u8>>,
}

/// Read one glyph's pixel bytes out of `source`.
pub fn extract_glyph(
    entry: &DedupEntry,
    params: &Parameters,
    file: &str,
    source: &mut dyn FontSource,
) -> Result<GlyphBytes, FontError> {
    let width = usize::from(params.width);
    let mut rows = Vec::with_capacity(usize::from(params.height));
    for tile_row in entry.offsets.chunks(width) {
        let mut row = Vec::with_capacity(width * 8);
        for &cell in tile_row {
            for sub_row in 0..8u64 {
                let offset = u64::from(cell) * 8 + sub_row;
                let byte = source.read_at(offset).map_err(|source| FontError::Read {
                    file: file.to_string(),
                    offset,
                    source,
                })?;
                row.push(byte);
            }
        }
        rows.push(row);
    }
    Ok(GlyphBytes { rows })
}

/// Pixel bytes for every glyph of one pack run, in dedup order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontData {
    glyphs: Vec<GlyphBytes>,
}

/// One emitted row of one glyph. `glyph` indexes the dedup table, so
/// callers can recover the tag and set for listing comments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowChunk<'a> {
    pub glyph: usize,
    pub row: usize,
    pub bytes: &'a [u8],
}

impl FontData {
    /// Extract every dedup entry's glyph through the open `sources`.
    pub fn extract(
        dedup: &[DedupEntry],
        params: &Parameters,
        sources: &mut FontSources,
    ) -> Result<Self, FontError> {
        let mut glyphs = Vec::with_capacity(dedup.len());
        for entry in dedup {
            debug!(tag = %entry.tag, set = %entry.set, "extracting glyph");
            let (file, source) = sources.source_for(&entry.set)?;
            glyphs.push(extract_glyph(entry, params, file, source)?);
        }
        Ok(Self { glyphs })
    }

    pub fn glyph(&self, index: usize) -> Option<&GlyphBytes> {
        self.glyphs.get(index)
    }

    /// All rows in emission order.
    ///
    /// Glyph-major order (all rows of glyph 0, then glyph 1, ...) when
    /// the parameters consolidate; otherwise row-major (row 0 of every
    /// glyph, then row 1 of every glyph, ...). The bytes themselves are
    /// identical either way.
    pub fn emission(&self, params: &Parameters) -> Vec<RowChunk<'_>> {
        let mut chunks = Vec::new();
        if params.glyph_major() {
            for (glyph, bytes) in self.glyphs.iter().enumerate() {
                for (row, bytes) in bytes.rows.iter().enumerate() {
                    chunks.push(RowChunk { glyph, row, bytes });
                }
            }
        } else {
            for row in 0..usize::from(params.height) {
                for (glyph, bytes) in self.glyphs.iter().enumerate() {
                    if let Some(bytes) = bytes.rows.get(row) {
                        chunks.push(RowChunk { glyph, row, bytes });
                    }
                }
            }
        }
        chunks
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use pretty_assertions::assert_eq;
    use scroll_config::{Language, NumberFormat};

    use crate::source::MemFontSource;

    use super::*;

    fn params(width: u8, height: u8, consolidation: Option<bool>) -> Parameters {
        Parameters {
            width,
            height,
            begin: 0,
            zero: false,
            language: Language::C,
            format: NumberFormat::Hex,
            consolidation,
            text_org: None,
            fonts_org: Vec::new(),
        }
    }

    fn entry(set: &str, offsets: Vec<u32>) -> DedupEntry {
        DedupEntry {
            code: 0,
            tag: "A".to_string(),
            set: set.to_string(),
            file: "font.bin".to_string(),
            offsets,
            or: None,
        }
    }

    /// Cell `n` holds the bytes `n*8 .. n*8+8`, so extracted bytes name
    /// their own file offsets.
    fn counting_font(cells: u8) -> MemFontSource {
        MemFontSource::new((0..cells * 8).collect())
    }

    #[test]
    fn single_tile_glyph_reads_one_cell() {
        let mut source = counting_font(8);
        let glyph = extract_glyph(&entry("[", vec![5]), &params(1, 1, None), "f", &mut source)
            .unwrap();
        // Cell 5 is the 8 bytes at absolute offsets 40..=47.
        assert_eq!(glyph.rows, vec![vec![40, 41, 42, 43, 44, 45, 46, 47]]);
    }

    #[test]
    fn tiles_within_a_row_are_read_in_column_order() {
        let mut source = counting_font(4);
        let glyph = extract_glyph(
            &entry("[", vec![1, 0]),
            &params(2, 1, None),
            "f",
            &mut source,
        )
        .unwrap();
        // Cell 1's 8 bytes, then cell 0's.
        assert_eq!(
            glyph.rows,
            vec![vec![8, 9, 10, 11, 12, 13, 14, 15, 0, 1, 2, 3, 4, 5, 6, 7]]
        );
    }

    #[test]
    fn tile_rows_become_separate_glyph_rows() {
        let mut source = counting_font(4);
        let glyph = extract_glyph(
            &entry("[", vec![0, 3]),
            &params(1, 2, Some(false)),
            "f",
            &mut source,
        )
        .unwrap();
        assert_eq!(
            glyph.rows,
            vec![
                vec![0, 1, 2, 3, 4, 5, 6, 7],
                vec![24, 25, 26, 27, 28, 29, 30, 31],
            ]
        );
    }

    #[test]
    fn read_failure_names_file_and_offset() {
        let mut source = MemFontSource::new(vec![0; 8]);
        let err = extract_glyph(&entry("[", vec![1]), &params(1, 1, None), "f.bin", &mut source)
            .unwrap_err();
        assert!(matches!(
            err,
            FontError::Read { file, offset: 8, .. } if file == "f.bin"
        ));
    }

    fn two_glyph_data(consolidation: Option<bool>) -> (FontData, Parameters) {
        let params = params(1, 2, consolidation);
        let mut sources = FontSources::default();
        sources.insert("[", "f", Box::new(counting_font(4)));
        let dedup = vec![entry("[", vec![0, 1]), entry("[", vec![2, 3])];
        let data = FontData::extract(&dedup, &params, &mut sources).unwrap();
        (data, params)
    }

    #[test]
    fn emission_glyph_major_when_consolidated() {
        let (data, params) = two_glyph_data(Some(true));
        let order: Vec<(usize, usize)> = data
            .emission(&params)
            .iter()
            .map(|chunk| (chunk.glyph, chunk.row))
            .collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn emission_row_major_when_not_consolidated() {
        let (data, params) = two_glyph_data(Some(false));
        let order: Vec<(usize, usize)> = data
            .emission(&params)
            .iter()
            .map(|chunk| (chunk.glyph, chunk.row))
            .collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn emission_bytes_identical_in_both_orders() {
        let (consolidated, params_a) = two_glyph_data(Some(true));
        let (split, params_b) = two_glyph_data(Some(false));
        let mut a: Vec<Vec<u8>> = consolidated
            .emission(&params_a)
            .iter()
            .map(|chunk| chunk.bytes.to_vec())
            .collect();
        let mut b: Vec<Vec<u8>> = split
            .emission(&params_b)
            .iter()
            .map(|chunk| chunk.bytes.to_vec())
            .collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn single_row_glyphs_are_always_glyph_major() {
        let params = params(1, 1, None);
        assert!(params.glyph_major());
    }

    #[test]
    fn extract_resolves_each_entry_through_its_set() {
        let params = params(1, 1, None);
        let mut sources = FontSources::default();
        sources.insert("[1", "f1", Box::new(counting_font(2)));
        sources.insert("[2", "f2", Box::new(MemFontSource::new(vec![0xFF; 16])));
        let dedup = vec![entry("[1", vec![0]), entry("[2", vec![1])];
        let data = FontData::extract(&dedup, &params, &mut sources).unwrap();
        assert_eq!(
            data.glyph(0).unwrap().rows,
            vec![vec![0, 1, 2, 3, 4, 5, 6, 7]]
        );
        assert_eq!(data.glyph(1).unwrap().rows, vec![vec![0xFF; 8]]);
    }

    #[test]
    fn extract_fails_for_unregistered_set() {
        let params = params(1, 1, None);
        let mut sources = FontSources::default();
        let dedup = vec![entry("[", vec![0])];
        let err = FontData::extract(&dedup, &params, &mut sources).unwrap_err();
        assert!(matches!(err, FontError::UnknownSet { set } if set == "["));
    }
}
