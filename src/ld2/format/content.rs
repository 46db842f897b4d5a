//! # Inflated Content & Cross-Reference Resolution
//!
//! This module owns the inflated buffer and turns index records into
//! `(headword, definition)` pairs. It sits between the high-level `reader`
//! (which handles I/O and decompression) and the low-level `codec`
//! (which handles text decoding).
//!
//! ## Responsibilities
//! 1.  **Zones**: Splits the inflated buffer into the word-index, headword
//!     and definition zones.
//! 2.  **Definitions**: Decodes and strips an entry's own definition range.
//! 3.  **References**: Follows an entry's references (one level deep) and
//!     merges the referenced definitions.
//! 4.  **Headwords**: Decodes the headword that follows the reference list.

use log::{trace, warn};

use crate::ld2::codec::charset;
use crate::ld2::cursor::ByteCursor;
use crate::ld2::format::{index::IndexTable, markup};
use crate::ld2::types::error::{Ld2Error, Result};
use crate::ld2::types::models::{EncodingPair, IndexRecord, ResolvedEntry, ZoneLayout};

/// Separator placed between merged referenced definitions.
pub const REFERENCE_SEPARATOR: &str = ", ";

/// The concatenated output of all deflate segments.
#[derive(Debug, Clone)]
pub struct InflatedDictionary {
    buffer: Vec<u8>,
    zones: ZoneLayout,
}

impl InflatedDictionary {
    /// Wraps an inflated buffer laid out as described by `zones`.
    pub fn new(buffer: Vec<u8>, zones: ZoneLayout) -> Self {
        if buffer.len() != zones.inflated_len {
            warn!(
                "Inflated buffer is {} bytes, but the index header announces {} bytes",
                buffer.len(),
                zones.inflated_len
            );
        }
        Self { buffer, zones }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn zones(&self) -> &ZoneLayout {
        &self.zones
    }

    /// Number of dictionary entries.
    pub fn entry_count(&self) -> usize {
        self.index().len()
    }

    /// Typed view over the word-index zone.
    pub fn index(&self) -> IndexTable<'_> {
        let end = self.zones.words_index_len.min(self.buffer.len());
        IndexTable::new(&self.buffer[..end])
    }

    /// Resolves entry `index` using the given encodings.
    pub fn resolve(&self, index: usize, encodings: &EncodingPair) -> Result<ResolvedEntry> {
        resolve_entry(self, index, encodings)
    }

    fn zone_cursor(&self) -> ByteCursor<'_> {
        ByteCursor::new(&self.buffer, "inflated buffer")
    }
}

/// Resolves one entry into its headword and plain-text definition.
///
/// The entry's own definition seeds the result. Each reference then
/// contributes the definition of the referenced record, prepended with
/// [`REFERENCE_SEPARATOR`] unless the result is still empty, so the last
/// reference ends up first. References are followed one level only: the
/// referenced record's own references are ignored.
pub fn resolve_entry(
    dict: &InflatedDictionary,
    index: usize,
    encodings: &EncodingPair,
) -> Result<ResolvedEntry> {
    let table = dict.index();
    let cursor = dict.zone_cursor();
    let zones = dict.zones();

    let record = table.record(index)?;
    let mut definition = read_definition(dict, index, &record, encodings)?;

    let mut word_pos = record.word_start as usize;
    for _ in 0..record.ref_count {
        let reference = cursor.u32_at(zones.words_offset + word_pos)?;
        if reference as usize >= table.len() {
            return Err(Ld2Error::DanglingReference {
                entry: index,
                reference,
                entry_count: table.len(),
            });
        }
        trace!("Entry {} references entry {}", index, reference);

        let target = table.record(reference as usize)?;
        let text = read_definition(dict, reference as usize, &target, encodings)?;
        definition = if definition.is_empty() {
            text
        } else {
            format!("{}{}{}", text, REFERENCE_SEPARATOR, definition)
        };
        word_pos += 4;
    }

    let word_bytes = zone_range(
        &cursor,
        index,
        "headword",
        zones.words_offset,
        word_pos,
        record.word_end as usize,
    )?;
    let headword = charset::decode(word_bytes, encodings.word, encodings.lenient)?;

    Ok(ResolvedEntry { headword, definition })
}

/// Decodes and strips the definition range of `record`.
fn read_definition(
    dict: &InflatedDictionary,
    index: usize,
    record: &IndexRecord,
    encodings: &EncodingPair,
) -> Result<String> {
    let cursor = dict.zone_cursor();
    let bytes = zone_range(
        &cursor,
        index,
        "definition",
        dict.zones().xml_offset,
        record.xml_start as usize,
        record.xml_end as usize,
    )?;
    let xml = charset::decode(bytes, encodings.xml, encodings.lenient)?;
    Ok(markup::strip(&xml))
}

fn zone_range<'a>(
    cursor: &ByteCursor<'a>,
    index: usize,
    what: &str,
    zone_offset: usize,
    start: usize,
    end: usize,
) -> Result<&'a [u8]> {
    if end < start {
        return Err(Ld2Error::InvalidEntry {
            index,
            reason: format!("{} range [{:#x}, {:#x}) is reversed", what, start, end),
        });
    }
    cursor.bytes_at(zone_offset + start, end - start)
}
