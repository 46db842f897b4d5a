//! Typed view over the word-index zone of the inflated buffer.
//!
//! Records are laid out with a 10-byte stride:
//! ```text
//! [4] headword start   [4] definition start   [1] flags   [1] reference count
//! ```
//! The start offsets of record `i + 1` are the end offsets of record `i`,
//! so reading one record touches 18 bytes. The last slot is a sentinel
//! that only provides the end offsets of the final entry.

use crate::ld2::cursor::ByteCursor;
use crate::ld2::types::error::{Ld2Error, Result};
use crate::ld2::types::models::{IndexRecord, INDEX_RECORD_SPAN, INDEX_RECORD_STRIDE};

#[derive(Debug, Clone)]
pub struct IndexTable<'a> {
    cursor: ByteCursor<'a>,
    len: usize,
}

impl<'a> IndexTable<'a> {
    /// Wraps the word-index zone.
    pub fn new(zone: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(zone, "word index"),
            len: (zone.len() / INDEX_RECORD_STRIDE).saturating_sub(1),
        }
    }

    /// Number of entries, not counting the sentinel slot.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads record `index`.
    pub fn record(&self, index: usize) -> Result<IndexRecord> {
        if index >= self.len {
            return Err(Ld2Error::InvalidEntry {
                index,
                reason: format!("index table only has {} entries", self.len),
            });
        }

        let span = self.cursor.bytes_at(index * INDEX_RECORD_STRIDE, INDEX_RECORD_SPAN)?;
        let mut cursor = ByteCursor::new(span, "index record");
        Ok(IndexRecord {
            word_start: cursor.read_u32()?,
            xml_start: cursor.read_u32()?,
            flags: cursor.read_u8()?,
            ref_count: cursor.read_u8()?,
            word_end: cursor.read_u32()?,
            xml_end: cursor.read_u32()?,
        })
    }

    /// Iterates all records in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<IndexRecord>> + '_ {
        (0..self.len).map(move |index| self.record(index))
    }
}
