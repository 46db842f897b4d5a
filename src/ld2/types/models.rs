//! Core data structures for LD2 format components.
//!
//! This module defines the fundamental types used throughout the library:
//! - Container header and index location
//! - Index header, stream directory and index records
//! - Encoding pairs and resolved entries

use std::fmt;

use encoding_rs::Encoding;

/// Size of the fixed container header.
pub const CONTAINER_HEADER_SIZE: usize = 0x60;

/// Size of the index header that precedes the index region.
pub const INDEX_HEADER_SIZE: usize = 0x1C;

/// Stride between consecutive index records in the word-index zone.
pub const INDEX_RECORD_STRIDE: usize = 10;

/// Bytes readable per index record (its own 10 bytes plus the next record's offsets).
pub const INDEX_RECORD_SPAN: usize = 18;

/// Description type that marks a file without additional information.
pub const NO_INFO_SENTINEL: u32 = 3;

/// Fixed part of the description block that follows its variable-length content.
pub const DESCRIPTION_DESCRIPTOR_SIZE: usize = 12;

/// Parsed fixed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// The four-byte ASCII tag at the start of the file (e.g. `?LD2`).
    pub magic: [u8; 4],
    pub version_major: u16,
    pub version_minor: u16,
    /// File identifier, only used for diagnostics.
    pub id: u64,
    /// Raw pointer field at `0x5C`.
    pub pointer: u32,
}

impl ContainerHeader {
    /// Offset of the description block candidate (`pointer + 0x60`).
    pub fn description_offset(&self) -> usize {
        self.pointer as usize + CONTAINER_HEADER_SIZE
    }

    /// The magic tag as text, with non-ASCII bytes replaced.
    pub fn magic_str(&self) -> String {
        String::from_utf8_lossy(&self.magic).into_owned()
    }

    pub fn version(&self) -> String {
        format!("{}.{}", self.version_major, self.version_minor)
    }
}

/// Where the index header lives, as decided by the description type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexLocation {
    /// No additional information block; the index header sits at the candidate offset.
    Direct { offset: usize },
    /// An additional information block of `length` bytes precedes the index header.
    AfterDescription {
        description_offset: usize,
        description_type: u32,
        length: u32,
        offset: usize,
    },
}

impl IndexLocation {
    /// Absolute offset of the index header.
    pub fn offset(&self) -> usize {
        match *self {
            IndexLocation::Direct { offset } => offset,
            IndexLocation::AfterDescription { offset, .. } => offset,
        }
    }

    pub fn has_description(&self) -> bool {
        matches!(self, IndexLocation::AfterDescription { .. })
    }
}

/// Parsed index header describing the compressed and inflated sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    /// Absolute offset of this header.
    pub offset: usize,
    pub dictionary_type: u32,
    /// Absolute end of the compressed data.
    pub limit: usize,
    /// Absolute start of the index region (`offset + 0x1C`).
    pub index_offset: usize,
    /// Absolute offset of the compressed stream directory.
    pub directory_offset: usize,
    /// Inflated length of the word-index zone.
    pub words_index_len: usize,
    /// Inflated length of the headword zone.
    pub words_len: usize,
    /// Inflated length of the definition (XML) zone.
    pub xml_len: usize,
}

impl IndexHeader {
    /// Number of 4-byte index group slots between the index region and the directory.
    pub fn index_group_count(&self) -> usize {
        self.directory_offset.saturating_sub(self.index_offset) / 4
    }

    /// Zone offsets inside the inflated buffer.
    pub fn zones(&self) -> ZoneLayout {
        ZoneLayout {
            words_index_len: self.words_index_len,
            words_offset: self.words_index_len,
            xml_offset: self.words_index_len + self.words_len,
            inflated_len: self.words_index_len + self.words_len + self.xml_len,
        }
    }
}

/// Offsets of the three back-to-back zones of the inflated buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneLayout {
    pub words_index_len: usize,
    pub words_offset: usize,
    pub xml_offset: usize,
    /// Expected total length of the inflated buffer.
    pub inflated_len: usize,
}

impl ZoneLayout {
    /// Number of dictionary entries (all record slots but the trailing sentinel).
    pub fn entry_count(&self) -> usize {
        (self.words_index_len / INDEX_RECORD_STRIDE).saturating_sub(1)
    }
}

/// Ordered end offsets of the deflate segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDirectory {
    /// Absolute offset of the first compressed byte.
    pub data_offset: usize,
    /// End offsets relative to `data_offset`, strictly increasing.
    pub ends: Vec<u32>,
}

impl StreamDirectory {
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Total size of the compressed data.
    pub fn compressed_len(&self) -> usize {
        self.ends.last().map(|&end| end as usize).unwrap_or(0)
    }
}

/// One record of the word-index zone.
///
/// The leading offsets are where this entry starts; the trailing ones are
/// the next record's leading offsets, i.e. where this entry ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    pub word_start: u32,
    pub xml_start: u32,
    pub flags: u8,
    pub ref_count: u8,
    pub word_end: u32,
    pub xml_end: u32,
}

/// Encodings used for the headword zone and the definition zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingPair {
    pub word: &'static Encoding,
    pub xml: &'static Encoding,
    /// Decode with replacement characters instead of failing.
    pub lenient: bool,
}

impl EncodingPair {
    /// A pair decoded strictly.
    pub fn strict(word: &'static Encoding, xml: &'static Encoding) -> Self {
        Self { word, xml, lenient: false }
    }

    /// A best-effort pair decoded with replacement characters.
    pub fn lenient(word: &'static Encoding, xml: &'static Encoding) -> Self {
        Self { word, xml, lenient: true }
    }
}

impl fmt::Display for EncodingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "words={}, xml={}", self.word.name(), self.xml.name())?;
        if self.lenient {
            write!(f, " (lenient)")?;
        }
        Ok(())
    }
}

/// A decoded dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub headword: String,
    pub definition: String,
}

impl ResolvedEntry {
    pub fn new(headword: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            headword: headword.into(),
            definition: definition.into(),
        }
    }
}
