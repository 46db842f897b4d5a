//! Container header, description block and index header parsing.
//!
//! # Layout
//! ```text
//! 0x00  [4]  magic tag (e.g. "?LD2")
//! 0x18  [2]  version major
//! 0x1A  [2]  version minor
//! 0x1C  [8]  file identifier
//! 0x5C  [4]  pointer P; description block candidate at P + 0x60
//!
//! candidate:
//!   [4] description type (3 = no additional information)
//!   [4] description length (only meaningful if type != 3)
//!   index header at candidate (type 3) or candidate + length + 12
//!
//! index header H:
//!   H+0   [4] dictionary type
//!   H+4   [4] data length; compressed data ends at H + 8 + value
//!   H+8   [4] directory offset, relative to the index region at H + 0x1C
//!   H+12  [4] inflated word-index length
//!   H+16  [4] inflated headword length
//!   H+20  [4] inflated definition length
//! ```
//!
//! All numbers are little-endian.

use log::{debug, info, trace, warn};

use crate::ld2::cursor::ByteCursor;
use crate::ld2::types::error::{Ld2Error, Result};
use crate::ld2::types::models::{
    ContainerHeader, IndexHeader, IndexLocation, StreamDirectory, CONTAINER_HEADER_SIZE,
    DESCRIPTION_DESCRIPTOR_SIZE, INDEX_HEADER_SIZE, NO_INFO_SENTINEL,
};

/// Magic tags seen on real dictionaries.
const KNOWN_MAGICS: [&[u8; 4]; 2] = [b"?LD2", b"?LDX"];

/// Parses the fixed header at the start of the container.
pub fn parse_container(data: &[u8]) -> Result<ContainerHeader> {
    info!("Parsing LD2 container header");

    if data.len() < CONTAINER_HEADER_SIZE {
        return Err(Ld2Error::TruncatedHeader {
            expected: CONTAINER_HEADER_SIZE,
            found: data.len(),
        });
    }

    let cursor = ByteCursor::new(data, "container header");
    let mut magic = [0u8; 4];
    magic.copy_from_slice(cursor.bytes_at(0, 4)?);
    if !KNOWN_MAGICS.contains(&&magic) {
        warn!("Unknown magic tag {:?}; continuing anyway", String::from_utf8_lossy(&magic));
    }

    let header = ContainerHeader {
        magic,
        version_major: cursor.u16_at(0x18)?,
        version_minor: cursor.u16_at(0x1A)?,
        id: cursor.u64_at(0x1C)?,
        pointer: cursor.u32_at(0x5C)?,
    };

    info!(
        "Header parsed: type={}, version={}, id={:#x}, description at {:#x}",
        header.magic_str(),
        header.version(),
        header.id,
        header.description_offset()
    );
    Ok(header)
}

/// Decides where the index header starts.
///
/// If the description type is the "no information" sentinel the index
/// header sits at the candidate offset; otherwise it follows the
/// description block.
pub fn locate_index(data: &[u8], header: &ContainerHeader) -> Result<IndexLocation> {
    let candidate = header.description_offset();
    let cursor = ByteCursor::new(data, "container");

    let description_type = cursor
        .u32_at(candidate)
        .map_err(|_| missing_data(candidate, data.len()))?;
    debug!("Description type at {:#x}: {:#x}", candidate, description_type);

    let location = if description_type == NO_INFO_SENTINEL {
        IndexLocation::Direct { offset: candidate }
    } else {
        let length = cursor
            .u32_at(candidate + 4)
            .map_err(|_| missing_data(candidate + 4, data.len()))?;
        let offset = candidate + length as usize + DESCRIPTION_DESCRIPTOR_SIZE;
        debug!("Additional information block: {} bytes, index header at {:#x}", length, offset);
        IndexLocation::AfterDescription {
            description_offset: candidate,
            description_type,
            length,
            offset,
        }
    };

    if location.offset() + INDEX_HEADER_SIZE > data.len() {
        return Err(missing_data(location.offset(), data.len()));
    }
    Ok(location)
}

fn missing_data(offset: usize, size: usize) -> Ld2Error {
    Ld2Error::MissingDictionaryData { offset, size }
}

/// Parses the index header at `offset`.
pub fn parse_index_header(data: &[u8], offset: usize) -> Result<IndexHeader> {
    let cursor = ByteCursor::new(data, "index header");

    let dictionary_type = cursor.u32_at(offset)?;
    let limit = offset + 8 + cursor.u32_at(offset + 4)? as usize;
    let index_offset = offset + INDEX_HEADER_SIZE;
    let directory_offset = index_offset + cursor.u32_at(offset + 8)? as usize;

    let index_header = IndexHeader {
        offset,
        dictionary_type,
        limit,
        index_offset,
        directory_offset,
        words_index_len: cursor.u32_at(offset + 12)? as usize,
        words_len: cursor.u32_at(offset + 16)? as usize,
        xml_len: cursor.u32_at(offset + 20)? as usize,
    };

    if limit > data.len() {
        warn!(
            "Compressed data claims to end at {:#x}, past the end of the file ({:#x})",
            limit,
            data.len()
        );
    }

    debug!(
        "Dictionary type {:#x}; index {:#x} / {} B; inflated zones: {} / {} / {} B",
        dictionary_type,
        index_offset,
        directory_offset.saturating_sub(index_offset),
        index_header.words_index_len,
        index_header.words_len,
        index_header.xml_len
    );
    Ok(index_header)
}

/// Reads the end offsets of the deflate segments.
///
/// The directory starts with a leading value at `directory + 8`; offsets
/// are read while the previous value plus the current position stays below
/// the end of the compressed data. The last value read therefore points at
/// the data end, and the data itself starts right after it.
pub fn parse_stream_directory(data: &[u8], header: &IndexHeader) -> Result<StreamDirectory> {
    let mut cursor = ByteCursor::new(data, "stream directory");
    cursor.seek(header.directory_offset + 8);

    let mut value = cursor.read_u32()?;
    let mut ends = Vec::new();
    while value as usize + cursor.position() < header.limit {
        value = cursor.read_u32()?;
        trace!("Segment end offset: {:#x}", value);
        ends.push(value);
    }
    let data_offset = cursor.position();

    if ends.is_empty() {
        return Err(Ld2Error::InvalidStreamDirectory("no deflate segments listed".to_string()));
    }
    if let Some(pair) = ends.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(Ld2Error::InvalidStreamDirectory(format!(
            "end offsets are not increasing ({:#x} followed by {:#x})",
            pair[0], pair[1]
        )));
    }
    let data_end = data_offset + ends[ends.len() - 1] as usize;
    if data_end > data.len() {
        return Err(Ld2Error::InvalidStreamDirectory(format!(
            "compressed data ends at {:#x}, past the end of a {} byte file",
            data_end,
            data.len()
        )));
    }

    info!(
        "Found {} deflate segments: data at {:#x} / {} B",
        ends.len(),
        data_offset,
        data_end - data_offset
    );
    Ok(StreamDirectory { data_offset, ends })
}
