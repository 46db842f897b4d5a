//! Writer for the chunked DDIC dictionary format.
//!
//! # Layout
//! ```text
//! 1.dd0, 1.dd1, ...   index parts
//!   "DDIC" [i32 entry count] [utf name]          (first part only)
//!   per entry: [u16 chunk] [u16 offset] [u16 length] [utf headword]
//! 1.ddf, 2.ddf, ...   data chunks: concatenated UTF-8 definitions
//! 1.ddp               [i32 final chunk count]
//! ```
//! Numbers are big-endian. `utf` strings are a u16 byte length followed by
//! modified UTF-8 (NUL as `C0 80`, supplementary characters as two
//! three-byte surrogates).

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, WriteBytesExt};
use log::{debug, info};

use crate::ld2::config::OutputConfig;
use crate::ld2::types::error::{Ld2Error, Result};
use crate::ld2::types::models::ResolvedEntry;

/// Tag at the start of the first index part.
pub const DDIC_TAG: &[u8; 4] = b"DDIC";

const HTML_OPEN: &str = "<html>";
const HTML_PREFIX: &str = "<html><body>";
const HTML_SUFFIX: &str = "</body></html>";

/// Path of index part `part` (`1.dd0`, `1.dd1`, ...).
pub fn index_part_path(directory: &Path, part: usize) -> PathBuf {
    directory.join(format!("1.dd{}", part))
}

pub fn chunk_path(directory: &Path, chunk: usize) -> PathBuf {
    directory.join(format!("{}.ddf", chunk))
}

pub fn pointer_path(directory: &Path) -> PathBuf {
    directory.join("1.ddp")
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSummary {
    pub entries: usize,
    pub chunks: usize,
    pub index_parts: usize,
}

/// Wraps a definition in `<html><body>...</body></html>` unless it already starts with `<html>`.
pub fn wrap_html(definition: &str) -> String {
    if definition.starts_with(HTML_OPEN) {
        definition.to_string()
    } else {
        format!("{}{}{}", HTML_PREFIX, definition, HTML_SUFFIX)
    }
}

/// Compares two strings ignoring case, character by character, then by length.
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    let mut left = a.chars();
    let mut right = b.chars();
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) => {
                if x == y {
                    continue;
                }
                let ordering = fold_case(x).cmp(&fold_case(y));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}

/// Single-character case folding: upper then lower, keeping characters
/// whose mapping expands to several characters.
fn fold_case(c: char) -> char {
    let upper = single_char(c.to_uppercase()).unwrap_or(c);
    single_char(upper.to_lowercase()).unwrap_or(upper)
}

fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Encodes `text` as a length-prefixed modified UTF-8 string.
pub fn encode_utf(text: &str, field: &'static str) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007F => body.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                body.push(0xC0 | (unit >> 6) as u8);
                body.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                body.push(0xE0 | (unit >> 12) as u8);
                body.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                body.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }

    let len = to_u16(body.len(), field)?;
    let mut encoded = Vec::with_capacity(body.len() + 2);
    encoded.write_u16::<BigEndian>(len)?;
    encoded.extend_from_slice(&body);
    Ok(encoded)
}

fn to_u16(value: usize, field: &'static str) -> Result<u16> {
    u16::try_from(value).map_err(|_| Ld2Error::FieldOverflow {
        field,
        value,
        max: u16::MAX as usize,
    })
}

/// Whether `name` is one of the files a DDIC dictionary consists of.
pub fn is_ddic_file(name: &str) -> bool {
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    name == "1.ddp"
        || name.strip_prefix("1.dd").is_some_and(digits)
        || name.strip_suffix(".ddf").is_some_and(digits)
}

/// Deletes the DDIC files of an earlier run so no stale part outlives this one.
fn remove_stale_output(directory: &Path) -> Result<()> {
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if is_ddic_file(name) && entry.file_type()?.is_file() {
            debug!("Removing stale {}", entry.path().display());
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// One encoded index record and the files it belongs to.
#[derive(Debug)]
struct PlannedRecord {
    index_part: usize,
    chunk: usize,
    bytes: Vec<u8>,
}

/// The complete index of a dictionary, encoded before any file is touched.
#[derive(Debug)]
struct Layout {
    header: Vec<u8>,
    records: Vec<PlannedRecord>,
    chunks: usize,
    index_parts: usize,
}

/// A file being written, with the number of bytes written so far.
struct CountingFile {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl CountingFile {
    fn create(path: PathBuf) -> Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(&path)?),
            path,
            written: 0,
        })
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        debug!("Wrote {} bytes to {}", self.written, self.path.display());
        Ok(())
    }
}

/// Sorts resolved entries and writes them as a DDIC dictionary.
#[derive(Debug, Clone)]
pub struct DdicWriter {
    config: OutputConfig,
}

impl DdicWriter {
    pub fn new(config: OutputConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Normalizes and sorts entries: definitions are HTML-wrapped and
    /// ordered case-insensitively by definition text; the sort is stable.
    pub fn prepare(entries: Vec<ResolvedEntry>) -> Vec<ResolvedEntry> {
        let mut entries: Vec<ResolvedEntry> = entries
            .into_iter()
            .map(|entry| ResolvedEntry {
                definition: wrap_html(&entry.definition),
                headword: entry.headword,
            })
            .collect();
        entries.sort_by(|a, b| compare_ignore_case(&a.definition, &b.definition));
        entries
    }

    /// Encodes the header and every index record, deciding chunk and
    /// index-part roll-overs. Fails on any field that does not fit.
    fn plan(&self, name: &str, entries: &[ResolvedEntry]) -> Result<Layout> {
        let entry_count = i32::try_from(entries.len()).map_err(|_| Ld2Error::FieldOverflow {
            field: "entry count",
            value: entries.len(),
            max: i32::MAX as usize,
        })?;

        let mut header = Vec::new();
        header.extend_from_slice(DDIC_TAG);
        header.write_i32::<BigEndian>(entry_count)?;
        header.extend_from_slice(&encode_utf(name, "dictionary name")?);

        let mut records = Vec::with_capacity(entries.len());
        let mut index_part = 0;
        let mut index_written = header.len();
        let mut chunk = 1;
        let mut chunk_written = 0;

        for entry in entries {
            let len = entry.definition.len();
            let length = to_u16(len, "definition length")?;

            if chunk_written > 0 && chunk_written + len >= self.config.chunk_threshold {
                chunk += 1;
                chunk_written = 0;
            }
            let offset = to_u16(chunk_written, "chunk offset")?;
            chunk_written += len;

            if index_written >= self.config.index_threshold {
                index_part += 1;
                index_written = 0;
            }

            let headword = encode_utf(&entry.headword, "headword")?;
            let mut bytes = Vec::with_capacity(6 + headword.len());
            bytes.write_u16::<BigEndian>(to_u16(chunk, "chunk number")?)?;
            bytes.write_u16::<BigEndian>(offset)?;
            bytes.write_u16::<BigEndian>(length)?;
            bytes.extend_from_slice(&headword);
            index_written += bytes.len();

            records.push(PlannedRecord {
                index_part,
                chunk,
                bytes,
            });
        }

        Ok(Layout {
            header,
            records,
            chunks: chunk,
            index_parts: index_part + 1,
        })
    }

    /// Writes `entries` under the dictionary `name`.
    ///
    /// The whole index is encoded first, so an entry that cannot be
    /// represented fails the call before any file is created or removed.
    /// DDIC files left in the directory by an earlier run are deleted.
    pub fn write(&self, name: &str, entries: Vec<ResolvedEntry>) -> Result<OutputSummary> {
        let directory = &self.config.directory;
        info!("Writing {} entries to {}", entries.len(), directory.display());

        let entries = Self::prepare(entries);
        let layout = self.plan(name, &entries)?;

        fs::create_dir_all(directory)?;
        remove_stale_output(directory)?;

        let mut index_part = 0;
        let mut index = CountingFile::create(index_part_path(directory, index_part))?;
        index.write_all(&layout.header)?;
        let mut chunk_number = 1;
        let mut chunk = CountingFile::create(chunk_path(directory, chunk_number))?;

        for (entry, record) in entries.iter().zip(&layout.records) {
            if record.chunk != chunk_number {
                chunk.finish()?;
                chunk_number = record.chunk;
                chunk = CountingFile::create(chunk_path(directory, chunk_number))?;
            }
            chunk.write_all(entry.definition.as_bytes())?;

            if record.index_part != index_part {
                index.finish()?;
                index_part = record.index_part;
                index = CountingFile::create(index_part_path(directory, index_part))?;
            }
            index.write_all(&record.bytes)?;
        }

        chunk.finish()?;
        index.finish()?;

        let mut pointer = CountingFile::create(pointer_path(directory))?;
        let mut count = Vec::with_capacity(4);
        count.write_i32::<BigEndian>(layout.chunks as i32)?;
        pointer.write_all(&count)?;
        pointer.finish()?;

        let summary = OutputSummary {
            entries: entries.len(),
            chunks: layout.chunks,
            index_parts: layout.index_parts,
        };
        info!(
            "Wrote {} entries into {} chunks and {} index parts",
            summary.entries, summary.chunks, summary.index_parts
        );
        Ok(summary)
    }
}
