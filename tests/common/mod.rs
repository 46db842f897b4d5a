//! Builders for synthetic LD2 containers.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

pub const POINTER: u32 = 0x10;
pub const DICTIONARY_TYPE: u32 = 3;

/// One entry as stored in the inflated zones.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub headword: Vec<u8>,
    pub xml: Vec<u8>,
    pub refs: Vec<u32>,
}

impl RawEntry {
    pub fn utf8(headword: &str, xml: &str) -> Self {
        Self {
            headword: headword.as_bytes().to_vec(),
            xml: xml.as_bytes().to_vec(),
            refs: Vec::new(),
        }
    }

    pub fn utf16le(headword: &str, xml: &str) -> Self {
        Self {
            headword: utf16le(headword),
            xml: utf16le(xml),
            refs: Vec::new(),
        }
    }

    pub fn with_refs(mut self, refs: &[u32]) -> Self {
        self.refs = refs.to_vec();
        self
    }
}

pub fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("compress");
    encoder.finish().expect("finish zlib stream")
}

/// The three inflated zones of a dictionary.
#[derive(Debug, Clone)]
pub struct Zones {
    pub words_index: Vec<u8>,
    pub words: Vec<u8>,
    pub xml: Vec<u8>,
}

impl Zones {
    pub fn concat(&self) -> Vec<u8> {
        let mut buffer = self.words_index.clone();
        buffer.extend_from_slice(&self.words);
        buffer.extend_from_slice(&self.xml);
        buffer
    }
}

/// Lays out entries into the word-index, headword and definition zones.
pub fn build_zones(entries: &[RawEntry]) -> Zones {
    let mut words_index = Vec::new();
    let mut words = Vec::new();
    let mut xml = Vec::new();

    for entry in entries {
        words_index.extend_from_slice(&(words.len() as u32).to_le_bytes());
        words_index.extend_from_slice(&(xml.len() as u32).to_le_bytes());
        words_index.push(0);
        words_index.push(entry.refs.len() as u8);
        for reference in &entry.refs {
            words.extend_from_slice(&reference.to_le_bytes());
        }
        words.extend_from_slice(&entry.headword);
        xml.extend_from_slice(&entry.xml);
    }
    // Sentinel slot holding the end offsets of the last entry.
    words_index.extend_from_slice(&(words.len() as u32).to_le_bytes());
    words_index.extend_from_slice(&(xml.len() as u32).to_le_bytes());
    words_index.extend_from_slice(&[0, 0]);

    Zones { words_index, words, xml }
}

/// Builds a complete container.
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    entries: Vec<RawEntry>,
    segments: usize,
    description: Option<Vec<u8>>,
    magic: [u8; 4],
}

impl ContainerBuilder {
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self {
            entries,
            segments: 1,
            description: None,
            magic: *b"?LD2",
        }
    }

    /// Splits the inflated buffer into `segments` independently deflated parts.
    pub fn segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Adds an additional information block.
    pub fn description(mut self, content: &[u8]) -> Self {
        self.description = Some(content.to_vec());
        self
    }

    pub fn magic(mut self, magic: &[u8; 4]) -> Self {
        self.magic = *magic;
        self
    }

    pub fn zones(&self) -> Zones {
        build_zones(&self.entries)
    }

    /// Offset at which the index header is written.
    pub fn index_header_offset(&self) -> usize {
        let candidate = POINTER as usize + 0x60;
        match &self.description {
            None => candidate,
            Some(content) => candidate + 12 + content.len(),
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let zones = self.zones();
        let inflated = zones.concat();

        let mut compressed = Vec::new();
        let mut ends = Vec::new();
        let step = inflated.len().div_ceil(self.segments.max(1)).max(1);
        for part in inflated.chunks(step) {
            compressed.extend_from_slice(&zlib(part));
            ends.push(compressed.len() as u32);
        }

        let mut data = vec![0u8; 0x60];
        data[..4].copy_from_slice(&self.magic);
        data[0x18..0x1A].copy_from_slice(&2u16.to_le_bytes());
        data[0x1A..0x1C].copy_from_slice(&5u16.to_le_bytes());
        data[0x1C..0x24].copy_from_slice(&0x1122_3344_5566_7788u64.to_le_bytes());
        data[0x5C..0x60].copy_from_slice(&POINTER.to_le_bytes());
        data.extend_from_slice(&vec![0xAB; POINTER as usize]);

        if let Some(content) = &self.description {
            data.extend_from_slice(&1u32.to_le_bytes());
            data.extend_from_slice(&(content.len() as u32).to_le_bytes());
            data.extend_from_slice(&[0; 4]);
            data.extend_from_slice(content);
        }

        let header_offset = data.len();
        let index_groups = 2usize;
        let directory_rel = index_groups * 4;
        let directory_offset = header_offset + 0x1C + directory_rel;
        let data_offset = directory_offset + 12 + ends.len() * 4;
        let limit = data_offset + compressed.len();

        data.extend_from_slice(&DICTIONARY_TYPE.to_le_bytes());
        data.extend_from_slice(&((limit - header_offset - 8) as u32).to_le_bytes());
        data.extend_from_slice(&(directory_rel as u32).to_le_bytes());
        data.extend_from_slice(&(zones.words_index.len() as u32).to_le_bytes());
        data.extend_from_slice(&(zones.words.len() as u32).to_le_bytes());
        data.extend_from_slice(&(zones.xml.len() as u32).to_le_bytes());
        data.extend_from_slice(&[0; 4]);
        for group in 0..index_groups {
            data.extend_from_slice(&(group as u32).to_le_bytes());
        }

        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&((ends.len() * 4) as u32).to_le_bytes());
        for end in &ends {
            data.extend_from_slice(&end.to_le_bytes());
        }
        assert_eq!(data.len(), data_offset);
        data.extend_from_slice(&compressed);
        data
    }
}

/// A parsed DDIC index record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdicRecord {
    pub chunk: u16,
    pub offset: u16,
    pub length: u16,
    pub headword: String,
}

fn read_u16(data: &[u8], pos: &mut usize) -> u16 {
    let value = u16::from_be_bytes([data[*pos], data[*pos + 1]]);
    *pos += 2;
    value
}

fn read_utf(data: &[u8], pos: &mut usize) -> String {
    let len = read_u16(data, pos) as usize;
    let text = String::from_utf8(data[*pos..*pos + len].to_vec()).expect("ascii or bmp text");
    *pos += len;
    text
}

/// Parses the first index part: returns (entry count, name, records).
pub fn parse_index_head(data: &[u8]) -> (i32, String, Vec<DdicRecord>) {
    assert_eq!(&data[..4], b"DDIC");
    let count = i32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    let mut pos = 8;
    let name = read_utf(data, &mut pos);
    (count, name, parse_records(&data[pos..]))
}

/// Parses a sequence of index records.
pub fn parse_records(data: &[u8]) -> Vec<DdicRecord> {
    let mut pos = 0;
    let mut records = Vec::new();
    while pos < data.len() {
        let chunk = read_u16(data, &mut pos);
        let offset = read_u16(data, &mut pos);
        let length = read_u16(data, &mut pos);
        let headword = read_utf(data, &mut pos);
        records.push(DdicRecord {
            chunk,
            offset,
            length,
            headword,
        });
    }
    records
}
