use std::fs;
use std::path::Path;

use log::info;

use super::codec::compression;
use super::format::content::InflatedDictionary;
use super::format::header;
use super::types::error::Result;
use super::types::models::*;

/// The main reader for LD2/LDX dictionary files.
///
/// The whole container is read into memory once; opening parses every
/// fixed structure up to the stream directory, and [`Ld2Reader::inflate`]
/// decompresses the dictionary data.
#[derive(Debug, Clone)]
pub struct Ld2Reader {
    data: Vec<u8>,
    pub header: ContainerHeader,
    pub location: IndexLocation,
    pub index_header: IndexHeader,
    pub streams: StreamDirectory,
}

impl Ld2Reader {
    /// Read an LD2 file from the given path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - File cannot be read
    /// - The fixed header is truncated
    /// - The file does not contain dictionary data
    /// - The stream directory is inconsistent
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening LD2 file: {}", path.display());
        let data = fs::read(path)?;
        info!("Read {} bytes", data.len());
        Self::from_bytes(data)
    }

    /// Parse a container that is already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let header = header::parse_container(&data)?;
        let location = header::locate_index(&data, &header)?;
        let index_header = header::parse_index_header(&data, location.offset())?;
        let streams = header::parse_stream_directory(&data, &index_header)?;

        Ok(Self {
            data,
            header,
            location,
            index_header,
            streams,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Zone offsets of the inflated buffer.
    pub fn zones(&self) -> ZoneLayout {
        self.index_header.zones()
    }

    /// Decompresses all deflate segments into one buffer.
    pub fn inflate(&self) -> Result<InflatedDictionary> {
        let zones = self.zones();
        let mut buffer = Vec::with_capacity(zones.inflated_len);
        compression::inflate_streams(
            &self.data,
            self.streams.data_offset,
            &self.streams.ends,
            &mut buffer,
        )?;
        info!(
            "Inflated {} segments into {} bytes ({} entries)",
            self.streams.len(),
            buffer.len(),
            zones.entry_count()
        );
        Ok(InflatedDictionary::new(buffer, zones))
    }

    /// Wraps a previously inflated buffer of this container.
    pub fn with_inflated(&self, buffer: Vec<u8>) -> InflatedDictionary {
        InflatedDictionary::new(buffer, self.zones())
    }
}
