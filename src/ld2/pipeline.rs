//! End-to-end conversion from an LD2 container to a DDIC dictionary.
//!
//! Every decode stage finishes before the writer creates its first file,
//! so a container that fails to decode never leaves a partial dictionary
//! behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::config::ConvertConfig;
use super::detect::Detection;
use super::format::content::InflatedDictionary;
use super::output::{DdicWriter, OutputSummary};
use super::reader::Ld2Reader;
use super::types::error::Result;
use super::types::models::*;

/// Diagnostics collected during a conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub header: ContainerHeader,
    pub location: IndexLocation,
    pub index_header: IndexHeader,
    pub zones: ZoneLayout,
    pub segments: usize,
    pub compressed_offset: usize,
    pub compressed_len: usize,
    pub inflated_len: usize,
    /// Where the inflated buffer was persisted, if it was.
    pub inflated_path: Option<PathBuf>,
    /// `true` if a persisted inflated buffer was loaded instead of decompressing.
    pub reused_inflated: bool,
    pub detection: Detection,
    pub output: OutputSummary,
}

/// Decodes `input` and writes it as a DDIC dictionary according to `config`.
pub fn convert(input: impl AsRef<Path>, config: &ConvertConfig) -> Result<ConversionReport> {
    let input = input.as_ref();
    config.validate()?;
    let detector = config.detector()?;
    let writer = DdicWriter::new(config.output.clone())?;

    let reader = Ld2Reader::open(input)?;
    let inflated_path = config.inflated_path(input);
    let (dict, reused_inflated) = load_or_inflate(&reader, config, &inflated_path)?;

    let persisted = if config.persist_inflated && !reused_inflated {
        fs::create_dir_all(&config.output.directory)?;
        fs::write(&inflated_path, dict.as_bytes())?;
        info!("Inflated buffer written to {}", inflated_path.display());
        Some(inflated_path)
    } else if reused_inflated {
        Some(inflated_path)
    } else {
        None
    };

    let detection = detector.detect(&dict)?;
    let entries = dict
        .entries(detection.encodings)
        .collect::<Result<Vec<ResolvedEntry>>>()?;
    info!("Resolved {} entries", entries.len());

    let output = writer.write(&config.dictionary_name, entries)?;

    Ok(ConversionReport {
        header: reader.header.clone(),
        location: reader.location,
        index_header: reader.index_header,
        zones: reader.zones(),
        segments: reader.streams.len(),
        compressed_offset: reader.streams.data_offset,
        compressed_len: reader.streams.compressed_len(),
        inflated_len: dict.as_bytes().len(),
        inflated_path: persisted,
        reused_inflated,
        detection,
        output,
    })
}

/// Loads the persisted inflated buffer when allowed and usable, otherwise inflates.
fn load_or_inflate(
    reader: &Ld2Reader,
    config: &ConvertConfig,
    inflated_path: &Path,
) -> Result<(InflatedDictionary, bool)> {
    if config.reuse_inflated && inflated_path.is_file() {
        let buffer = fs::read(inflated_path)?;
        let expected = reader.zones().inflated_len;
        if buffer.len() == expected {
            info!("Reusing inflated buffer {}", inflated_path.display());
            return Ok((reader.with_inflated(buffer), true));
        }
        warn!(
            "Ignoring {}: {} bytes, expected {}",
            inflated_path.display(),
            buffer.len(),
            expected
        );
    }
    Ok((reader.inflate()?, false))
}
