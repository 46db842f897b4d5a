//! Settings for a conversion run.
//!
//! Everything the pipeline needs is supplied up front; nothing is asked
//! for interactively once a run has started.

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::ld2::codec::charset;
use crate::ld2::detect::{EncodingDetector, DEFAULT_SAMPLE_SIZE};
use crate::ld2::types::error::{Ld2Error, Result};

/// Maximum size of one data chunk before rolling over to the next one.
pub const DEFAULT_CHUNK_THRESHOLD: usize = 32768;

/// Size at which an index part is closed and the next one started.
pub const DEFAULT_INDEX_THRESHOLD: usize = 32000;

/// Suffix of the persisted inflated buffer.
pub const INFLATED_SUFFIX: &str = "inflated";

/// Where and how the DDIC dictionary is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub chunk_threshold: usize,
    pub index_threshold: usize,
}

impl OutputConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
            index_threshold: DEFAULT_INDEX_THRESHOLD,
        }
    }

    /// Chunk offsets are stored in 16 bits, so the chunk threshold must fit.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_threshold == 0 || self.chunk_threshold > u16::MAX as usize + 1 {
            return Err(Ld2Error::InvalidConfig(format!(
                "chunk threshold must be between 1 and {} bytes, got {}",
                u16::MAX as usize + 1,
                self.chunk_threshold
            )));
        }
        if self.index_threshold == 0 {
            return Err(Ld2Error::InvalidConfig("index threshold must be positive".to_string()));
        }
        Ok(())
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Display name stored in the DDIC header.
    pub dictionary_name: String,
    pub output: OutputConfig,
    /// Encodings probed for both zones, in order.
    pub candidates: Vec<&'static Encoding>,
    pub sample_size: usize,
    /// Fail when no candidate pair decodes the sample instead of falling back.
    pub strict_encoding: bool,
    /// Write the inflated buffer next to the output.
    pub persist_inflated: bool,
    /// Load a previously persisted inflated buffer instead of decompressing.
    pub reuse_inflated: bool,
}

impl ConvertConfig {
    pub fn new(dictionary_name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            dictionary_name: dictionary_name.into(),
            output: OutputConfig::new(output_dir),
            candidates: charset::default_candidates(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            strict_encoding: false,
            persist_inflated: true,
            reuse_inflated: false,
        }
    }

    pub fn with_chunk_threshold(mut self, bytes: usize) -> Self {
        self.output.chunk_threshold = bytes;
        self
    }

    pub fn with_index_threshold(mut self, bytes: usize) -> Self {
        self.output.index_threshold = bytes;
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<&'static Encoding>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_strict_encoding(mut self, strict: bool) -> Self {
        self.strict_encoding = strict;
        self
    }

    pub fn with_persist_inflated(mut self, persist: bool) -> Self {
        self.persist_inflated = persist;
        self
    }

    pub fn with_reuse_inflated(mut self, reuse: bool) -> Self {
        self.reuse_inflated = reuse;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;
        if self.candidates.is_empty() {
            return Err(Ld2Error::InvalidConfig("at least one candidate encoding is required".to_string()));
        }
        Ok(())
    }

    /// Builds the encoding detector described by these settings.
    pub fn detector(&self) -> Result<EncodingDetector> {
        Ok(EncodingDetector::new(self.candidates.clone())?
            .with_sample_size(self.sample_size)
            .with_strict(self.strict_encoding))
    }

    /// Path of the persisted inflated buffer for `input`.
    pub fn inflated_path(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dictionary".to_string());
        self.output
            .directory
            .join(format!("{}.{}", name, INFLATED_SUFFIX))
    }
}
