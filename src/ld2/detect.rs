//! Trial detection of the headword and definition encodings.
//!
//! The container carries no encoding metadata. The detector resolves a
//! small sample of entries under every `(headword, definition)` pair of
//! candidate encodings, in order, and keeps the first pair that decodes
//! the whole sample without a single malformed sequence.

use encoding_rs::{Encoding, UTF_16LE};
use log::{debug, info, warn};

use crate::ld2::codec::charset;
use crate::ld2::format::content::InflatedDictionary;
use crate::ld2::types::error::{Ld2Error, Result};
use crate::ld2::types::models::EncodingPair;

/// Number of entries probed per candidate pair.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Result of probing one candidate pair.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// Every sampled entry decoded cleanly.
    Accepted,
    /// The sampled entry `entry` could not be decoded.
    Rejected { entry: usize, error: Ld2Error },
}

impl ProbeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ProbeOutcome::Accepted)
    }
}

/// Chosen encodings and how they were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub encodings: EncodingPair,
    /// `true` if no candidate pair succeeded and the fallback was used.
    pub fell_back: bool,
}

/// Immutable detector settings.
#[derive(Debug, Clone)]
pub struct EncodingDetector {
    candidates: Vec<&'static Encoding>,
    sample_size: usize,
    fallback: (&'static Encoding, &'static Encoding),
    strict: bool,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self {
            candidates: charset::default_candidates(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            fallback: (UTF_16LE, UTF_16LE),
            strict: false,
        }
    }
}

impl EncodingDetector {
    /// A detector probing `candidates` in the given order.
    pub fn new(candidates: Vec<&'static Encoding>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Ld2Error::InvalidConfig("at least one candidate encoding is required".to_string()));
        }
        Ok(Self {
            candidates,
            ..Self::default()
        })
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Pair used when no candidate pair decodes the sample.
    pub fn with_fallback(mut self, word: &'static Encoding, xml: &'static Encoding) -> Self {
        self.fallback = (word, xml);
        self
    }

    /// Fail instead of falling back when detection is exhausted.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn candidates(&self) -> &[&'static Encoding] {
        &self.candidates
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Resolves the sample under `encodings` with strict decoding.
    ///
    /// Decoding failures reject the pair. Structural failures such as a
    /// dangling reference do not depend on the encodings and are returned
    /// as errors.
    pub fn probe(&self, dict: &InflatedDictionary, encodings: &EncodingPair) -> Result<ProbeOutcome> {
        let strict = EncodingPair::strict(encodings.word, encodings.xml);
        let sample = dict.entry_count().min(self.sample_size);

        for entry in 0..sample {
            match dict.resolve(entry, &strict) {
                Ok(_) => {}
                Err(error @ Ld2Error::Charset { .. }) => {
                    return Ok(ProbeOutcome::Rejected { entry, error });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(ProbeOutcome::Accepted)
    }

    /// Picks the first candidate pair that decodes the sample.
    pub fn detect(&self, dict: &InflatedDictionary) -> Result<Detection> {
        let sample = dict.entry_count().min(self.sample_size);
        info!(
            "Detecting encodings over {} candidates using {} sample entries",
            self.candidates.len(),
            sample
        );

        for &word in &self.candidates {
            for &xml in &self.candidates {
                let pair = EncodingPair::strict(word, xml);
                match self.probe(dict, &pair)? {
                    ProbeOutcome::Accepted => {
                        info!("Detected encodings: {}", pair);
                        return Ok(Detection {
                            encodings: pair,
                            fell_back: false,
                        });
                    }
                    ProbeOutcome::Rejected { entry, error } => {
                        debug!("Rejected {} at entry {}: {}", pair, entry, error);
                    }
                }
            }
        }

        if self.strict {
            return Err(Ld2Error::EncodingDetectionExhausted {
                candidates: self.candidates.len(),
                sample,
            });
        }

        let pair = EncodingPair::lenient(self.fallback.0, self.fallback.1);
        warn!("Encoding detection failed, falling back to {}", pair);
        Ok(Detection {
            encodings: pair,
            fell_back: true,
        })
    }
}
