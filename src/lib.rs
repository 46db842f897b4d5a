//! # ld2-reader
//!
//! A reader for Lingoes LD2/LDX dictionary files.
//! Decodes the container, detects the text encodings by trial and exports
//! the entries to the chunked DDIC dictionary format.
pub mod ld2;

// Re-export the main types for convenience
pub use ld2::{
    convert,
    ConversionReport,
    ConvertConfig,
    DdicWriter,
    EncodingDetector,
    InflatedDictionary,
    Ld2Error,
    Ld2Reader,
    OutputConfig,
    Result,
    models::{
        ContainerHeader,
        EncodingPair,
        IndexHeader,
        IndexLocation,
        IndexRecord,
        ResolvedEntry,
    },
};
