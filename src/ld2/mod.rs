//! Core LD2 reader module

pub mod codec;
pub mod config;
pub mod cursor;
pub mod detect;
pub mod format;
pub mod iter;
pub mod output;
pub mod pipeline;
pub mod reader;
pub mod types;

pub use config::{ConvertConfig, OutputConfig};
pub use detect::{Detection, EncodingDetector, ProbeOutcome};
pub use format::content::InflatedDictionary;
pub use output::{DdicWriter, OutputSummary};
pub use pipeline::{convert, ConversionReport};
pub use reader::Ld2Reader;
pub use types::error::{Ld2Error, Result};
pub use types::models;
