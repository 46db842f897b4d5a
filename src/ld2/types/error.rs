//! Custom error types for the ld2-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum Ld2Error {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The buffer is too short to hold the fixed container header.
    #[error("Truncated header: expected at least {expected} bytes, but found {found} bytes")]
    TruncatedHeader { expected: usize, found: usize },

    /// The description block or the index header lies outside the file.
    #[error("File does not contain dictionary data (offset {offset:#x}, file size {size} bytes)")]
    MissingDictionaryData { offset: usize, size: usize },

    /// The directory of deflate segments is not usable.
    #[error("Invalid stream directory: {0}")]
    InvalidStreamDirectory(String),

    /// A deflate segment failed to decompress.
    #[error("Corrupt deflate stream #{segment} at offset {offset:#x}: {source}")]
    CorruptStream {
        segment: usize,
        offset: usize,
        #[source]
        source: std::io::Error,
    },

    /// A cross-reference points outside the index table.
    #[error("Entry {entry} references entry {reference}, but only {entry_count} entries exist")]
    DanglingReference {
        entry: usize,
        reference: u32,
        entry_count: usize,
    },

    /// An index record describes an impossible byte range.
    #[error("Invalid index entry {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    /// A fixed-width read ran past the end of its buffer.
    #[error("Read of {len} bytes at offset {offset:#x} is out of bounds for {context} of {size} bytes")]
    OutOfBounds {
        context: &'static str,
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Strict decoding found a malformed or unmappable byte sequence.
    #[error("Cannot decode {len} bytes as {encoding}")]
    Charset { encoding: &'static str, len: usize },

    /// No candidate encoding pair decoded the sample entries cleanly.
    #[error("No encoding pair out of {candidates} candidates decodes the first {sample} entries")]
    EncodingDetectionExhausted { candidates: usize, sample: usize },

    /// A value does not fit into its field of the output format.
    #[error("Value {value} does not fit into the {field} field (max {max})")]
    FieldOverflow {
        field: &'static str,
        value: usize,
        max: usize,
    },

    /// The conversion settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A convenience `Result` type alias using the crate's `Ld2Error` type.
pub type Result<T> = std::result::Result<T, Ld2Error>;
