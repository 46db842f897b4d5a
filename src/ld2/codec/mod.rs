//! Codec layer for decompression and text decoding.
//!
//! # Submodules
//!
//! - [`compression`][]: Multi-segment zlib/deflate decompression
//! - [`charset`][]: Strict and lenient text decoding

pub mod charset;
pub mod compression;
