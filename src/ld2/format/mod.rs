//! File format parsing layer for LD2 dictionary files.
//!
//! This module provides the mid-level parsing layer that bridges between
//! the raw container bytes and the high-level [`Ld2Reader`](crate::ld2::reader::Ld2Reader).
//!
//! # Module Organization
//!
//! - [`header`]: Parses the container header, description block, index header
//!   and stream directory
//! - [`index`]: Typed view over the inflated word-index zone
//! - [`content`]: Resolves index records into headwords and definitions
//! - [`markup`]: Reduces definition markup to plain text
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌──────────────────────┐
//! │  Container Header    │ ← header::parse_container()
//! ├──────────────────────┤
//! │  Description Block   │ ← header::locate_index()
//! │  (optional)          │
//! ├──────────────────────┤
//! │  Index Header        │ ← header::parse_index_header()
//! │  Index Groups        │
//! │  Stream Directory    │ ← header::parse_stream_directory()
//! ├──────────────────────┤
//! │  Deflate Segments    │ ← codec::compression::inflate_streams()
//! └──────────────────────┘
//!
//! Inflated Buffer:
//! ┌────────────┬──────────────┬──────────────┐
//! │ Word Index │  Headwords   │ Definitions  │ ← index / content
//! └────────────┴──────────────┴──────────────┘
//! ```

pub mod content;
pub mod header;
pub mod index;
pub mod markup;
