//! Decompression of the concatenated deflate segments.
//!
//! The dictionary data is split into several zlib streams stored back to
//! back. Only their end offsets are known; each stream starts where the
//! previous one ended. Segment boundaries carry no meaning in the inflated
//! result, so all outputs are appended to one buffer.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::{debug, trace};

use crate::ld2::types::error::{Ld2Error, Result};

/// Decompresses every segment delimited by `ends` and appends the output to `sink`.
///
/// `ends` are relative to `start`; segment `n` spans
/// `[start + ends[n-1], start + ends[n])` (the first one starts at `start`).
/// On failure the sink is cleared, since the remaining segments cannot be
/// located without a correct decode of the earlier ones.
pub fn inflate_streams(data: &[u8], start: usize, ends: &[u32], sink: &mut Vec<u8>) -> Result<()> {
    debug!("Inflating {} deflate segments starting at {:#x}", ends.len(), start);

    let result = inflate_into(data, start, ends, sink);
    if result.is_err() {
        sink.clear();
    }
    result
}

fn inflate_into(data: &[u8], start: usize, ends: &[u32], sink: &mut Vec<u8>) -> Result<()> {
    let mut last = start;
    for (segment, &end) in ends.iter().enumerate() {
        let offset = start + end as usize;
        if offset < last || offset > data.len() {
            return Err(Ld2Error::InvalidStreamDirectory(format!(
                "segment #{} spans [{:#x}, {:#x}) outside of a {} byte file",
                segment,
                last,
                offset,
                data.len()
            )));
        }

        let before = sink.len();
        let mut decoder = ZlibDecoder::new(&data[last..offset]);
        decoder
            .read_to_end(sink)
            .map_err(|source| Ld2Error::CorruptStream {
                segment,
                offset: last,
                source,
            })?;
        trace!(
            "Segment #{}: {} compressed bytes -> {} bytes",
            segment,
            offset - last,
            sink.len() - before
        );

        last = offset;
    }
    Ok(())
}
