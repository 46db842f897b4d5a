//! Text decoding for the headword and definition zones.
//!
//! The container does not declare its encodings, so decoding is done by
//! trial: a strict decode reports malformed or unmappable sequences as an
//! error instead of substituting them. The lenient decode is only used for
//! the best-effort fallback pair.

use encoding_rs::{Encoding, EUC_JP, UTF_16BE, UTF_16LE, UTF_8};

use crate::ld2::types::error::{Ld2Error, Result};

/// Encodings tried by default, in probing order.
pub fn default_candidates() -> Vec<&'static Encoding> {
    vec![UTF_16LE, UTF_16BE, UTF_8, EUC_JP]
}

/// Decode `bytes` as `encoding`, failing on the first malformed sequence.
///
/// No BOM sniffing is done; a BOM is decoded like any other character.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(Ld2Error::Charset {
            encoding: encoding.name(),
            len: bytes.len(),
        })
}

/// Decode `bytes` as `encoding`, replacing malformed sequences with U+FFFD.
pub fn decode_lenient(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Decode with the strict or lenient policy.
pub fn decode(bytes: &[u8], encoding: &'static Encoding, lenient: bool) -> Result<String> {
    if lenient {
        Ok(decode_lenient(bytes, encoding))
    } else {
        decode_strict(bytes, encoding)
    }
}

/// Resolve a label such as `utf-16le` or `euc-jp` to an encoding.
pub fn parse_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}
