//! Identifier segment codec.
//!
//! Image identifiers may contain reserved path characters (`/`, `%`, `#`),
//! so they travel percent-encoded as a single path segment. Identifiers
//! originating from external namespaces (URNs, ARKs) may already carry
//! percent-escapes of their own; those must survive exactly one layer of
//! decoding. A token containing `%25` therefore decodes to a literal `%`,
//! never twice.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when an identifier is placed into a path segment.
///
/// Everything a path segment cannot carry verbatim: the segment delimiter,
/// the escape character itself, and URL metacharacters.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Encode a raw identifier as a single path segment.
#[must_use]
pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Decode a path-segment token back into the raw identifier.
///
/// Applies exactly one layer of percent-decoding: `%252D` becomes `%2D`,
/// not `-`. Tokens without escapes pass through unchanged.
#[must_use]
pub fn decode_segment(token: &str) -> String {
    percent_decode_str(token).decode_utf8_lossy().into_owned()
}
