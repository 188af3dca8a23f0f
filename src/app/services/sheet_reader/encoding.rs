//! Byte decoding and delimiter detection
//!
//! Brazilian government exports are frequently saved as Windows-1252 rather
//! than UTF-8. A byte-order mark, when present, decides the encoding;
//! otherwise the bytes are read as UTF-8 and fall back to Windows-1252 when
//! they are not valid UTF-8.

use encoding_rs::{Encoding, WINDOWS_1252};
use std::borrow::Cow;
use tracing::debug;

/// Delimiters considered by [`detect_delimiter`], in tie-break order
const DELIMITER_CANDIDATES: [char; 3] = [',', ';', '\t'];

/// Decode raw bytes to text, returning the text and the encoding name used
pub fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, &'static str) {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        if had_errors {
            debug!("Replaced malformed {} sequences", encoding.name());
        }
        return (text, encoding.name());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), "UTF-8"),
        Err(_) => {
            debug!("Input is not valid UTF-8, decoding as windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text, WINDOWS_1252.name())
        }
    }
}

/// Guess the field delimiter from the first non-blank line
///
/// The candidate occurring most often wins; ties (including no candidate at
/// all) resolve to the comma.
pub fn detect_delimiter(text: &str) -> char {
    let Some(line) = text.lines().find(|line| !line.trim().is_empty()) else {
        return ',';
    };

    let mut best = (',', 0usize);
    for candidate in DELIMITER_CANDIDATES {
        let count = line.matches(candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }

    best.0
}
