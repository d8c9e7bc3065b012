//! Text repair for exported names and message bodies.
//!
//! Messenger exports write each UTF-8 byte of non-ASCII text as its own
//! `\u00XX` escape, so after JSON decoding "José" reads as "JosÃ©". Repair
//! reinterprets such strings as the byte sequence they really are.

use unicode_normalization::UnicodeNormalization;

/// Repair mis-encoded export text and normalize it to NFC.
///
/// Text that is not a valid Latin-1 view of UTF-8 bytes is kept as is, so
/// correctly encoded input passes through unchanged apart from
/// normalization. Two raw spellings of the same name therefore repair to the
/// same string.
#[must_use]
pub fn repair_text(raw: &str) -> String {
    match decode_byte_escaped(raw) {
        Some(decoded) => decoded.nfc().collect(),
        None => raw.nfc().collect(),
    }
}

/// Reinterpret a string whose chars are all `<= U+00FF` as UTF-8 bytes.
///
/// Returns `None` for pure ASCII, for strings with wider chars, and when the
/// bytes are not valid UTF-8.
fn decode_byte_escaped(raw: &str) -> Option<String> {
    if raw.is_ascii() {
        return None;
    }

    let bytes = raw
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<Vec<u8>>>()?;

    String::from_utf8(bytes).ok()
}
