//! Input normalization applied before decoding.

use std::borrow::Cow;

use unicode_normalization::{is_nfc, UnicodeNormalization};

const BOM: char = '\u{feff}';

/// Strip a leading BOM, convert CRLF/CR line endings to LF and compose the
/// text to NFC, so marker literals match regardless of how the dump was saved.
pub fn normalize_text(text: &str) -> Cow<'_, str> {
    let stripped = text.strip_prefix(BOM).unwrap_or(text);

    if !stripped.contains('\r') && is_nfc(stripped) {
        return Cow::Borrowed(stripped);
    }

    let unified = stripped.replace("\r\n", "\n").replace('\r', "\n");
    Cow::Owned(unified.nfc().collect())
}
