//! Text normalization shared by classification, extraction and filtering.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lower-case, strip diacritics and trim.
///
/// `normalize(normalize(s)) == normalize(s)` for every input.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    folded.trim().to_string()
}

/// Slug used inside document ids: normalized, spaces replaced by dashes.
pub fn slug(text: &str) -> String {
    normalize(text).split_whitespace().collect::<Vec<_>>().join("-")
}
