use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Decode HTML entities (named and numeric).
pub(super) fn decode_html_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).to_string()
}

/// Compatibility decomposition (NFKD).
///
/// `é` (U+00E9) and `é` (U+0065 U+0301) both become `e` + U+0301.
pub(super) fn decompose_unicode(text: &str) -> String {
    text.nfkd().collect()
}

/// Remove zero-width characters that are invisible but break comparisons.
pub(super) fn remove_zero_width_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                *c,
                '\u{200B}' | // Zero width space
                '\u{200C}' | // Zero width non-joiner
                '\u{200D}' | // Zero width joiner
                '\u{FEFF}'   // BOM
            )
        })
        .collect()
}

/// Remove control characters except newlines and tabs.
pub(super) fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

pub(super) fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}
