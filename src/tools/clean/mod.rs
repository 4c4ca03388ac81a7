mod utils;

use crate::tools::normalize::decode_escaped;
use utils::*;

/// Normalize an auction title.
///
/// JS string escapes left in the raw value are decoded first (the raw text
/// is kept if it does not decode), then the text is put in NFKD form so that
/// composed and decomposed spellings compare equal.
///
/// # Examples
/// ```
/// use auction_scrape::tools::clean::normalize_title;
///
/// assert_eq!(normalize_title("Caf\u{00E9}"), normalize_title("Cafe\u{0301}"));
/// assert_eq!(normalize_title(r"Lamp \u0026 Shade"), "Lamp & Shade");
/// ```
pub fn normalize_title(raw: &str) -> String {
    let decoded = decode_escaped(raw).unwrap_or_else(|| raw.to_string());
    decompose_unicode(&decoded)
}

/// Clean scraped DOM text.
///
/// Performs the following operations in order:
/// 1. Decode HTML entities (`&amp;` → `&`, `&#39;` → `'`)
/// 2. Remove zero-width characters
/// 3. Remove control characters (except newlines/tabs)
/// 4. Normalize whitespace (collapse runs, trim)
///
/// # Examples
/// ```
/// use auction_scrape::tools::clean::clean_text;
///
/// assert_eq!(clean_text("Member since:\n   Jan 04, 2010 &amp; on"), "Member since: Jan 04, 2010 & on");
/// ```
pub fn clean_text(text: &str) -> String {
    let mut result = decode_html_entities(text);
    result = remove_zero_width_chars(&result);
    result = remove_control_chars(&result);
    normalize_whitespace(&result)
}
