use crate::tools::clean::clean_text;
use crate::tools::parse::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

pub(super) static ITEM_ID_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/itm/(?:[^/?#]+/)?(\d+)").unwrap());

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").unwrap());

static MEMBER_SINCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)member\s+since:?\s*").unwrap());

/// Cleaned text of the first element matching `selector`, if non-empty.
pub(super) fn first_text(doc: &Document, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

/// `"1,234"` or `"(1234)"` → 1234.
pub(super) fn parse_count(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// `"99.8% positive feedback"` → 99.8.
pub(super) fn parse_percent(text: &str) -> Option<f64> {
    PERCENT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The date following a "Member since" label, either in the same span or
/// the next one.
pub(super) fn member_since(info: &[String]) -> Option<String> {
    let index = info.iter().position(|text| MEMBER_SINCE.is_match(text))?;
    let inline = MEMBER_SINCE.replace(&info[index], "").trim().to_string();
    if !inline.is_empty() {
        return Some(inline);
    }
    info.get(index + 1).filter(|next| !next.is_empty()).cloned()
}
