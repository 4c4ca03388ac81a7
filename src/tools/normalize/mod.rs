//! Field Normalizer
//!
//! Total functions from raw script strings to typed values. Nothing here
//! fails: bad input is logged and comes back as `None` or the default.

mod types;

pub use types::{Coercion, Loose};

use crate::tools::script::RawFieldMap;
use chrono::{DateTime, Utc};
use iso_currency::Currency;
use tracing::warn;

/// Trial order for [`coerce`]. Anything no step accepts stays a string.
pub const COERCION_ORDER: [Coercion; 4] = [Coercion::Bool, Coercion::Null, Coercion::Int, Coercion::Float];

/// Loose-literal coercion of a raw value.
///
/// `"true"`/`"false"` become booleans, `"null"` or a missing value becomes
/// null, then integer and float parses are tried. Any other text is returned
/// unchanged.
///
/// # Examples
/// ```
/// use auction_scrape::tools::normalize::{coerce, Loose};
///
/// assert_eq!(coerce(Some("12")), Loose::Int(12));
/// assert_eq!(coerce(Some("1.5")), Loose::Float(1.5));
/// assert_eq!(coerce(Some("true")), Loose::Bool(true));
/// assert_eq!(coerce(None), Loose::Null);
/// assert_eq!(coerce(Some("EBAY-US")), Loose::Str("EBAY-US".into()));
/// ```
pub fn coerce(raw: Option<&str>) -> Loose {
    let Some(raw) = raw else {
        return Loose::Null;
    };
    COERCION_ORDER
        .iter()
        .find_map(|step| step.attempt(raw))
        .unwrap_or_else(|| Loose::Str(raw.to_string()))
}

/// Coerce `map[key]`, or return `default` when the key is absent.
pub fn get_dict_value(map: &RawFieldMap, key: &str, default: Loose) -> Loose {
    match map.get(key) {
        Some(raw) => coerce(Some(raw)),
        None => default,
    }
}

/// Epoch milliseconds to an absolute UTC time.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let Some(raw) = raw else {
        warn!("missing timestamp");
        return None;
    };
    let parsed = raw
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis);
    if parsed.is_none() {
        warn!(raw, "could not parse timestamp");
    }
    parsed
}

/// ISO 4217 code to a currency.
pub fn parse_currency(raw: Option<&str>) -> Option<Currency> {
    let code = raw.map(str::trim).unwrap_or_default();
    let currency = Currency::from_code(code);
    if currency.is_none() {
        warn!(code, "unrecognized currency code");
    }
    currency
}

/// Decode JS/JSON string escapes (`\/`, `\u00e9`) in a raw value.
pub fn decode_escaped(raw: &str) -> Option<String> {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).ok()
}

/// Pair primary and fallback image URLs position by position.
///
/// The primary wins unless it is the literal `"null"`. Positions where both
/// are empty are skipped. Lists of different lengths are truncated to the
/// shorter one.
///
/// # Examples
/// ```
/// use auction_scrape::tools::normalize::image_urls;
///
/// let primary = vec!["url1".to_string(), "null".to_string()];
/// let fallback = vec!["".to_string(), "url2".to_string()];
/// assert_eq!(image_urls(&primary, &fallback), vec!["url1", "url2"]);
/// ```
pub fn image_urls(primary: &[String], fallback: &[String]) -> Vec<String> {
    if primary.len() != fallback.len() {
        warn!(
            primary = primary.len(),
            fallback = fallback.len(),
            "image lists differ in length; truncating"
        );
    }

    primary
        .iter()
        .zip(fallback)
        .filter(|(max, display)| !max.is_empty() || !display.is_empty())
        .map(|(max, display)| if max != "null" { max } else { display })
        .map(|chosen| {
            decode_escaped(chosen).unwrap_or_else(|| {
                warn!(raw = %chosen, "could not decode image url");
                chosen.clone()
            })
        })
        .collect()
}
