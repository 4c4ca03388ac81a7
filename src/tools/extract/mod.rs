//! Record Assembly
//!
//! Maps a parsed page (plus, for auctions, its raw widget fields) onto the
//! record types. Missing data degrades to defaults; only a bad URI fails.

mod utils;

use crate::error::{Result, ScrapeError};
use crate::selectors::*;
use crate::tools::clean::{clean_text, normalize_title};
use crate::tools::normalize::{get_dict_value, image_urls, parse_currency, parse_timestamp, Loose};
use crate::tools::parse::{find_within, stripped_text, Document, Query};
use crate::tools::script::RawFieldMap;
use crate::types::{AuctionRecord, ProfileRecord, SearchPage, SearchResult};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;
use utils::*;

pub const PRIMARY_IMAGE_KEY: &str = "maxImageUrl";
pub const FALLBACK_IMAGE_KEY: &str = "displayImgUrl";

/// Build an auction record from the widget fields and the page DOM.
pub fn assemble_auction(doc: &Document, fields: &RawFieldMap, uri: &str) -> AuctionRecord {
    if fields.is_empty() {
        warn!(uri, "no widget fields on page; record will be mostly empty");
    }

    let id = int_field(fields, "itemId")
        .or_else(|| item_id_from_uri(uri))
        .unwrap_or_else(|| {
            warn!(uri, "no item id found");
            0
        });

    AuctionRecord {
        id,
        title: normalize_title(fields.get("it").unwrap_or_default()),
        description: extract_description(doc),
        seller_id: string_field(fields, "entityName"),
        start_time: parse_timestamp(fields.get("startTime")),
        end_time: parse_timestamp(fields.get("endTime")),
        n_bids: int_field_or(fields, "bids", 0),
        currency: parse_currency(fields.get("ccode")),
        latest_price: float_field(fields, "bidPriceDouble"),
        buy_now_price: float_field(fields, "binPriceDouble"),
        image_urls: image_urls(fields.get_all(PRIMARY_IMAGE_KEY), fields.get_all(FALLBACK_IMAGE_KEY)),
        locale: string_field(fields, "locale"),
        quantity: int_field_or(fields, "totalQty", 1),
        video_url: string_field(fields, "videoUrl"),
        vat_included: fields.get("vatIncluded") == Some("true"),
        domain: string_field(fields, "currentDomain"),
        uri: uri.to_string(),
        snapshot: doc.prettify(),
    }
}

/// Listing description from the DOM: the frame inside `div#desc_div`, else
/// the snippet holder, else empty.
pub fn extract_description(doc: &Document) -> String {
    if let Some(container) = doc.find(&Query::tag("div").id("desc_div")) {
        if let Some(frame) = find_within(container, &Query::tag("iframe")) {
            return stripped_text(&frame);
        }
    }
    match doc.find(&Query::tag("div").class("vi_descsnpt_holder")) {
        Some(holder) => stripped_text(&holder),
        None => {
            debug!("no description container");
            String::new()
        }
    }
}

/// Numeric item id from an `/itm/` URI (`/itm/123` or `/itm/slug/123`).
pub fn item_id_from_uri(uri: &str) -> Option<i64> {
    ITEM_ID_PATH
        .captures(uri)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Profile id: the second path segment (`/usr/{id}`).
pub fn profile_id_from_uri(uri: &str) -> Result<String> {
    let url = Url::parse(uri)?;
    url.path()
        .split('/')
        .nth(2)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ScrapeError::InvalidUri(format!("no profile id in {uri}")))
}

/// Build a seller profile from DOM lookups.
pub fn assemble_profile(doc: &Document, id: String, uri: &str) -> ProfileRecord {
    let display_name = first_text(doc, &PROFILE_NAME).unwrap_or_else(|| id.clone());
    let feedback_score = first_text(doc, &PROFILE_SCORE).and_then(|text| parse_count(&text));
    let positive_feedback = first_text(doc, &PROFILE_POSITIVE).and_then(|text| parse_percent(&text));

    let info: Vec<String> = doc
        .select(&PROFILE_INFO)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .collect();

    ProfileRecord {
        display_name,
        description: first_text(doc, &PROFILE_BIO).unwrap_or_default(),
        location: first_text(doc, &PROFILE_LOCATION).unwrap_or_default(),
        member_since: member_since(&info).unwrap_or_default(),
        feedback_score,
        positive_feedback,
        id,
        uri: uri.to_string(),
        snapshot: doc.prettify(),
    }
}

/// Results on a search page, in page order, without duplicate links.
pub fn extract_search_results(doc: &Document, base_uri: &str) -> Vec<SearchResult> {
    let base = match Url::parse(base_uri) {
        Ok(base) => base,
        Err(e) => {
            warn!(base_uri, error = %e, "bad base uri; search links cannot be resolved");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut results = Vec::new();
    for item in doc.find_all(&Query::tag("li").class("s-item")) {
        let Some(link) = item.select(&SEARCH_ITEM_LINK).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            debug!(href, "skipping unresolvable search link");
            continue;
        };
        let uri = resolved.to_string();
        if !seen.insert(uri.clone()) {
            continue;
        }

        let title = item
            .select(&SEARCH_ITEM_TITLE)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| clean_text(&link.text().collect::<String>()));
        let price = item
            .select(&SEARCH_ITEM_PRICE)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .filter(|p| !p.is_empty());

        results.push(SearchResult {
            title,
            item_id: item_id_from_uri(&uri),
            uri,
            price,
        });
    }
    results
}

pub fn assemble_search(doc: &Document, base_uri: &str, uri: &str) -> SearchPage {
    SearchPage {
        uri: uri.to_string(),
        results: extract_search_results(doc, base_uri),
        snapshot: doc.prettify(),
    }
}

fn string_field(fields: &RawFieldMap, key: &str) -> String {
    fields.get(key).unwrap_or_default().to_string()
}

fn int_field(fields: &RawFieldMap, key: &str) -> Option<i64> {
    let value = get_dict_value(fields, key, Loose::Null);
    let parsed = value.as_i64();
    if parsed.is_none() && !value.is_null() {
        warn!(key, value = ?value, "expected an integer");
    }
    parsed
}

fn int_field_or(fields: &RawFieldMap, key: &str, default: i64) -> i64 {
    int_field(fields, key).unwrap_or(default)
}

fn float_field(fields: &RawFieldMap, key: &str) -> Option<f64> {
    let value = get_dict_value(fields, key, Loose::Null);
    let parsed = value.as_f64();
    if parsed.is_none() && !value.is_null() {
        warn!(key, value = ?value, "expected a number");
    }
    parsed
}
