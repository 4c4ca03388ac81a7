use chrono::{DateTime, Utc};
use iso_currency::Currency;
use serde::{Deserialize, Serialize};

/// A single auction listing, normalized from the page's embedded widget data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub seller_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub n_bids: i64,
    #[serde(with = "currency_code")]
    pub currency: Option<Currency>,
    pub latest_price: Option<f64>,
    pub buy_now_price: Option<f64>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub locale: String,
    pub quantity: i64,
    pub video_url: String,
    pub vat_included: bool,
    pub domain: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub snapshot: String,
}

/// Seller profile (`/usr/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: String,
    pub uri: String,
    pub display_name: String,
    pub description: String,
    pub location: String,
    pub member_since: String,
    pub feedback_score: Option<i64>,
    pub positive_feedback: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub snapshot: String,
}

/// One hit on a search results page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub uri: String,
    pub item_id: Option<i64>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub uri: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub snapshot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Currencies travel as their ISO 4217 code.
mod currency_code {
    use iso_currency::Currency;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Currency>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(currency) => serializer.serialize_some(currency.code()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Currency>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code: Option<String> = Option::deserialize(deserializer)?;
        Ok(code.as_deref().and_then(Currency::from_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AuctionRecord {
        AuctionRecord {
            id: 42,
            title: "Lamp".into(),
            description: String::new(),
            seller_id: "seller".into(),
            start_time: None,
            end_time: None,
            n_bids: 0,
            currency: Currency::from_code("GBP"),
            latest_price: Some(1.5),
            buy_now_price: None,
            image_urls: vec![],
            locale: "en_GB".into(),
            quantity: 1,
            video_url: String::new(),
            vat_included: false,
            domain: "ebay.co.uk".into(),
            uri: "https://www.ebay.com/itm/42".into(),
            snapshot: String::new(),
        }
    }

    #[test]
    fn currency_serializes_as_code() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["currency"], "GBP");
        assert_eq!(json["sellerId"], "seller");
        assert!(json.get("snapshot").is_none());
    }

    #[test]
    fn currency_survives_json() {
        let record = sample();
        let text = serde_json::to_string(&record).unwrap();
        let back: AuctionRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back.currency, record.currency);
    }
}
