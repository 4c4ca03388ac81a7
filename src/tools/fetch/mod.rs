mod client;
mod headers;
mod profile;
mod utils;

pub use profile::FetchProfile;

use crate::config::FetchConfig;
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use client::build_client_for_profile;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use utils::validate_response;

/// Resolves a URI to raw page content.
///
/// The engine only depends on this trait, so tests and callers can swap in
/// their own transport.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<String>;
}

/// Default fetcher backed by `reqwest`. No retries.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    profile: FetchProfile,
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new(profile: FetchProfile, timeout: Duration) -> Self {
        Self { profile, timeout }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.profile, Duration::from_millis(config.timeout_ms))
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, uri: &str) -> Result<String> {
        fetch_html(uri, self.profile, self.timeout).await
    }
}

/// Fetch one page with a fresh client.
///
/// # Examples
/// ```no_run
/// use auction_scrape::tools::fetch::{fetch_html, FetchProfile};
/// use std::time::Duration;
///
/// # async fn example() -> auction_scrape::Result<()> {
/// let html = fetch_html("https://www.ebay.com/itm/1", FetchProfile::Windows, Duration::from_secs(30)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn fetch_html(uri: &str, profile: FetchProfile, timeout: Duration) -> Result<String> {
    let start = Instant::now();
    let client = build_client_for_profile(profile, timeout)?;

    debug!(uri, profile = profile.name(), "fetching");
    let response = client
        .get(uri)
        .send()
        .await
        .map_err(|e| ScrapeError::fetch(uri, format!("request failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ScrapeError::fetch(uri, format!("failed to read body: {e}")))?;

    validate_response(status, &body).map_err(|reason| ScrapeError::fetch(uri, reason))?;

    info!(
        uri,
        bytes = body.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "fetched"
    );
    Ok(body)
}
