//! Scrape Engine
//!
//! Ties the page pipeline together: fetch (cached, single-flight) → parse →
//! locate marker scripts → extract fields (cached) → normalize → assemble.

use crate::cache::{Cache, CacheKey};
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::tools::batch::batch_ordered;
use crate::tools::extract::{assemble_auction, assemble_profile, assemble_search, profile_id_from_uri};
use crate::tools::fetch::{PageFetcher, ReqwestFetcher};
use crate::tools::parse::Document;
use crate::tools::script::{extract_page_fields, locate_marker_scripts, RawFieldMap};
use crate::types::{AuctionRecord, ProfileRecord, SearchPage};
use std::sync::Arc;
use tracing::{debug, info};
use url::{form_urlencoded, Url};

pub struct AuctionScraper {
    config: ScraperConfig,
    fetcher: Arc<dyn PageFetcher>,
    pages: Cache<Arc<str>>,
    fields: Cache<Arc<RawFieldMap>>,
}

impl AuctionScraper {
    /// Scraper backed by the default `reqwest` fetcher.
    pub fn new(config: ScraperConfig) -> Self {
        let fetcher = Arc::new(ReqwestFetcher::from_config(&config.fetch));
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: ScraperConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            pages: Cache::from_config(&config.cache),
            fields: Cache::from_config(&config.cache),
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn auction_uri(&self, item_id: &str) -> String {
        format!("{}{}", self.config.base_uri, self.config.auction_suffix.replacen("{}", item_id, 1))
    }

    pub fn profile_uri(&self, user: &str) -> String {
        format!("{}{}", self.config.base_uri, self.config.profile_suffix.replacen("{}", user, 1))
    }

    pub fn search_uri(&self, query: &str, page: u32) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let suffix = self
            .config
            .search_suffix
            .replacen("{}", &encoded, 1)
            .replacen("{}", &page.to_string(), 1);
        format!("{}{}", self.config.base_uri, suffix)
    }

    /// Absolute URIs pass through; anything else is treated as an item id.
    pub fn auction_target(&self, id_or_uri: &str) -> String {
        if is_absolute(id_or_uri) {
            id_or_uri.to_string()
        } else {
            self.auction_uri(id_or_uri)
        }
    }

    /// Absolute URIs pass through; anything else is treated as a user name.
    pub fn profile_target(&self, name_or_uri: &str) -> String {
        if is_absolute(name_or_uri) {
            name_or_uri.to_string()
        } else {
            self.profile_uri(name_or_uri)
        }
    }

    pub async fn scrape_auction(&self, uri: &str) -> Result<AuctionRecord> {
        let page = self.page(uri).await?;
        let doc = parse_document(uri, &page)?;
        let fields = self.raw_fields(&doc);
        let record = assemble_auction(&doc, &fields, uri);
        info!(uri, id = record.id, fields = fields.len(), "scraped auction");
        Ok(record)
    }

    pub async fn scrape_auction_id(&self, item_id: &str) -> Result<AuctionRecord> {
        self.scrape_auction(&self.auction_uri(item_id)).await
    }

    /// Scrape many auctions, at most `concurrency` at a time. Results are in
    /// input order; one failure does not affect the others.
    pub async fn scrape_auctions(&self, uris: Vec<String>, concurrency: usize) -> Vec<Result<AuctionRecord>> {
        batch_ordered(uris, concurrency, |uri| async move { self.scrape_auction(&uri).await }).await
    }

    pub async fn scrape_profile(&self, uri: &str) -> Result<ProfileRecord> {
        let id = profile_id_from_uri(uri)?;
        let page = self.page(uri).await?;
        let doc = parse_document(uri, &page)?;
        let profile = assemble_profile(&doc, id, uri);
        info!(uri, id = %profile.id, "scraped profile");
        Ok(profile)
    }

    pub async fn scrape_search(&self, uri: &str) -> Result<SearchPage> {
        let page = self.page(uri).await?;
        let doc = parse_document(uri, &page)?;
        let search = assemble_search(&doc, &self.config.base_uri, uri);
        info!(uri, results = search.results.len(), "scraped search page");
        Ok(search)
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        self.scrape_search(&self.search_uri(query, page)).await
    }

    /// Drop every cached page and field map.
    pub fn clear_cache(&self) {
        self.pages.clear();
        self.fields.clear();
        debug!("caches cleared");
    }

    pub fn cached_pages(&self) -> usize {
        self.pages.len()
    }

    async fn page(&self, uri: &str) -> Result<Arc<str>> {
        self.pages
            .get_or_try_insert_with(CacheKey::Page(uri.to_string()), || async {
                let body = self.fetcher.fetch(uri).await?;
                Ok::<_, ScrapeError>(Arc::from(body))
            })
            .await
    }

    fn raw_fields(&self, doc: &Document) -> Arc<RawFieldMap> {
        let marker = &self.config.marker;
        let scripts = locate_marker_scripts(doc, marker);
        if scripts.is_empty() {
            return Arc::new(RawFieldMap::new());
        }

        let key = CacheKey::Script(scripts.concat());
        if let Some(fields) = self.fields.get(&key) {
            debug!("field map cache hit");
            return fields;
        }
        let fields = Arc::new(extract_page_fields(&scripts, marker, &self.config.multi_valued_keys));
        self.fields.insert(key, Arc::clone(&fields));
        fields
    }
}

fn parse_document(uri: &str, page: &str) -> Result<Document> {
    Document::parse(page).map_err(|reason| ScrapeError::document(uri, reason))
}

fn is_absolute(input: &str) -> bool {
    Url::parse(input).map(|u| u.has_host()).unwrap_or(false)
}
