//! Scraper configuration (JSON on disk, defaults in code)

use crate::error::{Result, ScrapeError};
use crate::tools::fetch::FetchProfile;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScraperConfig {
    pub base_uri: String,
    /// `{}` is replaced by the item id.
    pub auction_suffix: String,
    /// `{}` is replaced by the user name.
    pub profile_suffix: String,
    /// First `{}` is the encoded query, second is the page number.
    pub search_suffix: String,
    /// Function name whose call arguments carry the auction data.
    pub marker: String,
    /// Keys accumulated into lists instead of overwritten.
    pub multi_valued_keys: Vec<String>,
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_uri: "https://www.ebay.com".into(),
            auction_suffix: "/itm/{}".into(),
            profile_suffix: "/usr/{}".into(),
            search_suffix: "/sch/i.html?_nkw={}&_pgn={}&_skc=0".into(),
            marker: "$rwidgets".into(),
            multi_valued_keys: vec!["maxImageUrl".into(), "displayImgUrl".into()],
            cache: CacheConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Maximum entries per cache; `None` means unbounded.
    pub capacity: Option<usize>,
    /// Entry lifetime; `None` keeps entries until cleared.
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: Some(512),
            ttl_secs: Some(15 * 60),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchConfig {
    pub profile: FetchProfile,
    pub timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            profile: FetchProfile::default(),
            timeout_ms: 30_000,
        }
    }
}

impl ScraperConfig {
    /// Read a config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let config: ScraperConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the platform config directory, or use defaults when no file exists.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "auction-scrape", "auction-scrape")
            .map(|proj| proj.config_dir().join(CONFIG_FILE))
    }

    fn validate(&self) -> Result<()> {
        if self.marker.trim().is_empty() {
            return Err(ScrapeError::Config("marker must not be empty".into()));
        }
        if url::Url::parse(&self.base_uri).is_err() {
            return Err(ScrapeError::Config(format!(
                "baseUri is not absolute: {}",
                self.base_uri
            )));
        }
        if self.cache.capacity == Some(0) {
            return Err(ScrapeError::Config("cache capacity must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"marker": "$widgets", "cache": {{"capacity": 8}}}}"#).unwrap();

        let config = ScraperConfig::load(file.path()).unwrap();
        assert_eq!(config.marker, "$widgets");
        assert_eq!(config.cache.capacity, Some(8));
        assert_eq!(config.cache.ttl_secs, Some(900));
        assert_eq!(config.base_uri, "https://www.ebay.com");
        assert_eq!(config.multi_valued_keys, vec!["maxImageUrl", "displayImgUrl"]);
    }

    #[test]
    fn rejects_empty_marker() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"marker": "  "}}"#).unwrap();
        assert!(matches!(
            ScraperConfig::load(file.path()),
            Err(ScrapeError::Config(_))
        ));
    }

    #[test]
    fn rejects_relative_base_uri() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"baseUri": "/ebay"}}"#).unwrap();
        assert!(ScraperConfig::load(file.path()).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ScraperConfig::load(file.path()),
            Err(ScrapeError::Json(_))
        ));
    }

    #[test]
    fn fetch_profile_by_lowercase_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fetch": {{"profile": "macos", "timeoutMs": 500}}}}"#).unwrap();
        let config = ScraperConfig::load(file.path()).unwrap();
        assert_eq!(config.fetch.profile, FetchProfile::MacOS);
        assert_eq!(config.fetch.timeout_ms, 500);
    }
}
