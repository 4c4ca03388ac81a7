#![doc = include_str!("../README.md")]

pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod runtime;
pub mod selectors;
pub mod tools;
pub mod types;


pub use cache::{Cache, CacheKey};
pub use config::ScraperConfig;
pub use engine::AuctionScraper;
pub use error::{Result, ScrapeError};
pub use tools::fetch::{FetchProfile, PageFetcher, ReqwestFetcher};
pub use tools::script::RawFieldMap;
pub use types::*;
