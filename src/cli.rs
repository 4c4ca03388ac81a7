use crate::config::ScraperConfig;
use crate::engine::AuctionScraper;
use crate::runtime::block_on;
use crate::types::ApiResponse;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "auction-scrape", version, about = "Auctions, profiles and search pages as JSON")]
pub struct Cli {
    /// Config file (JSON). Defaults to the platform config dir when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Keep the pretty-printed page snapshot in the output.
    #[arg(long, global = true)]
    snapshot: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape one auction by item id or URI
    Auction { target: String },
    /// Scrape several auctions concurrently
    Auctions(AuctionsArgs),
    /// Scrape a seller profile by user name or URI
    Profile { target: String },
    /// Scrape one page of search results
    Search(SearchArgs),
}

#[derive(Args)]
struct AuctionsArgs {
    #[arg(required = true)]
    targets: Vec<String>,
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

#[derive(Args)]
struct SearchArgs {
    query: String,
    #[arg(long, default_value_t = 1)]
    page: u32,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => ScraperConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ScraperConfig::load_or_default().context("loading default config")?,
    };
    let scraper = AuctionScraper::new(config);
    let keep = cli.snapshot;

    match cli.cmd {
        Command::Auction { target } => {
            let uri = scraper.auction_target(&target);
            finish(block_on(scraper.scrape_auction(&uri)).map(|mut record| {
                strip(&mut record.snapshot, keep);
                record
            }));
        }
        Command::Auctions(AuctionsArgs { targets, concurrency }) => {
            let uris = targets.iter().map(|t| scraper.auction_target(t)).collect();
            let results = block_on(scraper.scrape_auctions(uris, concurrency));
            let responses: Vec<_> = results
                .into_iter()
                .map(|result| match result {
                    Ok(mut record) => {
                        strip(&mut record.snapshot, keep);
                        ApiResponse::ok(record)
                    }
                    Err(e) => ApiResponse::err(e.to_string()),
                })
                .collect();
            print_json(&responses)?;
        }
        Command::Profile { target } => {
            let uri = scraper.profile_target(&target);
            finish(block_on(scraper.scrape_profile(&uri)).map(|mut profile| {
                strip(&mut profile.snapshot, keep);
                profile
            }));
        }
        Command::Search(SearchArgs { query, page }) => {
            finish(block_on(scraper.search(&query, page)).map(|mut search| {
                strip(&mut search.snapshot, keep);
                search
            }));
        }
    }
    Ok(())
}

fn strip(snapshot: &mut String, keep: bool) {
    if !keep {
        snapshot.clear();
    }
}

fn finish<T: Serialize>(res: crate::Result<T>) {
    let printed = match res {
        Ok(v) => print_json(&ApiResponse::ok(v)),
        Err(e) => print_json(&ApiResponse::<()>::err(e.to_string())),
    };
    if let Err(e) = printed {
        tracing::error!(error = %e, "could not write output");
    }
}

fn print_json<T: Serialize>(val: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_auctions_with_concurrency() {
        let cli = Cli::try_parse_from(["auction-scrape", "-vv", "auctions", "1", "2", "--concurrency", "8"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Command::Auctions(args) => {
                assert_eq!(args.targets, vec!["1", "2"]);
                assert_eq!(args.concurrency, 8);
            }
            _ => panic!("expected auctions"),
        }
    }

    #[test]
    fn search_page_defaults_to_one() {
        let cli = Cli::try_parse_from(["auction-scrape", "search", "brass lamp", "--snapshot"]).unwrap();
        assert!(cli.snapshot);
        match cli.cmd {
            Command::Search(args) => {
                assert_eq!(args.query, "brass lamp");
                assert_eq!(args.page, 1);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn auctions_requires_a_target() {
        assert!(Cli::try_parse_from(["auction-scrape", "auctions"]).is_err());
    }
}
