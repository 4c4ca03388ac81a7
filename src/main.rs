fn main() -> anyhow::Result<()> {
    auction_scrape::cli::run()
}
