//! Logging setup (tracing, stderr)

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "auction_scrape=warn",
        1 => "auction_scrape=info",
        2 => "auction_scrape=debug",
        _ => "auction_scrape=trace",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `verbosity`.
/// Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_directive(0), "auction_scrape=warn");
        assert_eq!(default_directive(2), "auction_scrape=debug");
        assert_eq!(default_directive(9), "auction_scrape=trace");
    }

    #[test]
    fn init_twice_is_fine() {
        init(0);
        init(1);
    }
}
