use super::headers::headers_for_profile;
use super::profile::FetchProfile;
use crate::error::Result;
use reqwest::{redirect, Client};
use std::time::Duration;

const REDIRECT_LIMIT: usize = 10;

/// Build a fresh client for one page request.
///
/// Clients are not pooled: every scrape gets its own session and cookie jar.
pub(crate) fn build_client_for_profile(profile: FetchProfile, timeout: Duration) -> Result<Client> {
    let builder = Client::builder()
        .default_headers(headers_for_profile(profile))
        .cookie_store(true)
        .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .timeout(timeout);

    let builder = match profile {
        FetchProfile::Minimal => builder.cookie_store(false).redirect(redirect::Policy::limited(5)),
        _ => builder,
    };

    Ok(builder.build()?)
}
