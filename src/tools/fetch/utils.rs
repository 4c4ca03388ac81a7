const CHALLENGE_PATTERNS: [&str; 5] = [
    "pardon our interruption",
    "please verify yourself to continue",
    "captcha challenge",
    "px-captcha",
    "cf-browser-verification",
];

/// Validate an HTTP response before handing it to the parser.
///
/// Returns `Err(reason)` for non-success statuses, empty bodies and bot
/// challenge interstitials.
pub(super) fn validate_response(status_code: reqwest::StatusCode, body: &str) -> Result<(), String> {
    if !status_code.is_success() {
        let label = match status_code {
            reqwest::StatusCode::TOO_MANY_REQUESTS => "rate limited",
            reqwest::StatusCode::FORBIDDEN => "forbidden",
            reqwest::StatusCode::NOT_FOUND => "not found",
            reqwest::StatusCode::UNAUTHORIZED => "unauthorized",
            s if s.is_server_error() => "server error",
            _ => "unexpected status",
        };
        return Err(format!("status {} ({})", status_code.as_u16(), label));
    }

    if body.trim().is_empty() {
        return Err("empty body".into());
    }

    let lower = body.to_ascii_lowercase();
    if let Some(pattern) = CHALLENGE_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(format!("bot challenge - {}", pattern));
    }

    Ok(())
}
