use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid uri: {0}")]
    InvalidUri(String),

    #[error("fetch failed for {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    #[error("could not parse document from {uri}: {reason}")]
    Document { uri: String, reason: String },

    #[error("script parse error: {0}")]
    Script(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ScrapeError {
    pub fn fetch(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::Fetch {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    pub fn document(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::Document {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

/* Conversions so `?` works smoothly */
impl From<url::ParseError> for ScrapeError {
    fn from(e: url::ParseError) -> Self {
        ScrapeError::InvalidUri(e.to_string())
    }
}
