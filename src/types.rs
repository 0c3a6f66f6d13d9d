use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One scraped news item from the front-page listing.
///
/// The wire names on the listing document are `text`, `src` and `img`,
/// matching the format the upstream scraper emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article headline.
    #[serde(rename = "text")]
    pub title: String,
    /// Absolute URL of the full story.
    #[serde(rename = "src")]
    pub link: String,
    /// Optional preview image URL.
    #[serde(rename = "img", default)]
    pub image: Option<String>,
}

/// Content-derived identifier for an article, stored instead of the raw
/// article to keep persisted state small.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(digest: String) -> Self {
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summary of one handled news request, for logging and callers.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    pub request_id: Uuid,
    pub user_id: String,
    /// Articles the listing returned.
    pub fetched: usize,
    /// Articles actually sent to the user.
    pub delivered: usize,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Listing error: {0}")]
    Listing(String),

    #[error("State serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("State IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
