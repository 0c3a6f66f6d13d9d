//! Front-page listing fetch behind the [`FetchListing`] seam.

use crate::config::RelayConfig;
use crate::types::{Article, RelayError, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Source of the ordered front-page article batch. One call, one fresh
/// fetch; implementations must not cache across calls.
#[async_trait]
pub trait FetchListing: Send + Sync {
    async fn fetch_front_page(&self) -> Result<Vec<Article>>;
}

/// Fetches the listing as a JSON article array over HTTP, with retry.
///
/// An unreachable remote or a non-success status is an error, never an empty
/// batch; a listing that genuinely contains no records is `Ok(vec![])`.
pub struct HttpListingFetcher {
    client: Client,
    listing_url: Url,
    max_items: usize,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpListingFetcher {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            listing_url: Url::parse(&config.listing_url)?,
            max_items: config.max_items,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        })
    }

    async fn fetch_once(&self) -> Result<Vec<Article>> {
        let response = self.client.get(self.listing_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Listing(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let records: Vec<Article> = response.json().await?;
        let total = records.len();
        let articles: Vec<Article> = records
            .into_iter()
            .filter(|a| !a.title.trim().is_empty() && !a.link.trim().is_empty())
            .take(self.max_items)
            .collect();
        if articles.len() < total {
            debug!(
                "Dropped {} listing records (missing title/link or over the {} item cap)",
                total - articles.len(),
                self.max_items
            );
        }
        Ok(articles)
    }
}

#[async_trait]
impl FetchListing for HttpListingFetcher {
    async fn fetch_front_page(&self) -> Result<Vec<Article>> {
        debug!("Fetching front-page listing: {}", self.listing_url);

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: self.retry_delay,
            initial_interval: self.retry_delay,
            max_interval: self.retry_delay * 32,
            multiplier: 2.0,
            max_elapsed_time: Some(self.retry_delay * 60),
            ..Default::default()
        };

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            match self.fetch_once().await {
                Ok(articles) => {
                    info!(
                        "Fetched {} articles from {}",
                        articles.len(),
                        self.listing_url
                    );
                    return Ok(articles);
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            warn!(
                                "Attempt {} failed for {}, retrying in {:?}",
                                attempt + 1,
                                self.listing_url,
                                delay
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| RelayError::Listing("listing fetch failed".to_string())))
    }
}
