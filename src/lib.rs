pub mod cli;
pub mod config;
pub mod fetcher;
pub mod relay;
pub mod render;
pub mod store;
pub mod transport;
pub mod types;

pub use config::RelayConfig;
pub use fetcher::{FetchListing, HttpListingFetcher};
pub use relay::{InboundEvent, NewsRelay};
pub use store::{compute_id, filter_unseen, SeenRegistry, SeenStore};
pub use transport::{ConsoleTransport, OutgoingMessage, Transport, WebhookTransport};
pub use types::{Article, ArticleId, DeliveryReport, RelayError, Result};
