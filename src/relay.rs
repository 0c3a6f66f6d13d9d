//! Request handling: one inbound event in, messages out, seen-state updated.

use crate::fetcher::FetchListing;
use crate::render;
use crate::store::{filter_unseen, SeenStore};
use crate::transport::{OutgoingMessage, Transport};
use crate::types::{ArticleId, DeliveryReport, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// The two triggers the relay reacts to. There are no other commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Conversation start: reply with the greeting and the news control.
    Start { user_id: String },
    /// Request for the latest articles.
    RequestNews { user_id: String },
}

pub struct NewsRelay {
    fetcher: Box<dyn FetchListing>,
    transport: Box<dyn Transport>,
    store: SeenStore,
    send_pause: Duration,
    commit_lock: Mutex<()>,
}

impl NewsRelay {
    pub fn new(
        fetcher: Box<dyn FetchListing>,
        transport: Box<dyn Transport>,
        store: SeenStore,
        send_pause: Duration,
    ) -> Self {
        Self {
            fetcher,
            transport,
            store,
            send_pause,
            commit_lock: Mutex::new(()),
        }
    }

    pub async fn handle(&self, event: InboundEvent) -> Result<Option<DeliveryReport>> {
        match event {
            InboundEvent::Start { user_id } => {
                self.greet(&user_id).await?;
                Ok(None)
            }
            InboundEvent::RequestNews { user_id } => {
                self.deliver_news(&user_id).await.map(Some)
            }
        }
    }

    async fn greet(&self, user_id: &str) -> Result<()> {
        info!("Greeting user {}", user_id);
        self.transport
            .deliver(
                user_id,
                OutgoingMessage::with_action(render::greeting(), render::NEWS_ACTION),
            )
            .await
    }

    /// One delivery request: fetch, filter against the user's history, send
    /// each unseen article with a pause in between, then merge-and-persist
    /// if anything went out. Fetch problems become friendly messages and
    /// leave the registry untouched; transport and save errors propagate.
    pub async fn deliver_news(&self, user_id: &str) -> Result<DeliveryReport> {
        let request_id = Uuid::new_v4();
        info!("Request {}: news for user {}", request_id, user_id);

        self.transport
            .deliver(user_id, OutgoingMessage::text(render::waiting()))
            .await?;

        let articles = match self.fetcher.fetch_front_page().await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Request {}: front-page fetch failed: {}", request_id, e);
                self.transport
                    .deliver(user_id, OutgoingMessage::text(render::try_later()))
                    .await?;
                return Ok(Self::report(request_id, user_id, 0, 0));
            }
        };

        if articles.is_empty() {
            info!("Request {}: listing returned no articles", request_id);
            self.transport
                .deliver(user_id, OutgoingMessage::text(render::no_news()))
                .await?;
            return Ok(Self::report(request_id, user_id, 0, 0));
        }

        let registry = self.store.load();
        let seen = registry.seen_for(user_id);
        let fresh = filter_unseen(&articles, &seen);

        if fresh.is_empty() {
            info!(
                "Request {}: all {} fetched articles already seen by user {}",
                request_id,
                articles.len(),
                user_id
            );
            self.transport
                .deliver(user_id, OutgoingMessage::text(render::all_caught_up()))
                .await?;
            return Ok(Self::report(request_id, user_id, articles.len(), 0));
        }

        let mut delivered: HashSet<ArticleId> = HashSet::new();
        for (article, id) in &fresh {
            self.transport
                .deliver(user_id, OutgoingMessage::text(render::article_card(article)))
                .await?;
            delivered.insert(id.clone());
            tokio::time::sleep(self.send_pause).await;
        }

        self.commit(user_id, &delivered).await?;
        info!(
            "Request {}: delivered {} of {} fetched articles to user {}",
            request_id,
            delivered.len(),
            articles.len(),
            user_id
        );

        Ok(Self::report(request_id, user_id, articles.len(), delivered.len()))
    }

    /// Merge the delivered ids into the registry and persist. The registry is
    /// re-loaded under the lock so an overlapping request that committed while
    /// this one was sending is unioned in, not clobbered. Writers in other
    /// processes are still last-writer-wins.
    async fn commit(&self, user_id: &str, new_ids: &HashSet<ArticleId>) -> Result<()> {
        let _guard = self.commit_lock.lock().await;
        let current = self.store.load();
        let updated = current.record(user_id, new_ids);
        self.store.save(&updated)
    }

    fn report(request_id: Uuid, user_id: &str, fetched: usize, delivered: usize) -> DeliveryReport {
        DeliveryReport {
            request_id,
            user_id: user_id.to_string(),
            fetched,
            delivered,
            completed_at: Utc::now(),
        }
    }
}
