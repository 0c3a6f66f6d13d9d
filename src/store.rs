//! Per-user seen/unseen dedup state, persisted as a flat JSON file mapping
//! user id to an array of article id digests.

use crate::types::{Article, ArticleId, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Compute the stable identifier for an article from its title and link.
///
/// Deterministic across runs and processes; any change to either field
/// produces a different digest.
pub fn compute_id(title: &str, link: &str) -> ArticleId {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"_");
    hasher.update(link.as_bytes());
    ArticleId::new(hex::encode(hasher.finalize()))
}

/// Keep only the articles whose id is absent from `seen`, preserving the
/// listing order. Side-effect free: call it twice with the same inputs and
/// you get the same output.
pub fn filter_unseen(articles: &[Article], seen: &HashSet<ArticleId>) -> Vec<(Article, ArticleId)> {
    articles
        .iter()
        .filter_map(|article| {
            let id = compute_id(&article.title, &article.link);
            if seen.contains(&id) {
                debug!("Already delivered, skipping: {}", article.title);
                None
            } else {
                Some((article.clone(), id))
            }
        })
        .collect()
}

/// Full persisted dedup state: user id mapped to the set of article ids
/// already delivered to that user. Sets only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenRegistry {
    users: HashMap<String, HashSet<ArticleId>>,
}

impl SeenRegistry {
    /// The set of ids already delivered to `user_id`, empty for unknown users.
    pub fn seen_for(&self, user_id: &str) -> HashSet<ArticleId> {
        self.users.get(user_id).cloned().unwrap_or_default()
    }

    /// Return a registry where `user_id`'s set is the union of its prior set
    /// and `new_ids`. Every other user's entry is untouched; the caller's
    /// copy is not mutated. Persistence is a separate `SeenStore::save`.
    pub fn record(&self, user_id: &str, new_ids: &HashSet<ArticleId>) -> SeenRegistry {
        let mut users = self.users.clone();
        users
            .entry(user_id.to_string())
            .or_default()
            .extend(new_ids.iter().cloned());
        SeenRegistry { users }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Durable storage for the [`SeenRegistry`], one JSON file.
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted registry. A missing file is a normal first run and
    /// yields an empty registry. A file that exists but cannot be read or
    /// parsed is logged and also yields an empty registry, resetting all
    /// users' history. Caveat: after a corrupted file, every user re-receives
    /// the current listing once.
    pub fn load(&self) -> SeenRegistry {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No seen-news state at {}, starting empty", self.path.display());
                return SeenRegistry::default();
            }
            Err(e) => {
                error!(
                    "Failed to read seen-news state {}: {}; resetting all user history",
                    self.path.display(),
                    e
                );
                return SeenRegistry::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(registry) => registry,
            Err(e) => {
                error!(
                    "Malformed seen-news state {}: {}; resetting all user history",
                    self.path.display(),
                    e
                );
                SeenRegistry::default()
            }
        }
    }

    /// Serialize the full registry, replacing prior contents. Written to a
    /// temp file first and renamed into place, so a crash mid-write leaves
    /// the previous state intact. Errors propagate to the caller.
    pub fn save(&self, registry: &SeenRegistry) -> Result<()> {
        let data = serde_json::to_string_pretty(registry)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
