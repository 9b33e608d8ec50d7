//! Post and message interaction state
//!
//! Reactions, bookmarks and reports for network posts and chat messages,
//! held as an explicit map from entity id to `InteractionState`. The map is
//! changed only through the transition methods on `InteractionStore`, and
//! persistence happens only when `save` / `load` are called.

pub mod state;
pub mod storage;

pub use state::{InteractionState, ReactionTally, Report};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Storage key for the serialized map
pub const STORAGE_KEY: &str = "postInteractions.v1";

const STORAGE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("'{id}' has already been reported")]
    AlreadyReported { id: String },

    #[error("a report needs a reason")]
    EmptyReason,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("stored interactions are corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("unsupported interaction storage version {found}; expected 1")]
    UnsupportedVersion { found: u32 },

    #[error("failed to serialize interactions: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct PersistedInteractions {
    version: u32,
    entries: BTreeMap<String, InteractionState>,
}

/// Interaction records keyed by post or message id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionStore {
    entries: BTreeMap<String, InteractionState>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&InteractionState> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Toggle the local user's reaction; returns whether it is now active
    pub fn toggle_reaction(&mut self, id: &str, emoji: &str) -> bool {
        let active = self.entry(id).toggle_reaction(emoji);
        self.prune(id);
        active
    }

    /// Merge counts from the server without touching the local user's flags
    pub fn seed_reactions(&mut self, id: &str, counts: &BTreeMap<String, u32>) {
        let state = self.entry(id);
        for (emoji, &count) in counts {
            let tally = state.reactions.entry(emoji.clone()).or_default();
            tally.count = if tally.mine { count.max(1) } else { count };
        }
        state.reactions.retain(|_, tally| tally.count > 0 || tally.mine);
        self.prune(id);
    }

    /// Flip the bookmark flag; returns the new value
    pub fn toggle_bookmark(&mut self, id: &str) -> bool {
        let state = self.entry(id);
        state.bookmarked = !state.bookmarked;
        let bookmarked = state.bookmarked;
        self.prune(id);
        bookmarked
    }

    pub fn report(&mut self, id: &str, reason: &str) -> Result<(), InteractionError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(InteractionError::EmptyReason);
        }
        if self.get(id).map_or(false, InteractionState::is_reported) {
            return Err(InteractionError::AlreadyReported { id: id.to_string() });
        }
        self.entry(id).report = Some(Report {
            reason: reason.to_string(),
            reported_at: chrono::Utc::now().to_rfc3339(),
        });
        log::info!("reported {}: {}", id, reason);
        Ok(())
    }

    /// Withdraw a report; returns whether one existed
    pub fn clear_report(&mut self, id: &str) -> bool {
        let cleared = match self.entries.get_mut(id) {
            Some(state) => state.report.take().is_some(),
            None => false,
        };
        self.prune(id);
        cleared
    }

    /// Ids of bookmarked entities, in id order
    pub fn bookmarked_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, state)| state.bookmarked)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn save(&self, storage: &dyn KeyValueStorage) -> Result<(), InteractionError> {
        let persisted = PersistedInteractions {
            version: STORAGE_VERSION,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string(&persisted).map_err(InteractionError::Serialize)?;
        storage.set_item(STORAGE_KEY, &json)?;
        Ok(())
    }

    /// Load the map; a missing key is an empty store
    pub fn load(storage: &dyn KeyValueStorage) -> Result<Self, InteractionError> {
        let Some(json) = storage.get_item(STORAGE_KEY)? else {
            return Ok(Self::new());
        };
        let persisted: PersistedInteractions =
            serde_json::from_str(&json).map_err(InteractionError::Corrupt)?;
        if persisted.version != STORAGE_VERSION {
            return Err(InteractionError::UnsupportedVersion {
                found: persisted.version,
            });
        }
        Ok(Self {
            entries: persisted.entries,
        })
    }

    /// Load, falling back to an empty store when storage is unusable
    pub fn load_or_default(storage: &dyn KeyValueStorage) -> Self {
        match Self::load(storage) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("discarding stored interactions: {}", e);
                Self::new()
            }
        }
    }

    fn entry(&mut self, id: &str) -> &mut InteractionState {
        self.entries.entry(id.to_string()).or_default()
    }

    fn prune(&mut self, id: &str) {
        if self.entries.get(id).map_or(false, InteractionState::is_empty) {
            self.entries.remove(id);
        }
    }
}
