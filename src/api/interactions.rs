//! `PostInteractions`: reactions, bookmarks and reports kept in localStorage
//!
//! Every transition is saved immediately. When storage is unavailable
//! (private mode, quota) the state still works for the page lifetime and
//! the failure is logged.

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, describe_js, js_error, serialize};
use crate::interactions::{InteractionStore, KeyValueStorage, StorageError};

/// `window.localStorage`, when the browser provides one
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn from_window() -> Self {
        let storage = web_sys::window().and_then(|w| match w.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("localStorage unavailable: {}", describe_js(&e));
                None
            }
        });
        Self { storage }
    }

    fn backend(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("no window.localStorage".to_string()))
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(describe_js(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend()?
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(describe_js(&e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.backend()?
            .remove_item(key)
            .map_err(|e| StorageError::Backend(describe_js(&e)))
    }
}

#[wasm_bindgen]
pub struct PostInteractions {
    store: InteractionStore,
    storage: LocalStorage,
}

#[wasm_bindgen]
impl PostInteractions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PostInteractions {
        let storage = LocalStorage::from_window();
        let store = InteractionStore::load_or_default(&storage);
        log::debug!("PostInteractions loaded {} entries", store.len());
        PostInteractions { store, storage }
    }

    /// Toggle my reaction; returns true when it is now active
    #[wasm_bindgen(js_name = toggleReaction)]
    pub fn toggle_reaction(&mut self, id: &str, emoji: &str) -> bool {
        let active = self.store.toggle_reaction(id, emoji);
        self.persist();
        active
    }

    /// Merge server-side counts (`{ emoji: count }`) for a post
    #[wasm_bindgen(js_name = seedReactions)]
    pub fn seed_reactions(&mut self, id: &str, counts: JsValue) -> Result<(), JsValue> {
        let counts: BTreeMap<String, u32> = deserialize(counts, "Invalid reaction counts")?;
        self.store.seed_reactions(id, &counts);
        self.persist();
        Ok(())
    }

    /// Toggle the bookmark; returns true when the post is now bookmarked
    #[wasm_bindgen(js_name = toggleBookmark)]
    pub fn toggle_bookmark(&mut self, id: &str) -> bool {
        let bookmarked = self.store.toggle_bookmark(id);
        self.persist();
        bookmarked
    }

    pub fn report(&mut self, id: &str, reason: &str) -> Result<(), JsValue> {
        self.store.report(id, reason).map_err(|e| js_error(e.to_string()))?;
        self.persist();
        Ok(())
    }

    #[wasm_bindgen(js_name = clearReport)]
    pub fn clear_report(&mut self, id: &str) -> bool {
        let cleared = self.store.clear_report(id);
        if cleared {
            self.persist();
        }
        cleared
    }

    /// State for one post, or `null` when there is none
    pub fn get(&self, id: &str) -> Result<JsValue, JsValue> {
        serialize(&self.store.get(id), "Failed to serialize interaction state")
    }

    #[wasm_bindgen(js_name = bookmarkedIds)]
    pub fn bookmarked_ids(&self) -> Result<JsValue, JsValue> {
        serialize(&self.store.bookmarked_ids(), "Failed to serialize bookmarks")
    }
}

impl PostInteractions {
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.storage) {
            log::warn!("could not persist interactions: {}", e);
        }
    }
}

impl Default for PostInteractions {
    fn default() -> Self {
        Self::new()
    }
}
