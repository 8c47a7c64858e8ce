//! Session-scoped transient storage
//!
//! Stand-in for browser session storage: string slots holding JSON, shared by
//! the planner flows and dropped with the session.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Slot holding the pending trip request
pub const REQUEST_SLOT: &str = "itineraryRequest";

/// Slot holding a generated itinerary
pub fn itinerary_key(id: &str) -> String {
    format!("itinerary-{}", id)
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored value for '{key}' is not valid: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Cloneable handle to one session's slots
#[derive(Debug, Clone, Default)]
pub struct SessionStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw string stored under `key`
    pub fn get(&self, key: &str) -> Option<String> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        debug!(%key, "SessionStorage::set: called");
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.insert(key, value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        debug!(%key, "SessionStorage::remove: called");
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.remove(key)
    }

    /// Drop every slot, as when the browsing session ends
    pub fn clear(&self) {
        debug!("SessionStorage::clear: called");
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.contains_key(key)
    }

    /// Serialize `value` as JSON into `key`
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, json);
        Ok(())
    }

    /// Deserialize the JSON in `key`; Ok(None) when the slot is empty
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        debug!(%key, "SessionStorage::get_json: called");
        match self.get(key) {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|source| StorageError::Decode {
                key: key.to_string(),
                source,
            }),
            None => {
                debug!(%key, "SessionStorage::get_json: empty slot");
                Ok(None)
            }
        }
    }
}
