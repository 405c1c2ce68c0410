//! Best-effort session persistence over a key-value store.
//!
//! The stored blob is JSON of the shape
//! `{"stats": {..}, "sessionDone": [..], "discussedQuestions": [..]}`.
//! Decoding is lenient: a blob that is not a JSON object yields no snapshot,
//! and inside an object every field falls back to its default on its own.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use storage::repository::KeyValueStore;
use wheel_core::model::SessionSnapshot;

use crate::error::PersistenceError;

pub const DEFAULT_STORAGE_KEY: &str = "gtb-rad-session";

#[derive(Clone)]
pub struct SessionPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionPersistence {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write the snapshot, logging and swallowing any failure.
    pub async fn save(&self, snapshot: &SessionSnapshot) {
        if let Err(err) = self.try_save(snapshot).await {
            warn!(key = %self.key, error = %err, "session not saved");
        }
    }

    /// Read the stored snapshot. Missing, unreadable or corrupt data yields `None`.
    pub async fn load(&self) -> Option<SessionSnapshot> {
        match self.try_load().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(key = %self.key, error = %err, "starting with a fresh session");
                None
            }
        }
    }

    /// Remove the stored snapshot, logging and swallowing any failure.
    pub async fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key).await {
            warn!(key = %self.key, error = %err, "stored session not cleared");
        }
    }

    /// Write the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Unavailable` when the store rejects the write.
    pub async fn try_save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
        let raw = encode_snapshot(snapshot)?;
        self.store.set(&self.key, &raw).await?;
        debug!(key = %self.key, bytes = raw.len(), "session saved");
        Ok(())
    }

    /// Read the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Unavailable` when the store cannot be read
    /// and `PersistenceError::MalformedSnapshot` when the blob is not a JSON object.
    pub async fn try_load(&self) -> Result<Option<SessionSnapshot>, PersistenceError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        decode_snapshot(&raw).map(Some)
    }
}

/// Serialize a snapshot to its stored JSON form.
///
/// # Errors
///
/// Returns `PersistenceError::MalformedSnapshot` if serialization fails.
pub fn encode_snapshot(snapshot: &SessionSnapshot) -> Result<String, PersistenceError> {
    serde_json::to_string(snapshot).map_err(|err| PersistenceError::MalformedSnapshot(err.to_string()))
}

/// Decode a stored blob field by field.
///
/// # Errors
///
/// Returns `PersistenceError::MalformedSnapshot` if `raw` is not a JSON object.
pub fn decode_snapshot(raw: &str) -> Result<SessionSnapshot, PersistenceError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| PersistenceError::MalformedSnapshot(err.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(PersistenceError::MalformedSnapshot(
            "expected a JSON object".into(),
        ));
    };

    let defaults = SessionSnapshot::default();
    Ok(SessionSnapshot {
        stats: decode_field(&fields, "stats").unwrap_or(defaults.stats),
        session_done: decode_field(&fields, "sessionDone").unwrap_or(defaults.session_done),
        discussed_questions: decode_field(&fields, "discussedQuestions")
            .unwrap_or(defaults.discussed_questions),
    })
}

fn decode_field<T: DeserializeOwned>(fields: &Map<String, Value>, name: &str) -> Option<T> {
    let value = fields.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(field = name, error = %err, "ignoring malformed snapshot field");
            None
        }
    }
}
