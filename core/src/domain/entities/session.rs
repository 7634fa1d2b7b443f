//! Session state scoped to a cookie-identified client

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keyed JSON values stored for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionData {
    entries: Map<String, Value>,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and deserializes the value stored under `key`.
    ///
    /// Returns `None` when the key is absent or holds a value of another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Stores `value` under `key`, replacing any previous value
    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Builds session data from a struct whose fields become the session keys
    pub fn from_state<T: Serialize>(state: &T) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(state)?)
    }

    /// Reads the whole session as one struct; absent keys fall back to the
    /// struct's serde defaults
    pub fn to_state<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.entries.clone()))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
