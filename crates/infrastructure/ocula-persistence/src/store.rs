use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::PreferenceError;

/// Flat key-value store for user preferences.
pub trait PreferenceStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<Value>, PreferenceError>;
    fn set(&self, key: &str, value: Value) -> Result<(), PreferenceError>;
    fn remove(&self, key: &str) -> Result<(), PreferenceError>;

    /// `None` when the key is missing or holds something other than a bool.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, PreferenceError> {
        Ok(self.get(key)?.and_then(|v| v.as_bool()))
    }

    /// `None` when the key is missing or holds something other than a string.
    fn get_string(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self
            .get(key)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<Value>, PreferenceError> {
        let values = self.values.lock().map_err(|_| PreferenceError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().map_err(|_| PreferenceError::Poisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().map_err(|_| PreferenceError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}
