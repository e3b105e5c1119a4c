//! In-memory store

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StorageError;
use crate::store::KeyValueStore;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Available,
    /// Reject writes whose total stored size would exceed this many bytes
    Quota(usize),
    /// Every call fails, like local storage in a context that has none
    Unavailable,
}

/// Process-local key-value store. Clones share the same entries.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    mode: Mode,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            mode: Mode::Available,
        }
    }

    /// A store that refuses writes once keys plus values exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            mode: Mode::Quota(quota),
            ..Self::new()
        }
    }

    /// A store whose reads and writes always fail.
    pub fn unavailable() -> Self {
        Self {
            mode: Mode::Unavailable,
            ..Self::new()
        }
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn usage_without(entries: &HashMap<String, String>, skip: &str) -> usize {
        entries
            .iter()
            .filter(|(k, _)| k.as_str() != skip)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.mode == Mode::Unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();

        match self.mode {
            Mode::Unavailable => return Err(StorageError::Unavailable),
            Mode::Quota(quota) => {
                let needed = Self::usage_without(&entries, key) + key.len() + value.len();
                if needed > quota {
                    return Err(StorageError::QuotaExceeded {
                        key: key.to_string(),
                        needed,
                        quota,
                    });
                }
            }
            Mode::Available => {}
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
