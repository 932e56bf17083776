//! Host update transient

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::update::UpdateDescriptor;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database operation failed: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to encode transient: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Short-lived cache of pending plugin updates owned by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTransient {
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
    /// Installed version per plugin identifier, filled in by the host before a check
    #[serde(default)]
    pub checked: BTreeMap<String, String>,
    /// Pending update per plugin identifier
    #[serde(default)]
    pub response: BTreeMap<String, UpdateDescriptor>,
}

impl UpdateTransient {
    /// Starts a new check cycle: updates pending from the previous cycle are dropped
    pub fn begin_cycle(checked: BTreeMap<String, String>) -> Self {
        Self {
            last_checked: Some(Utc::now()),
            checked,
            response: BTreeMap::new(),
        }
    }

    pub fn pending(&self, plugin: &str) -> Option<&UpdateDescriptor> {
        self.response.get(plugin)
    }
}

/// Read/write access to the host's update transient
pub trait UpdateStore: Send + Sync {
    fn load(&self) -> Result<Option<UpdateTransient>, StoreError>;

    fn save(&self, transient: &UpdateTransient) -> Result<(), StoreError>;
}

/// Update store that lives for the duration of the process
#[derive(Default)]
pub struct MemoryUpdateStore {
    transient: Mutex<Option<UpdateTransient>>,
}

impl MemoryUpdateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transient(transient: UpdateTransient) -> Self {
        Self {
            transient: Mutex::new(Some(transient)),
        }
    }
}

impl UpdateStore for MemoryUpdateStore {
    fn load(&self) -> Result<Option<UpdateTransient>, StoreError> {
        let guard = self.transient.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, transient: &UpdateTransient) -> Result<(), StoreError> {
        let mut guard = self.transient.lock().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(transient.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::descriptor::DescriptionSections;

    fn descriptor() -> UpdateDescriptor {
        UpdateDescriptor {
            slug: "toolkit".to_string(),
            plugin: "toolkit/toolkit.php".to_string(),
            new_version: "v1.3.0".to_string(),
            url: "https://github.com/softtent/toolkit/releases/tag/v1.3.0".to_string(),
            package: "https://api.github.com/repos/softtent/toolkit/zipball/v1.3.0".to_string(),
            sections: DescriptionSections::default(),
        }
    }

    #[test]
    fn memory_store_starts_empty() {
        let store = MemoryUpdateStore::new();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn memory_store_returns_saved_transient() {
        let store = MemoryUpdateStore::new();
        let mut transient = UpdateTransient::default();
        transient
            .response
            .insert("toolkit/toolkit.php".to_string(), descriptor());

        store.save(&transient).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.pending("toolkit/toolkit.php"), Some(&descriptor()));
        assert_eq!(loaded.pending("other/other.php"), None);
    }

    #[test]
    fn begin_cycle_drops_previous_pending_updates() {
        let mut previous = UpdateTransient::default();
        previous
            .checked
            .insert("toolkit/toolkit.php".to_string(), "1.2.9".to_string());
        previous
            .response
            .insert("toolkit/toolkit.php".to_string(), descriptor());

        let transient = UpdateTransient::begin_cycle(previous.checked.clone());

        assert_eq!(transient.checked, previous.checked);
        assert!(transient.response.is_empty());
        assert!(transient.last_checked.is_some());
    }

    #[test]
    fn transient_deserializes_with_missing_fields() {
        let transient: UpdateTransient = serde_json::from_str("{}").unwrap();
        assert_eq!(transient, UpdateTransient::default());
    }
}
