//! Device registry — maps identifiers and keys to shared device handles.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use switchboard_domain::device::{Device, DeviceHandle};
use switchboard_domain::error::{InvalidArgumentError, SwitchboardError};
use switchboard_domain::id::DeviceId;

#[derive(Default)]
struct Entries {
    by_id: HashMap<DeviceId, DeviceHandle>,
    by_key: HashMap<String, DeviceId>,
}

/// Registry of every device known to the process.
///
/// Both indexes live behind a single lock so a key can never point at a
/// handle that is missing from the id index.
#[derive(Default)]
pub struct DeviceRegistry {
    entries: RwLock<Entries>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `device` under `key`, allocating a new [`DeviceId`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::EmptyKey`] for a blank key and
    /// [`InvalidArgumentError::DuplicateKey`] if the key is taken.
    #[tracing::instrument(skip_all)]
    pub fn register(
        &self,
        key: impl Into<String>,
        device: Arc<dyn Device>,
    ) -> Result<DeviceHandle, SwitchboardError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(InvalidArgumentError::EmptyKey.into());
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.by_key.contains_key(&key) {
            return Err(InvalidArgumentError::DuplicateKey(key).into());
        }

        let handle = DeviceHandle::new(key.clone(), device);
        entries.by_key.insert(key, handle.id());
        entries.by_id.insert(handle.id(), handle.clone());
        tracing::info!(
            key = handle.key(),
            device_id = %handle.id(),
            "device registered"
        );
        Ok(handle)
    }

    /// Look up a handle by identity.
    #[must_use]
    pub fn get(&self, id: DeviceId) -> Option<DeviceHandle> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.by_id.get(&id).cloned()
    }

    /// Look up a handle by registry key.
    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<DeviceHandle> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .by_key
            .get(key)
            .and_then(|id| entries.by_id.get(id))
            .cloned()
    }

    /// All handles, sorted by key.
    #[must_use]
    pub fn list(&self) -> Vec<DeviceHandle> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut handles: Vec<DeviceHandle> = entries.by_id.values().cloned().collect();
        handles.sort_by(|a, b| a.key().cmp(b.key()));
        handles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
