//! Command pool — one shared [`Command`] per `(device, action)` pair.
//!
//! Lookups and insertions happen under a single mutex, so concurrent callers
//! asking for the same pair always observe the same instance. The pool only
//! grows; commands live as long as the pool does.
//!
//! Commands are keyed by registration, not by device object: the same
//! `Arc<dyn Device>` registered under two keys gets two distinct commands.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use switchboard_domain::action::ActionKind;
use switchboard_domain::command::Command;
use switchboard_domain::device::DeviceHandle;
use switchboard_domain::error::{InvalidArgumentError, SwitchboardError};
use switchboard_domain::id::DeviceId;

use crate::device_registry::DeviceRegistry;

type PoolKey = (DeviceId, ActionKind);

/// Memoizing factory for device commands.
pub struct CommandPool {
    registry: Arc<DeviceRegistry>,
    commands: Mutex<HashMap<PoolKey, Arc<Command>>>,
    created: AtomicUsize,
}

impl CommandPool {
    /// Create an empty pool resolving device ids through `registry`.
    #[must_use]
    pub fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self {
            registry,
            commands: Mutex::new(HashMap::new()),
            created: AtomicUsize::new(0),
        }
    }

    /// Return the command for `(device_id, action)`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::UnknownDevice`] if `device_id` is not
    /// registered.
    #[tracing::instrument(skip(self))]
    pub fn get_or_create_command(
        &self,
        device_id: DeviceId,
        action: ActionKind,
    ) -> Result<Arc<Command>, SwitchboardError> {
        let handle = self
            .registry
            .get(device_id)
            .ok_or(InvalidArgumentError::UnknownDevice(device_id))?;
        Ok(self.pooled(&handle, action))
    }

    fn pooled(&self, handle: &DeviceHandle, action: ActionKind) -> Arc<Command> {
        let mut commands = self.commands.lock().unwrap_or_else(PoisonError::into_inner);
        let command = commands.entry((handle.id(), action)).or_insert_with(|| {
            self.created.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = handle.key(), %action, "command created");
            Arc::new(Command::new(handle, action))
        });
        Arc::clone(command)
    }

    /// Number of pooled commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many [`Command`] values this pool has ever constructed.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }
}
