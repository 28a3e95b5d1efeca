//! Invoker — a named slot table of commands ("remote control").

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use switchboard_domain::command::Command;
use switchboard_domain::error::SwitchboardError;
use switchboard_domain::outcome::TriggerOutcome;

/// Maps slot names to bound commands.
///
/// The slot lock is only held to read or mutate the table; commands run
/// after it is released, so a command may rebind slots without deadlocking.
#[derive(Default)]
pub struct Invoker {
    slots: RwLock<HashMap<String, Arc<Command>>>,
}

impl Invoker {
    /// Create an invoker with no bound slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `command` to `slot`, replacing whatever was bound before.
    pub fn bind(&self, slot: impl Into<String>, command: Arc<Command>) {
        let slot = slot.into();
        tracing::info!(slot = %slot, command = %command, "command bound to slot");
        let previous = self
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot, command);
        if let Some(previous) = previous {
            tracing::debug!(replaced = %previous, "slot rebound");
        }
    }

    /// Remove the binding for `slot`, returning the command it held.
    pub fn unbind(&self, slot: &str) -> Option<Arc<Command>> {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(slot)
    }

    /// The command currently bound to `slot`.
    #[must_use]
    pub fn command(&self, slot: &str) -> Option<Arc<Command>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(slot)
            .cloned()
    }

    /// Execute the command bound to `slot`.
    ///
    /// An unbound slot is not an error: it reports
    /// [`TriggerOutcome::NoCommandAssigned`] and touches no device.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Device`] carrying the device's own error
    /// when the bound command fails.
    #[tracing::instrument(skip(self))]
    pub fn trigger(&self, slot: &str) -> Result<TriggerOutcome, SwitchboardError> {
        tracing::info!("executing command on slot");
        let Some(command) = self.command(slot) else {
            tracing::warn!("no command assigned to slot");
            return Ok(TriggerOutcome::NoCommandAssigned);
        };

        tracing::debug!(command = %command, "command resolved");
        command.execute()?;
        Ok(TriggerOutcome::Executed)
    }

    /// Bound slot names, sorted.
    #[must_use]
    pub fn slots(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
