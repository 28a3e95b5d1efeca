//! Switchboard — the explicit registry object handed to every caller.

use std::sync::{Arc, OnceLock};

use switchboard_domain::action::ActionKind;
use switchboard_domain::command::Command;
use switchboard_domain::device::{Device, DeviceHandle};
use switchboard_domain::error::{InvalidArgumentError, SwitchboardError};
use switchboard_domain::observer::Observer;
use switchboard_domain::outcome::{PublishOutcome, TriggerOutcome};

use crate::command_pool::CommandPool;
use crate::device_registry::DeviceRegistry;
use crate::invoker::Invoker;
use crate::mediator::EventMediator;

/// Owns the device registry, command pool, invoker and event mediator.
///
/// Construct one at start-up and pass it by reference. [`global`](Self::global)
/// exists for callers that cannot thread a reference through.
pub struct Switchboard {
    devices: Arc<DeviceRegistry>,
    commands: CommandPool,
    invoker: Invoker,
    mediator: EventMediator,
}

impl Default for Switchboard {
    fn default() -> Self {
        let devices = Arc::new(DeviceRegistry::new());
        Self {
            commands: CommandPool::new(Arc::clone(&devices)),
            devices,
            invoker: Invoker::new(),
            mediator: EventMediator::new(),
        }
    }
}

impl Switchboard {
    /// Create an empty switchboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance, created on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Switchboard> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    #[must_use]
    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    #[must_use]
    pub fn commands(&self) -> &CommandPool {
        &self.commands
    }

    #[must_use]
    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    #[must_use]
    pub fn mediator(&self) -> &EventMediator {
        &self.mediator
    }

    /// Register a device under `key`.
    ///
    /// # Errors
    ///
    /// See [`DeviceRegistry::register`].
    pub fn add_device(
        &self,
        key: impl Into<String>,
        device: Arc<dyn Device>,
    ) -> Result<DeviceHandle, SwitchboardError> {
        self.devices.register(key, device)
    }

    /// Pooled command for the device registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::UnknownDeviceKey`] if no device uses `key`.
    pub fn command(&self, key: &str, action: ActionKind) -> Result<Arc<Command>, SwitchboardError> {
        let handle = self
            .devices
            .find_by_key(key)
            .ok_or_else(|| InvalidArgumentError::UnknownDeviceKey(key.to_string()))?;
        self.commands.get_or_create_command(handle.id(), action)
    }

    /// Bind the pooled `(key, action)` command to `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::UnknownDeviceKey`] if no device uses `key`;
    /// the slot is left untouched in that case.
    pub fn bind_action(
        &self,
        slot: impl Into<String>,
        key: &str,
        action: ActionKind,
    ) -> Result<Arc<Command>, SwitchboardError> {
        let command = self.command(key, action)?;
        self.invoker.bind(slot, Arc::clone(&command));
        Ok(command)
    }

    /// Trigger the command bound to `slot`.
    ///
    /// # Errors
    ///
    /// See [`Invoker::trigger`].
    pub fn press(&self, slot: &str) -> Result<TriggerOutcome, SwitchboardError> {
        self.invoker.trigger(slot)
    }

    /// Register `observer` for `event_type`.
    pub fn subscribe(&self, event_type: impl Into<String>, observer: Arc<dyn Observer>) {
        self.mediator.register(event_type, observer);
    }

    /// Remove one registration of `observer` for `event_type`.
    pub fn unsubscribe(&self, event_type: &str, observer: &Arc<dyn Observer>) -> bool {
        self.mediator.unregister(event_type, observer)
    }

    /// Publish `payload` to the observers of `event_type`.
    ///
    /// # Errors
    ///
    /// See [`EventMediator::publish`].
    pub fn publish(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<PublishOutcome, SwitchboardError> {
        self.mediator.publish(event_type, payload)
    }
}
