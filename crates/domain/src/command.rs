//! Command — one device action bound to one device, invocable via [`execute`](Command::execute).

use std::fmt;
use std::sync::Arc;

use crate::action::ActionKind;
use crate::device::{Device, DeviceHandle};
use crate::error::DeviceError;
use crate::id::DeviceId;

/// Immutable binding of an [`ActionKind`] to a specific device.
///
/// Commands are normally obtained from the command pool so that exactly one
/// instance exists per `(device, action)` pair, but any command may be bound
/// to an invoker slot.
pub struct Command {
    device_id: DeviceId,
    device_key: String,
    action: ActionKind,
    device: Arc<dyn Device>,
}

impl Command {
    /// Bind `action` to the device behind `handle`.
    #[must_use]
    pub fn new(handle: &DeviceHandle, action: ActionKind) -> Self {
        Self {
            device_id: handle.id(),
            device_key: handle.key().to_string(),
            action,
            device: Arc::clone(handle.device()),
        }
    }

    /// Invoke the bound capability on the device.
    ///
    /// # Errors
    ///
    /// Returns the device's own [`DeviceError`], untranslated.
    pub fn execute(&self) -> Result<(), DeviceError> {
        self.device.perform(self.action)
    }

    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    #[must_use]
    pub fn device_key(&self) -> &str {
        &self.device_key
    }

    #[must_use]
    pub fn action(&self) -> ActionKind {
        self.action
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.action, self.device_key)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("device_id", &self.device_id)
            .field("device_key", &self.device_key)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}
