//! Device — an endpoint exposing the fixed `turn_on` / `turn_off` capability set.

use std::fmt;
use std::sync::Arc;

use crate::action::ActionKind;
use crate::error::DeviceError;
use crate::id::DeviceId;

/// Capability contract every controllable device implements.
///
/// Implementations are side-effecting leaves: the dispatch core only ever
/// calls these methods and never inspects the device's internals.
pub trait Device: Send + Sync {
    /// Human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Switch the device on.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the device cannot perform the action.
    fn turn_on(&self) -> Result<(), DeviceError>;

    /// Switch the device off.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceError`] if the device cannot perform the action.
    fn turn_off(&self) -> Result<(), DeviceError>;

    /// Dispatch an [`ActionKind`] to the matching capability.
    ///
    /// # Errors
    ///
    /// Propagates the capability's [`DeviceError`] unchanged.
    fn perform(&self, action: ActionKind) -> Result<(), DeviceError> {
        match action {
            ActionKind::TurnOn => self.turn_on(),
            ActionKind::TurnOff => self.turn_off(),
        }
    }
}

/// A registered device: identity, lookup key and the shared device itself.
///
/// Cloning a handle is cheap and keeps the same identity.
#[derive(Clone)]
pub struct DeviceHandle {
    id: DeviceId,
    key: String,
    device: Arc<dyn Device>,
}

impl DeviceHandle {
    /// Wrap a device under a freshly allocated [`DeviceId`].
    pub fn new(key: impl Into<String>, device: Arc<dyn Device>) -> Self {
        Self {
            id: DeviceId::new(),
            key: key.into(),
            device,
        }
    }

    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Registry key, e.g. `"Living Room Light"`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn device(&self) -> &Arc<dyn Device> {
        &self.device
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("device", &self.device.name())
            .finish()
    }
}
