//! Error taxonomy shared across the workspace.
//!
//! [`InvalidArgumentError`] is the only hard failure raised by the
//! registries themselves. Device failures travel unchanged from
//! [`Command::execute`](crate::command::Command::execute) to the caller, and
//! observer failures are collected into a [`DeliveryError`] once a publish
//! has reached every subscriber. Unbound slots and empty topics are not
//! errors at all: see [`outcome`](crate::outcome).

use std::fmt;

use crate::action::ActionKind;
use crate::id::DeviceId;

/// Top-level error returned by switchboard operations.
#[derive(Debug, thiserror::Error)]
pub enum SwitchboardError {
    #[error("invalid argument")]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error("device failure")]
    Device(#[from] DeviceError),

    #[error("event delivery failed")]
    Delivery(#[from] DeliveryError),
}

/// A caller passed a reference or key the registries cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgumentError {
    #[error("no device registered with id {0}")]
    UnknownDevice(DeviceId),

    #[error("no device registered under key {0:?}")]
    UnknownDeviceKey(String),

    #[error("device key must not be empty")]
    EmptyKey,

    #[error("device key {0:?} is already registered")]
    DuplicateKey(String),

    #[error("unknown action {0:?}")]
    UnknownAction(String),
}

/// A device capability call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The device could not be reached at all.
    #[error("device {device} is unreachable")]
    Unreachable { device: String },

    /// The device refused to perform the requested action.
    #[error("device {device} rejected {action}")]
    Rejected { device: String, action: ActionKind },
}

/// An observer failed to handle a delivered event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    #[error("observer {observer} is unavailable")]
    Unavailable { observer: String },
}

/// One failed delivery inside a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    /// Name reported by the failing observer.
    pub observer: String,
    pub error: ObserverError,
}

/// Raised after a best-effort publish in which at least one observer failed.
///
/// Every subscriber was still called; `delivered` counts the successful ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryError {
    pub event_type: String,
    pub delivered: usize,
    pub failures: Vec<ObserverFailure>,
}

impl DeliveryError {
    /// Number of observers the publish attempted to reach.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} observers failed for event {}",
            self.failures.len(),
            self.attempted(),
            self.event_type
        )
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| &failure.error as &(dyn std::error::Error + 'static))
    }
}
