//! Virtual endpoint implementations — light and fan.
//!
//! Every endpoint is both a [`Device`] (driven by commands) and an
//! [`Observer`] (driven by mediator events).

mod fan;
mod light;

pub use fan::VirtualFan;
pub use light::VirtualLight;

use serde::{Deserialize, Serialize};

use switchboard_domain::device::Device;
use switchboard_domain::error::{DeviceError, ObserverError};
use switchboard_domain::event::Event;
use switchboard_domain::observer::Observer;

/// Which kind of virtual endpoint to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Fan,
}

/// Wrapper enum for the concrete virtual endpoint types.
pub enum VirtualDevice {
    Light(VirtualLight),
    Fan(VirtualFan),
}

impl VirtualDevice {
    /// Build an endpoint of the given kind, initially switched off.
    pub fn from_kind(kind: DeviceKind, name: impl Into<String>) -> Self {
        match kind {
            DeviceKind::Light => Self::Light(VirtualLight::new(name)),
            DeviceKind::Fan => Self::Fan(VirtualFan::new(name)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Light(_) => DeviceKind::Light,
            Self::Fan(_) => DeviceKind::Fan,
        }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        match self {
            Self::Light(d) => d.is_on(),
            Self::Fan(d) => d.is_on(),
        }
    }

    #[must_use]
    pub fn received_events(&self) -> usize {
        match self {
            Self::Light(d) => d.received_events(),
            Self::Fan(d) => d.received_events(),
        }
    }
}

impl Device for VirtualDevice {
    fn name(&self) -> &str {
        match self {
            Self::Light(d) => Device::name(d),
            Self::Fan(d) => Device::name(d),
        }
    }

    fn turn_on(&self) -> Result<(), DeviceError> {
        match self {
            Self::Light(d) => d.turn_on(),
            Self::Fan(d) => d.turn_on(),
        }
    }

    fn turn_off(&self) -> Result<(), DeviceError> {
        match self {
            Self::Light(d) => d.turn_off(),
            Self::Fan(d) => d.turn_off(),
        }
    }
}

impl Observer for VirtualDevice {
    fn name(&self) -> &str {
        Device::name(self)
    }

    fn update(&self, event: &Event) -> Result<(), ObserverError> {
        match self {
            Self::Light(d) => d.update(event),
            Self::Fan(d) => d.update(event),
        }
    }
}
