//! Virtual light — switches on and off, and logs the events it receives.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use switchboard_domain::device::Device;
use switchboard_domain::error::{DeviceError, ObserverError};
use switchboard_domain::event::Event;
use switchboard_domain::observer::Observer;

/// A simulated light identified by the room it sits in.
pub struct VirtualLight {
    name: String,
    on: Mutex<bool>,
    received: AtomicUsize,
}

impl VirtualLight {
    /// Create a light that starts switched off.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: Mutex::new(false),
            received: AtomicUsize::new(0),
        }
    }

    /// Whether the light is currently on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        *self
            .on
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of events delivered to this light so far.
    #[must_use]
    pub fn received_events(&self) -> usize {
        self.received.load(Ordering::Relaxed)
    }

    fn switch(&self, on: bool) {
        *self
            .on
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = on;
        let state = if on { "ON" } else { "OFF" };
        tracing::info!(device = %self.name, "{} Light is {state}", self.name);
    }
}

impl Device for VirtualLight {
    fn name(&self) -> &str {
        &self.name
    }

    fn turn_on(&self) -> Result<(), DeviceError> {
        self.switch(true);
        Ok(())
    }

    fn turn_off(&self) -> Result<(), DeviceError> {
        self.switch(false);
        Ok(())
    }
}

impl Observer for VirtualLight {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, event: &Event) -> Result<(), ObserverError> {
        self.received.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            observer = %self.name,
            event_type = %event.event_type,
            "{} Light received event: {}",
            self.name,
            event.payload_text()
        );
        Ok(())
    }
}
