//! Wires configured endpoints into a [`Switchboard`] and runs the script.

use std::collections::HashMap;
use std::sync::Arc;

use switchboard_adapter_virtual::VirtualDevice;
use switchboard_app::switchboard::Switchboard;
use switchboard_domain::device::Device;
use switchboard_domain::error::{InvalidArgumentError, SwitchboardError};
use switchboard_domain::observer::Observer;
use switchboard_domain::outcome::{PublishOutcome, TriggerOutcome};

use crate::config::{Config, Step};

/// What a single script step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Pressed(TriggerOutcome),
    Published(PublishOutcome),
    Unregistered(bool),
}

/// A switchboard plus the endpoints registered on it, by device key.
pub struct Wiring {
    board: Switchboard,
    endpoints: HashMap<String, Arc<VirtualDevice>>,
}

impl Wiring {
    /// Register every configured device, bind the slots and subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidArgumentError`] if a key is blank, duplicated, or
    /// referenced without being declared.
    pub fn build(config: &Config) -> Result<Self, SwitchboardError> {
        let board = Switchboard::new();
        let mut endpoints = HashMap::new();

        for device in &config.devices {
            let endpoint = Arc::new(VirtualDevice::from_kind(device.kind, device.name.clone()));
            board.add_device(device.key.clone(), Arc::clone(&endpoint) as Arc<dyn Device>)?;
            endpoints.insert(device.key.clone(), endpoint);
        }

        let wiring = Self { board, endpoints };
        for slot in &config.slots {
            wiring
                .board
                .bind_action(slot.name.clone(), &slot.device, slot.action)?;
        }
        for subscription in &config.subscriptions {
            let observer = wiring.observer(&subscription.device)?;
            wiring
                .board
                .subscribe(subscription.event_type.clone(), observer);
        }

        tracing::info!(
            devices = wiring.board.devices().len(),
            slots = wiring.board.invoker().len(),
            event_types = wiring.board.mediator().event_types().len(),
            "switchboard wired"
        );
        Ok(wiring)
    }

    /// Run `steps` in order, stopping at the first hard failure.
    ///
    /// # Errors
    ///
    /// Propagates device failures, observer delivery failures and unknown
    /// device keys in `unregister` steps.
    pub fn run(&self, steps: &[Step]) -> Result<Vec<StepOutcome>, SwitchboardError> {
        steps.iter().map(|step| self.run_step(step)).collect()
    }

    fn run_step(&self, step: &Step) -> Result<StepOutcome, SwitchboardError> {
        match step {
            Step::Press { slot } => self.board.press(slot).map(StepOutcome::Pressed),
            Step::Publish {
                event_type,
                payload,
            } => self
                .board
                .publish(event_type, payload.clone())
                .map(StepOutcome::Published),
            Step::Unregister { event_type, device } => {
                let observer = self.observer(device)?;
                Ok(StepOutcome::Unregistered(
                    self.board.unsubscribe(event_type, &observer),
                ))
            }
        }
    }

    #[must_use]
    pub fn board(&self) -> &Switchboard {
        &self.board
    }

    /// Endpoint registered under `key`.
    #[must_use]
    pub fn endpoint(&self, key: &str) -> Option<&Arc<VirtualDevice>> {
        self.endpoints.get(key)
    }

    fn observer(&self, key: &str) -> Result<Arc<dyn Observer>, InvalidArgumentError> {
        self.endpoints
            .get(key)
            .map(|endpoint| Arc::clone(endpoint) as Arc<dyn Observer>)
            .ok_or_else(|| InvalidArgumentError::UnknownDeviceKey(key.to_string()))
    }
}
