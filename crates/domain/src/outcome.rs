//! Soft outcomes — observable results of dispatch operations that are not errors.

/// Result of pressing an invoker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The bound command ran to completion.
    Executed,
    /// Nothing is bound to the slot; no device was touched.
    NoCommandAssigned,
}

/// Result of publishing an event on the mediator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Number of observers that handled the event.
    Delivered(usize),
    /// No observer is registered for the event type; nothing was delivered.
    NoObservers,
}

impl PublishOutcome {
    /// Observers reached by the publish (`0` for [`NoObservers`](Self::NoObservers)).
    #[must_use]
    pub fn delivered(self) -> usize {
        match self {
            Self::Delivered(count) => count,
            Self::NoObservers => 0,
        }
    }
}
