//! Event — a typed notification fanned out by the mediator.

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::time::{Timestamp, now};

/// A single published notification.
///
/// Observers registered for [`event_type`](Self::event_type) receive a
/// shared reference to the same event, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Subscription key, e.g. `"TURN_ON"`. Matched by string equality.
    pub event_type: String,
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event stamped with the current time.
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.into(),
            payload,
            timestamp: now(),
        }
    }

    /// Payload rendered for diagnostics: bare text for string payloads,
    /// compact JSON otherwise.
    #[must_use]
    pub fn payload_text(&self) -> String {
        match &self.payload {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_stamp_new_events() {
        let before = chrono::Utc::now();
        let event = Event::new("TURN_ON", serde_json::json!("Devices turned ON"));
        assert_eq!(event.event_type, "TURN_ON");
        assert!(event.timestamp >= before);
    }

    #[test]
    fn should_render_string_payload_without_quotes() {
        let event = Event::new("TURN_ON", serde_json::json!("Devices turned ON"));
        assert_eq!(event.payload_text(), "Devices turned ON");
    }

    #[test]
    fn should_render_structured_payload_as_json() {
        let event = Event::new("DIM", serde_json::json!({"level": 40}));
        assert_eq!(event.payload_text(), r#"{"level":40}"#);
    }
}
