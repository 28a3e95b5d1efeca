//! Configuration loading — TOML file with environment variable overrides.
//!
//! Reads `switchboard.toml` from the working directory (or the path in
//! `SWITCHBOARD_CONFIG`). Without a file the built-in living-room demo is
//! used. A file describes the whole setup: sections it leaves out are empty.

use std::collections::HashSet;

use serde::Deserialize;
use switchboard_adapter_virtual::DeviceKind;
use switchboard_domain::action::ActionKind;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Virtual endpoints to register.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    /// Invoker slot bindings.
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
    /// Mediator subscriptions.
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionConfig>,
    /// Steps run in order once everything is wired.
    #[serde(default)]
    pub script: Vec<Step>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// One virtual endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Registry key, e.g. `"Living Room Light"`.
    pub key: String,
    pub kind: DeviceKind,
    /// Display name used in the endpoint's log lines, e.g. `"Living Room"`.
    pub name: String,
}

/// Binds the pooled `(device, action)` command to a slot.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotConfig {
    pub name: String,
    /// Key of a configured device.
    pub device: String,
    pub action: ActionKind,
}

/// Registers a device's observer side for an event type.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionConfig {
    pub event_type: String,
    /// Key of a configured device.
    pub device: String,
}

/// A scripted interaction with the switchboard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Trigger an invoker slot.
    Press { slot: String },
    /// Publish an event on the mediator.
    Publish {
        event_type: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
    /// Remove a device's subscription.
    Unregister { event_type: String, device: String },
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if it
    /// references devices it does not declare.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("SWITCHBOARD_CONFIG").unwrap_or_else(|_| "switchboard.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SWITCHBOARD_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut keys = HashSet::new();
        for device in &self.devices {
            if device.key.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "device key must not be empty".to_string(),
                ));
            }
            if !keys.insert(device.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "device {:?} is declared twice",
                    device.key
                )));
            }
        }

        let references = self
            .slots
            .iter()
            .map(|s| s.device.as_str())
            .chain(self.subscriptions.iter().map(|s| s.device.as_str()))
            .chain(self.script.iter().filter_map(|step| match step {
                Step::Unregister { device, .. } => Some(device.as_str()),
                Step::Press { .. } | Step::Publish { .. } => None,
            }));
        for device in references {
            if !keys.contains(device) {
                return Err(ConfigError::Validation(format!(
                    "unknown device {device:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    /// The living-room demo: two lights and a fan, on/off slots for each,
    /// and a script exercising both dispatch paths.
    fn default() -> Self {
        let devices = vec![
            DeviceConfig::new("Living Room Light", DeviceKind::Light, "Living Room"),
            DeviceConfig::new("Kitchen Light", DeviceKind::Light, "Kitchen"),
            DeviceConfig::new("Bedroom Fan", DeviceKind::Fan, "Bedroom"),
        ];

        let mut slots = Vec::new();
        for device in &devices {
            for (suffix, action) in [("ON", ActionKind::TurnOn), ("OFF", ActionKind::TurnOff)] {
                slots.push(SlotConfig {
                    name: format!("{} {suffix}", device.key),
                    device: device.key.clone(),
                    action,
                });
            }
        }

        let subscriptions = vec![
            SubscriptionConfig::new("TURN_ON", "Living Room Light"),
            SubscriptionConfig::new("TURN_ON", "Kitchen Light"),
            SubscriptionConfig::new("TURN_OFF", "Bedroom Fan"),
            SubscriptionConfig::new("TURN_OFF", "Kitchen Light"),
        ];

        let mut script: Vec<Step> = [
            "Living Room Light ON",
            "Kitchen Light ON",
            "Bedroom Fan ON",
            "Living Room Light OFF",
            "Kitchen Light OFF",
            "Bedroom Fan OFF",
            "Garage Light ON",
        ]
        .into_iter()
        .map(|slot| Step::Press {
            slot: slot.to_string(),
        })
        .collect();
        script.extend([
            Step::publish("TURN_ON", "Devices turned ON"),
            Step::publish("TURN_OFF", "Devices turned OFF"),
            Step::Unregister {
                event_type: "TURN_OFF".to_string(),
                device: "Kitchen Light".to_string(),
            },
            Step::publish("TURN_OFF", "Devices turned OFF"),
        ]);

        Self {
            logging: LoggingConfig::default(),
            devices,
            slots,
            subscriptions,
            script,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "switchboardd=info,switchboard_app=info,switchboard_adapter_virtual=info"
                .to_string(),
        }
    }
}

impl DeviceConfig {
    fn new(key: &str, kind: DeviceKind, name: &str) -> Self {
        Self {
            key: key.to_string(),
            kind,
            name: name.to_string(),
        }
    }
}

impl SubscriptionConfig {
    fn new(event_type: &str, device: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            device: device.to_string(),
        }
    }
}

impl Step {
    fn publish(event_type: &str, payload: &str) -> Self {
        Self::Publish {
            event_type: event_type.to_string(),
            payload: serde_json::Value::String(payload.to_string()),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
