//! Action kind — the closed set of device capabilities a command can invoke.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgumentError;

/// Capability a [`Command`](crate::command::Command) invokes on its device.
///
/// Serializes as `snake_case`; deserializes through [`FromStr`], so config
/// files may spell it `TURN_ON` or `turn-on` as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ActionKind {
    TurnOn,
    TurnOff,
}

impl ActionKind {
    /// Every action kind, in declaration order.
    pub const ALL: [Self; 2] = [Self::TurnOn, Self::TurnOff];

    /// Stable `snake_case` name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = InvalidArgumentError;

    /// Accepts `turn_on`, `TURN_ON`, `turn-on`, … (case-insensitive, `-` or `_`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "turn_on" => Ok(Self::TurnOn),
            "turn_off" => Ok(Self::TurnOff),
            _ => Err(InvalidArgumentError::UnknownAction(s.to_string())),
        }
    }
}

impl TryFrom<String> for ActionKind {
    type Error = InvalidArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
