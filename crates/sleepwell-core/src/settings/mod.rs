//! User settings: the confirmed values the tracker reads, and the staging
//! area edits go through first.

mod staging;

pub use staging::{SettingsStage, StagedSettings};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmStyle;
use crate::error::ValidationError;

/// Eight hours.
pub const DEFAULT_GOAL_MS: u64 = 8 * 60 * 60 * 1000;

/// Snooze length in minutes. Only 5, 10 and 15 are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SnoozeMinutes(u8);

impl SnoozeMinutes {
    pub const ALLOWED: [u8; 3] = [5, 10, 15];

    pub fn minutes(&self) -> u64 {
        self.0 as u64
    }

    pub fn as_ms(&self) -> u64 {
        self.minutes() * 60_000
    }
}

impl Default for SnoozeMinutes {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u64> for SnoozeMinutes {
    type Error = ValidationError;

    fn try_from(minutes: u64) -> Result<Self, Self::Error> {
        Self::ALLOWED
            .iter()
            .find(|allowed| **allowed as u64 == minutes)
            .map(|allowed| Self(*allowed))
            .ok_or(ValidationError::InvalidSnooze(minutes))
    }
}

impl From<SnoozeMinutes> for u64 {
    fn from(snooze: SnoozeMinutes) -> Self {
        snooze.minutes()
    }
}

impl fmt::Display for SnoozeMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.0)
    }
}

/// Confirmed settings. Replaced as a whole, never field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSettings {
    pub goal_ms: u64,
    pub alarm_style: AlarmStyle,
    pub snooze: SnoozeMinutes,
    pub notifications_enabled: bool,
}

impl Default for SleepSettings {
    fn default() -> Self {
        Self {
            goal_ms: DEFAULT_GOAL_MS,
            alarm_style: AlarmStyle::default(),
            snooze: SnoozeMinutes::default(),
            notifications_enabled: true,
        }
    }
}
