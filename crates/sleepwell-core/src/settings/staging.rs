use serde::Serialize;

use super::{SleepSettings, SnoozeMinutes};
use crate::alarm::AlarmStyle;
use crate::format::{hms_to_ms, ms_to_hms};

/// The editable subset of [`SleepSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StagedSettings {
    pub goal_ms: u64,
    pub alarm_style: AlarmStyle,
    pub snooze: SnoozeMinutes,
}

impl From<&SleepSettings> for StagedSettings {
    fn from(settings: &SleepSettings) -> Self {
        Self {
            goal_ms: settings.goal_ms,
            alarm_style: settings.alarm_style,
            snooze: settings.snooze,
        }
    }
}

/// Pending edits awaiting explicit confirmation.
///
/// Any edit marks the stage dirty, even one that restores the current value.
#[derive(Debug, Clone)]
pub struct SettingsStage {
    staged: StagedSettings,
    dirty: bool,
}

impl SettingsStage {
    pub fn new(confirmed: &SleepSettings) -> Self {
        Self {
            staged: confirmed.into(),
            dirty: false,
        }
    }

    pub fn staged(&self) -> &StagedSettings {
        &self.staged
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Staged goal split into `(hours, minutes, seconds)`.
    pub fn goal_hms(&self) -> (u64, u64, u64) {
        ms_to_hms(self.staged.goal_ms)
    }

    pub fn set_goal_ms(&mut self, goal_ms: u64) {
        self.staged.goal_ms = goal_ms;
        self.dirty = true;
    }

    pub fn set_goal_hms(&mut self, hours: u64, minutes: u64, seconds: u64) {
        self.set_goal_ms(hms_to_ms(hours, minutes, seconds));
    }

    /// Goal from raw text fields. Anything that is not a whole number counts as 0.
    pub fn set_goal_fields(&mut self, hours: &str, minutes: &str, seconds: &str) {
        self.set_goal_hms(coerce_field(hours), coerce_field(minutes), coerce_field(seconds));
    }

    pub fn set_alarm_style(&mut self, style: AlarmStyle) {
        self.staged.alarm_style = style;
        self.dirty = true;
    }

    pub fn set_snooze(&mut self, snooze: SnoozeMinutes) {
        self.staged.snooze = snooze;
        self.dirty = true;
    }

    /// Merge staged values over `confirmed` and clear the dirty flag.
    ///
    /// The caller replaces its confirmed settings with the returned value.
    pub fn confirm(&mut self, confirmed: &SleepSettings) -> SleepSettings {
        self.dirty = false;
        SleepSettings {
            goal_ms: self.staged.goal_ms,
            alarm_style: self.staged.alarm_style,
            snooze: self.staged.snooze,
            notifications_enabled: confirmed.notifications_enabled,
        }
    }

    /// Re-seed from confirmed settings, dropping any pending edits.
    pub fn reset_from(&mut self, confirmed: &SleepSettings) {
        self.staged = confirmed.into();
        self.dirty = false;
    }
}

fn coerce_field(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}
