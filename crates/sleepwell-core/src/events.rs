use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alarm::AlarmStyle;
use crate::session::SleepSession;
use crate::settings::{SleepSettings, StagedSettings};
use crate::tracker::{AlarmCause, SleepState};

/// Every state change in the application produces an Event.
/// The presentation layer renders them; nothing else reads them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SleepStarted {
        at: DateTime<Utc>,
    },
    /// Start was refused; `reason` is meant for the user.
    StartRejected {
        reason: String,
        at: DateTime<Utc>,
    },
    AlarmTriggered {
        style: AlarmStyle,
        cause: AlarmCause,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    Snoozed {
        minutes: u64,
        until: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    SessionRecorded {
        session: SleepSession,
        at: DateTime<Utc>,
    },
    NotificationsToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
    SettingsStaged {
        staged: StagedSettings,
        at: DateTime<Utc>,
    },
    SettingsConfirmed {
        settings: SleepSettings,
        at: DateTime<Utc>,
    },
    SettingsDiscarded {
        at: DateTime<Utc>,
    },
    SummaryStarted {
        at: DateTime<Utc>,
    },
    SummaryReady {
        html: String,
        at: DateTime<Utc>,
    },
    /// A summary arrived after the request it answered was superseded.
    SummaryDiscarded {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SleepState,
        elapsed_ms: u64,
        elapsed: String,
        goal_ms: u64,
        alarm_playing: bool,
        snooze_until: Option<DateTime<Utc>>,
        settings_pending: bool,
        at: DateTime<Utc>,
    },
}
