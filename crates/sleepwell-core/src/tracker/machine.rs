//! Sleep session state machine.
//!
//! Wall-clock based and thread-free: the caller passes `now` into every
//! command and calls `tick()` about once a second. Elapsed time is always
//! recomputed as `now - since`, so missed ticks cost nothing.
//!
//! ## State Transitions
//!
//! ```text
//!              start                  goal reached / snooze expired
//!   Idle ──────────────► Sleeping ───────────────────────────────► AlarmRinging
//!    ▲                    │   ▲                                       │   │
//!    │       wake         │   └────────────── snooze ─────────────────┘   │
//!    ├────────────────────┘                                               │
//!    └─────────────────────────────── wake ───────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::events::Event;
use crate::session::SleepSession;
use crate::settings::{SleepSettings, SnoozeMinutes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SleepState {
    Idle,
    Sleeping { since: DateTime<Utc> },
    /// Still asleep, with the alarm sounding.
    AlarmRinging { since: DateTime<Utc> },
}

impl SleepState {
    pub fn since(&self) -> Option<DateTime<Utc>> {
        match self {
            SleepState::Idle => None,
            SleepState::Sleeping { since } | SleepState::AlarmRinging { since } => Some(*since),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SleepState::Idle)
    }

    pub fn is_ringing(&self) -> bool {
        matches!(self, SleepState::AlarmRinging { .. })
    }
}

/// What made the alarm ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmCause {
    GoalReached,
    SnoozeExpired,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartRejected {
    #[error("Please confirm your settings before starting a sleep session.")]
    SettingsPending,
    #[error("A sleep session is already in progress.")]
    AlreadySleeping,
}

#[derive(Debug, Clone)]
pub struct SleepMachine {
    state: SleepState,
    settings_pending: bool,
    snooze_until: Option<DateTime<Utc>>,
    /// The goal alarm rings at most once per session.
    goal_alarm_fired: bool,
}

impl Default for SleepMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepMachine {
    pub fn new() -> Self {
        Self {
            state: SleepState::Idle,
            settings_pending: false,
            snooze_until: None,
            goal_alarm_fired: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SleepState {
        self.state
    }

    /// Always 0 while idle.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        self.state
            .since()
            .map(|since| (now - since).num_milliseconds().max(0) as u64)
            .unwrap_or(0)
    }

    pub fn snooze_until(&self) -> Option<DateTime<Utc>> {
        self.snooze_until
    }

    pub fn settings_pending(&self) -> bool {
        self.settings_pending
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Called by the settings stage whenever its dirty flag changes.
    pub fn set_settings_pending(&mut self, pending: bool) {
        self.settings_pending = pending;
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<Event, StartRejected> {
        if self.settings_pending {
            return Err(StartRejected::SettingsPending);
        }
        if !self.state.is_idle() {
            return Err(StartRejected::AlreadySleeping);
        }
        self.state = SleepState::Sleeping { since: now };
        self.snooze_until = None;
        self.goal_alarm_fired = false;
        tracing::info!(%now, "sleep started");
        Ok(Event::SleepStarted { at: now })
    }

    /// Call periodically. Returns `Some(Event::AlarmTriggered)` on the tick
    /// that moves the machine into `AlarmRinging`.
    pub fn tick(&mut self, now: DateTime<Utc>, settings: &SleepSettings) -> Option<Event> {
        if let Some(deadline) = self.snooze_until {
            if now >= deadline {
                self.snooze_until = None;
                return match self.state {
                    SleepState::Sleeping { .. } if settings.notifications_enabled => {
                        Some(self.ring(now, settings, AlarmCause::SnoozeExpired))
                    }
                    _ => {
                        tracing::debug!(state = ?self.state, "snooze re-trigger discarded");
                        None
                    }
                };
            }
        }

        let SleepState::Sleeping { .. } = self.state else {
            return None;
        };
        let goal = settings.goal_ms;
        let reached = goal > 0 && self.elapsed_ms(now) >= goal;
        if reached && !self.goal_alarm_fired && settings.notifications_enabled {
            self.goal_alarm_fired = true;
            return Some(self.ring(now, settings, AlarmCause::GoalReached));
        }
        None
    }

    /// Silence the alarm, keep sleeping, re-ring after `snooze`.
    pub fn snooze(&mut self, now: DateTime<Utc>, snooze: SnoozeMinutes) -> Option<Event> {
        let SleepState::AlarmRinging { since } = self.state else {
            return None;
        };
        let until = now + Duration::milliseconds(snooze.as_ms() as i64);
        self.state = SleepState::Sleeping { since };
        self.snooze_until = Some(until);
        tracing::info!(minutes = snooze.minutes(), %until, "alarm snoozed");
        Some(Event::Snoozed {
            minutes: snooze.minutes(),
            until,
            at: now,
        })
    }

    /// End the session. Returns the completed session unless already idle.
    pub fn wake(&mut self, now: DateTime<Utc>) -> Option<SleepSession> {
        let since = self.state.since()?;
        self.state = SleepState::Idle;
        self.snooze_until = None;
        self.goal_alarm_fired = false;
        Some(SleepSession::new(since, now))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn ring(&mut self, now: DateTime<Utc>, settings: &SleepSettings, cause: AlarmCause) -> Event {
        let since = self.state.since().unwrap_or(now);
        self.state = SleepState::AlarmRinging { since };
        let elapsed_ms = self.elapsed_ms(now);
        tracing::info!(?cause, elapsed_ms, "alarm triggered");
        Event::AlarmTriggered {
            style: settings.alarm_style,
            cause,
            elapsed_ms,
            at: now,
        }
    }
}
