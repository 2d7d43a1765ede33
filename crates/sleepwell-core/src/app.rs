//! Application state: one owned object tying the pieces together.
//!
//! [`SleepApp`] owns the confirmed settings (through the store), the
//! settings stage, the sleep state machine, the alarm engine and the
//! summary bookkeeping. Every command reads "now" from the clock and returns
//! the [`Event`]s it produced for the presentation layer.

use crate::alarm::{AlarmEngine, AlarmStyle, ToneSink};
use crate::clock::Clock;
use crate::events::Event;
use crate::format::format_duration;
use crate::session::SleepSession;
use crate::settings::{SettingsStage, SleepSettings, SnoozeMinutes};
use crate::storage::{Config, KvStore, SessionStore};
use crate::summary::{SummaryState, SummaryTicket};
use crate::tracker::SleepMachine;

/// Everything a detached summary task needs.
#[derive(Debug, Clone)]
pub struct SummaryJob {
    pub ticket: SummaryTicket,
    pub sessions: Vec<SleepSession>,
    pub goal_ms: u64,
}

pub struct SleepApp<K: KvStore, S: ToneSink, C: Clock> {
    clock: C,
    store: SessionStore<K>,
    stage: SettingsStage,
    machine: SleepMachine,
    alarm: AlarmEngine<S>,
    summary: SummaryState,
    summary_window: usize,
}

impl<K: KvStore, S: ToneSink, C: Clock> SleepApp<K, S, C> {
    pub fn new(kv: K, sink: S, clock: C) -> Self {
        Self::with_config(kv, sink, clock, &Config::default())
    }

    pub fn with_config(kv: K, sink: S, clock: C, config: &Config) -> Self {
        let mut store = SessionStore::open(kv);
        store.set_notifications(config.alarm.notifications_enabled);
        Self {
            clock,
            stage: SettingsStage::new(store.settings()),
            store,
            machine: SleepMachine::new(),
            alarm: AlarmEngine::with_interval(sink, config.alarm.repeat_interval_ms),
            summary: SummaryState::default(),
            summary_window: config.summary.history_window.max(1),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn settings(&self) -> &SleepSettings {
        self.store.settings()
    }

    pub fn sessions(&self) -> &[SleepSession] {
        self.store.sessions()
    }

    pub fn store(&self) -> &SessionStore<K> {
        &self.store
    }

    pub fn stage(&self) -> &SettingsStage {
        &self.stage
    }

    pub fn machine(&self) -> &SleepMachine {
        &self.machine
    }

    pub fn alarm(&self) -> &AlarmEngine<S> {
        &self.alarm
    }

    pub fn summary_busy(&self) -> bool {
        self.summary.is_busy()
    }

    pub fn snapshot(&self) -> Event {
        let now = self.clock.now();
        let elapsed_ms = self.machine.elapsed_ms(now);
        Event::StateSnapshot {
            state: self.machine.state(),
            elapsed_ms,
            elapsed: format_duration(elapsed_ms),
            goal_ms: self.settings().goal_ms,
            alarm_playing: self.alarm.is_playing(),
            snooze_until: self.machine.snooze_until(),
            settings_pending: self.machine.settings_pending(),
            at: now,
        }
    }

    // ── Tracker ──────────────────────────────────────────────────────

    pub fn start_sleep(&mut self) -> Event {
        let now = self.clock.now();
        match self.machine.start(now) {
            Ok(event) => {
                self.summary.invalidate();
                event
            }
            Err(reason) => {
                tracing::info!(%reason, "start rejected");
                Event::StartRejected {
                    reason: reason.to_string(),
                    at: now,
                }
            }
        }
    }

    /// Advance timers. Call about once a second.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.clock.now();
        let mut events = Vec::new();
        if let Some(event) = self.machine.tick(now, self.store.settings()) {
            if let Event::AlarmTriggered { style, .. } = &event {
                self.alarm.play(*style, now);
            }
            events.push(event);
        }
        self.alarm.tick(now);
        events
    }

    /// Confirm wake: stop the alarm and record the session.
    pub fn wake(&mut self) -> Option<Event> {
        let now = self.clock.now();
        self.alarm.stop();
        let session = self.machine.wake(now)?;
        let session = self.store.append(session).clone();
        Some(Event::SessionRecorded { session, at: now })
    }

    /// Same as [`wake`](Self::wake).
    pub fn stop_alarm(&mut self) -> Option<Event> {
        self.wake()
    }

    pub fn snooze(&mut self) -> Option<Event> {
        let now = self.clock.now();
        let event = self.machine.snooze(now, self.store.settings().snooze)?;
        self.alarm.stop();
        Some(event)
    }

    pub fn set_notifications(&mut self, enabled: bool) -> Event {
        self.store.set_notifications(enabled);
        tracing::info!(enabled, "notifications toggled");
        Event::NotificationsToggled {
            enabled,
            at: self.clock.now(),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn stage_goal_fields(&mut self, hours: &str, minutes: &str, seconds: &str) -> Event {
        self.stage.set_goal_fields(hours, minutes, seconds);
        self.staged()
    }

    pub fn stage_goal_ms(&mut self, goal_ms: u64) -> Event {
        self.stage.set_goal_ms(goal_ms);
        self.staged()
    }

    pub fn stage_alarm_style(&mut self, style: AlarmStyle) -> Event {
        self.stage.set_alarm_style(style);
        self.staged()
    }

    pub fn stage_snooze(&mut self, snooze: SnoozeMinutes) -> Event {
        self.stage.set_snooze(snooze);
        self.staged()
    }

    pub fn confirm_settings(&mut self) -> Event {
        let settings = self.stage.confirm(self.store.settings());
        self.store.update_settings(settings);
        self.machine.set_settings_pending(false);
        tracing::info!(goal_ms = settings.goal_ms, style = %settings.alarm_style, "settings confirmed");
        Event::SettingsConfirmed {
            settings,
            at: self.clock.now(),
        }
    }

    pub fn discard_settings(&mut self) -> Event {
        self.stage.reset_from(self.store.settings());
        self.machine.set_settings_pending(false);
        Event::SettingsDiscarded {
            at: self.clock.now(),
        }
    }

    /// Re-read history and settings from storage. Pending edits are dropped.
    pub fn reload(&mut self) {
        self.store.reload();
        self.stage.reset_from(self.store.settings());
        self.machine.set_settings_pending(false);
    }

    fn staged(&mut self) -> Event {
        self.machine.set_settings_pending(true);
        Event::SettingsStaged {
            staged: *self.stage.staged(),
            at: self.clock.now(),
        }
    }

    // ── Summary ──────────────────────────────────────────────────────

    /// Claim the summary slot. `None` while a request is already running.
    pub fn begin_summary(&mut self) -> Option<(Event, SummaryJob)> {
        let ticket = self.summary.begin()?;
        let job = SummaryJob {
            ticket,
            sessions: self.store.recent(self.summary_window).to_vec(),
            goal_ms: self.settings().goal_ms,
        };
        let started = Event::SummaryStarted {
            at: self.clock.now(),
        };
        Some((started, job))
    }

    /// Hand back a finished summary. Stale answers are dropped.
    pub fn finish_summary(&mut self, ticket: SummaryTicket, html: String) -> Event {
        let at = self.clock.now();
        if self.summary.finish(ticket) {
            Event::SummaryReady { html, at }
        } else {
            tracing::debug!("discarding stale summary");
            Event::SummaryDiscarded { at }
        }
    }
}
