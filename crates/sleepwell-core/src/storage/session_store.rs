//! Session history and persisted settings on top of a [`KvStore`].
//!
//! Reads never fail: missing or malformed values fall back to defaults.
//! Writes are best effort: each key is written independently and a failure
//! is logged, not retried.

use super::KvStore;
use crate::alarm::AlarmStyle;
use crate::session::SleepSession;
use crate::settings::{SleepSettings, SnoozeMinutes, DEFAULT_GOAL_MS};

/// Storage key names.
pub mod keys {
    pub const HISTORY: &str = "sleepHistory";
    pub const GOAL: &str = "sleepGoal";
    pub const ALARM: &str = "selectedAlarm";
    pub const SNOOZE: &str = "snoozeDuration";
}

pub struct SessionStore<K: KvStore> {
    kv: K,
    sessions: Vec<SleepSession>,
    settings: SleepSettings,
}

impl<K: KvStore> SessionStore<K> {
    /// Load history and settings from `kv`.
    pub fn open(kv: K) -> Self {
        let (sessions, _) = Self::load(&kv);
        let settings = Self::load_settings(&kv);
        tracing::debug!(sessions = sessions.len(), goal_ms = settings.goal_ms, "session store loaded");
        Self {
            kv,
            sessions,
            settings,
        }
    }

    /// Read the session list and goal.
    pub fn load(kv: &K) -> (Vec<SleepSession>, u64) {
        let sessions = read(kv, keys::HISTORY)
            .and_then(|raw| match serde_json::from_str::<Vec<SleepSession>>(&raw) {
                Ok(sessions) => Some(sessions),
                Err(e) => {
                    tracing::warn!(error = %e, "stored sleep history is malformed, ignoring it");
                    None
                }
            })
            .unwrap_or_default();
        (sessions, load_goal(kv))
    }

    /// Read goal, alarm style and snooze length. Notifications start enabled.
    pub fn load_settings(kv: &K) -> SleepSettings {
        let alarm_style = read(kv, keys::ALARM)
            .and_then(|raw| match raw.parse::<AlarmStyle>() {
                Ok(style) => Some(style),
                Err(e) => {
                    tracing::warn!(error = %e, "stored alarm style is invalid, using default");
                    None
                }
            })
            .unwrap_or_default();
        let snooze = read(kv, keys::SNOOZE)
            .and_then(|raw| {
                match raw.trim().parse::<u64>().ok().map(SnoozeMinutes::try_from) {
                    Some(Ok(snooze)) => Some(snooze),
                    _ => {
                        tracing::warn!(value = %raw, "stored snooze duration is invalid, using default");
                        None
                    }
                }
            })
            .unwrap_or_default();

        SleepSettings {
            goal_ms: load_goal(kv),
            alarm_style,
            snooze,
            ..SleepSettings::default()
        }
    }

    /// Write all four keys. Returns whether every write succeeded.
    pub fn save(
        kv: &K,
        sessions: &[SleepSession],
        goal_ms: u64,
        alarm_style: AlarmStyle,
        snooze: SnoozeMinutes,
    ) -> bool {
        let history = match serde_json::to_string(sessions) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize sleep history");
                None
            }
        };

        let mut ok = history.map(|json| write(kv, keys::HISTORY, &json)).unwrap_or(false);
        ok &= write(kv, keys::GOAL, &goal_ms.to_string());
        ok &= write(kv, keys::ALARM, alarm_style.as_str());
        ok &= write(kv, keys::SNOOZE, &snooze.minutes().to_string());
        ok
    }

    pub fn sessions(&self) -> &[SleepSession] {
        &self.sessions
    }

    /// The last `n` sessions in chronological order.
    pub fn recent(&self, n: usize) -> &[SleepSession] {
        let start = self.sessions.len().saturating_sub(n);
        &self.sessions[start..]
    }

    pub fn settings(&self) -> &SleepSettings {
        &self.settings
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Append a session and persist. Returns the stored session, whose id may
    /// carry a suffix if another session already used it.
    pub fn append(&mut self, mut session: SleepSession) -> &SleepSession {
        if self.sessions.iter().any(|s| s.id == session.id) {
            let base = session.id.clone();
            let mut n = 1;
            while self
                .sessions
                .iter()
                .any(|s| s.id == format!("{base}-{n}"))
            {
                n += 1;
            }
            session.id = format!("{base}-{n}");
        }
        tracing::info!(id = %session.id, duration_ms = session.duration_ms, "session recorded");
        self.sessions.push(session);
        self.persist();
        // Just pushed.
        &self.sessions[self.sessions.len() - 1]
    }

    /// Replace the confirmed settings and persist.
    pub fn update_settings(&mut self, settings: SleepSettings) {
        self.settings = settings;
        self.persist();
    }

    /// The notifications flag is not persisted, so this never writes.
    pub fn set_notifications(&mut self, enabled: bool) {
        self.settings.notifications_enabled = enabled;
    }

    /// Re-read everything from storage, discarding in-memory state.
    pub fn reload(&mut self) {
        let notifications_enabled = self.settings.notifications_enabled;
        self.sessions = Self::load(&self.kv).0;
        self.settings = SleepSettings {
            notifications_enabled,
            ..Self::load_settings(&self.kv)
        };
    }

    fn persist(&self) -> bool {
        Self::save(
            &self.kv,
            &self.sessions,
            self.settings.goal_ms,
            self.settings.alarm_style,
            self.settings.snooze,
        )
    }
}

fn read<K: KvStore>(kv: &K, key: &str) -> Option<String> {
    match kv.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read from storage");
            None
        }
    }
}

fn write<K: KvStore>(kv: &K, key: &str, value: &str) -> bool {
    match kv.set(key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to write to storage");
            false
        }
    }
}

fn load_goal<K: KvStore>(kv: &K) -> u64 {
    read(kv, keys::GOAL)
        .and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(goal) => Some(goal),
            Err(_) => {
                tracing::warn!(value = %raw, "stored sleep goal is invalid, using default");
                None
            }
        })
        .unwrap_or(DEFAULT_GOAL_MS)
}
