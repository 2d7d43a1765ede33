//! Repeating alarm player.
//!
//! Like the sleep machine, the engine has no thread of its own. `play` sounds
//! the first tone immediately and `tick` replays it once per repeat interval.

use chrono::{DateTime, Duration, Utc};

use super::synth::{self, Tone};
use super::{AlarmStyle, ToneSink};

pub const DEFAULT_REPEAT_INTERVAL_MS: u64 = 1_200;

#[derive(Debug)]
struct Playing {
    style: AlarmStyle,
    tone: Tone,
    last_played: DateTime<Utc>,
}

pub struct AlarmEngine<S: ToneSink> {
    sink: S,
    repeat_interval: Duration,
    playing: Option<Playing>,
}

impl<S: ToneSink> AlarmEngine<S> {
    pub fn new(sink: S) -> Self {
        Self::with_interval(sink, DEFAULT_REPEAT_INTERVAL_MS)
    }

    pub fn with_interval(sink: S, repeat_interval_ms: u64) -> Self {
        Self {
            sink,
            repeat_interval: Duration::milliseconds(repeat_interval_ms.max(1) as i64),
            playing: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    pub fn style(&self) -> Option<AlarmStyle> {
        self.playing.as_ref().map(|p| p.style)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Start the repeating pattern. Returns `false` if already playing.
    pub fn play(&mut self, style: AlarmStyle, now: DateTime<Utc>) -> bool {
        if self.playing.is_some() {
            return false;
        }
        let tone = synth::render(style);
        tracing::info!(%style, "alarm started");
        self.sink.play(style, &tone);
        self.playing = Some(Playing {
            style,
            tone,
            last_played: now,
        });
        true
    }

    /// Halt the pattern. Returns `false` if nothing was playing.
    pub fn stop(&mut self) -> bool {
        match self.playing.take() {
            Some(playing) => {
                tracing::info!(style = %playing.style, "alarm stopped");
                true
            }
            None => false,
        }
    }

    /// Replay the tone if a full interval has passed. Returns whether it played.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let Some(playing) = self.playing.as_mut() else {
            return false;
        };
        if now - playing.last_played < self.repeat_interval {
            return false;
        }
        // Missed repeats are not replayed in a burst.
        playing.last_played = now;
        tracing::debug!(style = %playing.style, "alarm repeat");
        self.sink.play(playing.style, &playing.tone);
        true
    }
}
