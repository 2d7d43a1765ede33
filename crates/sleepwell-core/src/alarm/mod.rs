mod engine;
pub mod synth;

pub use engine::{AlarmEngine, DEFAULT_REPEAT_INTERVAL_MS};
pub use synth::{Tone, SAMPLE_RATE};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Named alarm patterns. The string forms are what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlarmStyle {
    #[default]
    Beep,
    Ascending,
    Digital,
}

impl AlarmStyle {
    pub const ALL: [AlarmStyle; 3] = [AlarmStyle::Beep, AlarmStyle::Ascending, AlarmStyle::Digital];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmStyle::Beep => "Beep",
            AlarmStyle::Ascending => "Ascending",
            AlarmStyle::Digital => "Digital",
        }
    }
}

impl fmt::Display for AlarmStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlarmStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownAlarmStyle(s.to_string()))
    }
}

/// Destination for synthesized tones.
pub trait ToneSink {
    fn play(&mut self, style: AlarmStyle, tone: &Tone);
}

/// Discards every tone.
#[derive(Debug, Default)]
pub struct SilentSink;

impl ToneSink for SilentSink {
    fn play(&mut self, _style: AlarmStyle, _tone: &Tone) {}
}

impl<S: ToneSink + ?Sized> ToneSink for Box<S> {
    fn play(&mut self, style: AlarmStyle, tone: &Tone) {
        (**self).play(style, tone)
    }
}
