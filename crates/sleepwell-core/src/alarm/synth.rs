//! Procedural tone synthesis.
//!
//! Each [`AlarmStyle`] renders to a short mono PCM buffer. The alarm engine
//! replays the buffer on every repeat, so rendering happens once per `play`.

use std::f32::consts::TAU;

use super::AlarmStyle;

pub const SAMPLE_RATE: u32 = 44_100;

/// Mono PCM samples in `-1.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Tone {
    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0, |acc, s| acc.max(s.abs()))
    }
}

pub fn render(style: AlarmStyle) -> Tone {
    render_at(style, SAMPLE_RATE)
}

pub fn render_at(style: AlarmStyle, sample_rate: u32) -> Tone {
    let samples = match style {
        AlarmStyle::Beep => beep(sample_rate),
        AlarmStyle::Ascending => ascending(sample_rate),
        AlarmStyle::Digital => digital(sample_rate),
    };
    Tone {
        samples,
        sample_rate,
    }
}

fn sample_count(sample_rate: u32, seconds: f32) -> usize {
    (sample_rate as f32 * seconds).round() as usize
}

/// 880 Hz sine, gain 0.5 decaying exponentially to 0.001.
fn beep(sample_rate: u32) -> Vec<f32> {
    const LENGTH: f32 = 0.5;
    const FREQ: f32 = 880.0;
    const START_GAIN: f32 = 0.5;
    const END_GAIN: f32 = 0.001;

    let n = sample_count(sample_rate, LENGTH);
    let ratio = END_GAIN / START_GAIN;
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let gain = START_GAIN * ratio.powf(t / LENGTH);
            gain * (TAU * FREQ * t).sin()
        })
        .collect()
}

/// Triangle wave sweeping 440 Hz to 1320 Hz, faded in and out.
fn ascending(sample_rate: u32) -> Vec<f32> {
    const LENGTH: f32 = 0.6;
    const START_FREQ: f32 = 440.0;
    const END_FREQ: f32 = 1320.0;
    const GAIN: f32 = 0.3;
    const FADE: f32 = 0.1;

    let n = sample_count(sample_rate, LENGTH);
    let mut phase = 0.0f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let freq = START_FREQ * (END_FREQ / START_FREQ).powf(t / LENGTH);
            phase = (phase + freq / sample_rate as f32).fract();
            let triangle = 4.0 * (phase - 0.5).abs() - 1.0;

            let gain = if t < FADE {
                GAIN * t / FADE
            } else if t > LENGTH - FADE {
                GAIN * ((LENGTH - t) / FADE).max(0.0)
            } else {
                GAIN
            };
            gain * triangle
        })
        .collect()
}

/// Two square chirps, 1000 Hz then 1500 Hz, with a short gap.
fn digital(sample_rate: u32) -> Vec<f32> {
    const CHIRP: f32 = 0.1;
    const GAP: f32 = 0.05;
    const GAIN: f32 = 0.2;

    let square = |freq: f32| {
        (0..sample_count(sample_rate, CHIRP)).map(move |i| {
            let t = i as f32 / sample_rate as f32;
            if (TAU * freq * t).sin() >= 0.0 {
                GAIN
            } else {
                -GAIN
            }
        })
    };

    square(1000.0)
        .chain(std::iter::repeat(0.0).take(sample_count(sample_rate, GAP)))
        .chain(square(1500.0))
        .collect()
}
