//! Terminal bell output for the alarm.

use std::io::{Stderr, Write};
use std::thread;
use std::time::Duration;

use sleepwell_core::alarm::{AlarmStyle, Tone, ToneSink};

const BEL: u8 = 0x07;

/// Offsets in milliseconds of each bell within one tone.
///
/// Beep is a single strike. Ascending speeds up towards its end. Digital
/// rings once per chirp.
fn pattern(style: AlarmStyle) -> &'static [u64] {
    match style {
        AlarmStyle::Beep => &[0],
        AlarmStyle::Ascending => &[0, 300, 450],
        AlarmStyle::Digital => &[0, 150],
    }
}

/// Rings the bell pattern of each tone's style. `enabled = false` keeps it quiet.
pub struct BellSink<W: Write = Stderr> {
    out: W,
    enabled: bool,
    paced: bool,
}

impl BellSink {
    pub fn new(enabled: bool) -> Self {
        Self {
            out: std::io::stderr(),
            enabled,
            paced: true,
        }
    }
}

impl<W: Write> BellSink<W> {
    /// Write to `out` without waiting between strikes.
    #[cfg(test)]
    fn unpaced(out: W, enabled: bool) -> Self {
        Self {
            out,
            enabled,
            paced: false,
        }
    }

    fn ring(&mut self, offsets: &[u64]) -> std::io::Result<()> {
        let mut at = 0;
        for &offset in offsets {
            if self.paced && offset > at {
                thread::sleep(Duration::from_millis(offset - at));
            }
            at = offset;
            self.out.write_all(&[BEL])?;
            self.out.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> ToneSink for BellSink<W> {
    fn play(&mut self, style: AlarmStyle, tone: &Tone) {
        tracing::debug!(%style, duration_ms = tone.duration_ms(), "alarm tone");
        if !self.enabled {
            return;
        }
        if let Err(e) = self.ring(pattern(style)) {
            tracing::debug!(error = %e, "terminal bell unavailable");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleepwell_core::alarm::synth;

    fn rung(style: AlarmStyle) -> Vec<u8> {
        let mut sink = BellSink::unpaced(Vec::new(), true);
        sink.play(style, &synth::render(style));
        sink.out
    }

    #[test]
    fn each_style_rings_differently() {
        let beep = rung(AlarmStyle::Beep);
        let ascending = rung(AlarmStyle::Ascending);
        let digital = rung(AlarmStyle::Digital);

        assert_eq!(beep, vec![BEL]);
        assert_eq!(ascending, vec![BEL; 3]);
        assert_eq!(digital, vec![BEL; 2]);
        assert_ne!(beep, ascending);
        assert_ne!(ascending, digital);
    }

    #[test]
    fn patterns_fit_inside_their_tone() {
        for style in AlarmStyle::ALL {
            let offsets = pattern(style);
            let tone = synth::render(style);
            assert_eq!(offsets[0], 0, "{style}");
            assert!(offsets.windows(2).all(|w| w[0] < w[1]), "{style}");
            assert!(*offsets.last().unwrap() < tone.duration_ms(), "{style}");
        }
    }

    #[test]
    fn disabled_sink_stays_quiet() {
        let mut sink = BellSink::unpaced(Vec::new(), false);
        sink.play(AlarmStyle::Digital, &synth::render(AlarmStyle::Digital));
        assert!(sink.out.is_empty());
    }
}
