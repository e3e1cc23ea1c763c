//! Piezo beeper with non-blocking tones.
//!
//! `beep` starts a tone and records when it has to stop; `service` is
//! called every poll and silences the output once that time has passed.
//! A new beep replaces the one still playing.

use crate::devices::ToneOutput;

/// Audible cue kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeepKind {
    /// A timer phase starts.
    Start,
    /// A delay phase starts.
    Delay,
    /// Countdown tick before a timer phase.
    StartTick,
    /// Countdown tick before the end of a timer phase.
    EndTick,
    /// Round or time limit reached.
    End,
}

/// Frequency and length of one beep kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeepSpec {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

impl BeepKind {
    pub const fn spec(self) -> BeepSpec {
        let (frequency_hz, duration_ms) = match self {
            BeepKind::Start => (1500, 300),
            BeepKind::Delay => (1000, 300),
            BeepKind::StartTick => (1200, 100),
            BeepKind::EndTick => (800, 100),
            BeepKind::End => (100, 500),
        };
        BeepSpec {
            frequency_hz,
            duration_ms,
        }
    }
}

pub struct Beeper<T: ToneOutput> {
    output: T,
    stop_at: Option<u64>,
}

impl<T: ToneOutput> Beeper<T> {
    pub fn new(mut output: T) -> Self {
        output.stop();
        Self {
            output,
            stop_at: None,
        }
    }

    pub fn beep(&mut self, kind: BeepKind, now: u64) {
        let spec = kind.spec();
        self.output.start(spec.frequency_hz);
        self.stop_at = Some(now + spec.duration_ms);
    }

    /// Stop the current tone once its duration has elapsed.
    pub fn service(&mut self, now: u64) {
        if let Some(stop_at) = self.stop_at {
            if now >= stop_at {
                self.output.stop();
                self.stop_at = None;
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.stop_at.is_some()
    }

    pub fn output(&self) -> &T {
        &self.output
    }
}
