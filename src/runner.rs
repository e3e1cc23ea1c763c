//! Runner capability for leaf steps.
//!
//! Every leaf step names a [`RunnerKind`]; [`Runners`] owns one instance
//! per kind and resolves the kind to a `&mut dyn Runner`. A runner gets the
//! key of this poll plus a [`RunContext`] with everything it may touch and
//! answers [`Outcome::Continue`] or [`Outcome::Exit`].

use crate::beeper::BeepKind;
use crate::devices::RandomSource;
use crate::editors::{BeepEditor, BoundsEditor, PhaseField, RepeatEditor, ResetConfirm};
use crate::keys::{Key, KeyCode};
use crate::menu::{Outcome, RunnerKind};
use crate::settings::TimerConfig;
use crate::timer::TimerRunner;
use crate::ui::Frame;

/// Everything a runner can read or change during one poll.
pub struct RunContext<'a> {
    pub now: u64,
    /// Key code handled on the previous poll.
    pub last_key: KeyCode,
    pub config: &'a mut TimerConfig,
    pub rng: &'a mut dyn RandomSource,
    pub frame: &'a mut Frame,
    beep: Option<BeepKind>,
}

impl<'a> RunContext<'a> {
    pub fn new(
        now: u64,
        last_key: KeyCode,
        config: &'a mut TimerConfig,
        rng: &'a mut dyn RandomSource,
        frame: &'a mut Frame,
    ) -> Self {
        Self {
            now,
            last_key,
            config,
            rng,
            frame,
            beep: None,
        }
    }

    /// True if `key` is the key already handled last poll (held down).
    pub fn is_held(&self, key: Key) -> bool {
        key.code == self.last_key
    }

    /// Request a beep for this poll. A later request replaces an earlier one.
    pub fn beep(&mut self, kind: BeepKind) {
        self.beep = Some(kind);
    }

    pub fn take_beep(&mut self) -> Option<BeepKind> {
        self.beep.take()
    }
}

pub trait Runner {
    fn step(&mut self, key: Key, ctx: &mut RunContext<'_>) -> Outcome;
}

/// One runner per [`RunnerKind`].
pub struct Runners {
    pub timer: TimerRunner,
    pub timer_bounds: BoundsEditor,
    pub delay_bounds: BoundsEditor,
    pub repeat: RepeatEditor,
    pub beeps: BeepEditor,
    pub reset: ResetConfirm,
}

impl Default for Runners {
    fn default() -> Self {
        Self::new()
    }
}

impl Runners {
    pub const fn new() -> Self {
        Self {
            timer: TimerRunner::new(),
            timer_bounds: BoundsEditor::new(PhaseField::Timer),
            delay_bounds: BoundsEditor::new(PhaseField::Delay),
            repeat: RepeatEditor::new(),
            beeps: BeepEditor::new(),
            reset: ResetConfirm::new(),
        }
    }

    pub fn get(&mut self, kind: RunnerKind) -> &mut dyn Runner {
        match kind {
            RunnerKind::Timer => &mut self.timer,
            RunnerKind::TimerBounds => &mut self.timer_bounds,
            RunnerKind::DelayBounds => &mut self.delay_bounds,
            RunnerKind::Repeat => &mut self.repeat,
            RunnerKind::Beeps => &mut self.beeps,
            RunnerKind::Reset => &mut self.reset,
        }
    }

    /// Run the runner bound to `kind`.
    ///
    /// A confirmed factory reset also drops all volatile runner state, so
    /// a running timer stops.
    pub fn step(&mut self, kind: RunnerKind, key: Key, ctx: &mut RunContext<'_>) -> Outcome {
        let outcome = self.get(kind).step(key, ctx);
        if kind == RunnerKind::Reset && outcome == Outcome::Exit {
            *self = Runners::new();
        }
        outcome
    }
}
