//! Cyclic timer → delay → timer state machine.
//!
//! ```text
//!              SELECT                   countdown done
//! NotStarted ─────────► StartCountdown ───────────────► Started
//!      ▲        (start beeps off) ─────────────────────►   │ ▲
//!      │                                         0 left   │ │ 0 left
//!      │ limit reached                                   ▼ │
//!      └──────────────────────────────────────────────  Delayed
//!
//! Started ◄─RIGHT─► TimerPaused      Delayed ◄─RIGHT─► DelayPaused
//! ```
//!
//! The machine advances on whole-second ticks: each poll evaluates one
//! tick when at least `TICK_MS` passed since the previous one. DOWN
//! zeroes the running phase so the next tick crosses the boundary.


use crate::beeper::BeepKind;
use crate::config::{START_COUNTDOWN_SECS, TAIL_COUNTDOWN_SECS, TICK_MS};
use crate::devices::RandomSource;
use crate::keys::{Key, KeyCode};
use crate::menu::Outcome;
use crate::runner::{RunContext, Runner};
use crate::settings::{RepeatMode, TimerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerState {
    NotStarted,
    StartCountdown,
    Started,
    Delayed,
    TimerPaused,
    DelayPaused,
}

impl TimerState {
    /// Status label shown after `TIMER:`.
    pub const fn label(self) -> &'static str {
        match self {
            TimerState::NotStarted => "NOT STRTD",
            TimerState::StartCountdown => "STARTS IN:",
            TimerState::Started => "STARTED",
            TimerState::Delayed => "DELAYED",
            TimerState::TimerPaused => "T.PAUSED",
            TimerState::DelayPaused => "D.PAUSED",
        }
    }

    /// Started or Delayed.
    pub fn is_running(self) -> bool {
        matches!(self, TimerState::Started | TimerState::Delayed)
    }
}

/// Volatile timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRuntime {
    state: TimerState,
    /// Seconds left in the current timer or delay phase.
    seconds_left: u16,
    /// Rounds or limit time units left before the cycle stops.
    limit_left: u16,
    countdown_left: u16,
    last_tick: u64,
}

impl Default for TimerRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerRuntime {
    pub const fn new() -> Self {
        Self {
            state: TimerState::NotStarted,
            seconds_left: 0,
            limit_left: 0,
            countdown_left: 0,
            last_tick: 0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn seconds_left(&self) -> u16 {
        self.seconds_left
    }

    pub fn limit_left(&self) -> u16 {
        self.limit_left
    }

    pub fn countdown_left(&self) -> u16 {
        self.countdown_left
    }

    fn set_state(&mut self, next: TimerState) {
        if next != self.state {
            info!("timer: {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// (Re)start the cycle with a freshly sampled timer phase.
    pub fn start(&mut self, config: &TimerConfig, rng: &mut dyn RandomSource, now: u64) {
        self.seconds_left = u16::from(config.timer.sample(rng));
        self.limit_left = u16::from(config.limit);
        self.last_tick = now;
        if config.start_beeps {
            self.countdown_left = START_COUNTDOWN_SECS;
            self.set_state(TimerState::StartCountdown);
        } else {
            self.set_state(TimerState::Started);
        }
    }

    /// Pause a running phase or resume a paused one.
    pub fn toggle_pause(&mut self) {
        let next = match self.state {
            TimerState::Started => TimerState::TimerPaused,
            TimerState::Delayed => TimerState::DelayPaused,
            TimerState::TimerPaused => TimerState::Started,
            TimerState::DelayPaused => TimerState::Delayed,
            other => other,
        };
        self.set_state(next);
    }

    /// End the running phase on the next tick.
    pub fn skip_phase(&mut self) {
        if self.state.is_running() {
            self.seconds_left = 0;
        }
    }

    /// Drop back to NotStarted.
    pub fn stop(&mut self) {
        self.set_state(TimerState::NotStarted);
    }

    /// Evaluate a tick if one is due, then enforce the repeat limit.
    ///
    /// Returns the beep to play, if any.
    pub fn update(
        &mut self,
        config: &TimerConfig,
        rng: &mut dyn RandomSource,
        now: u64,
    ) -> Option<BeepKind> {
        let mut beep = None;
        if now.saturating_sub(self.last_tick) >= TICK_MS {
            beep = self.tick(config, rng);
            self.last_tick = now;
        }
        self.enforce_limit(config).or(beep)
    }

    fn tick(&mut self, config: &TimerConfig, rng: &mut dyn RandomSource) -> Option<BeepKind> {
        let was_running = self.state.is_running();
        let beep = match self.state {
            TimerState::StartCountdown => {
                if self.countdown_left > 1 {
                    self.countdown_left -= 1;
                    Some(BeepKind::StartTick)
                } else {
                    self.set_state(TimerState::Started);
                    Some(BeepKind::Start)
                }
            }
            TimerState::Started => {
                let mut beep = self.count_down(config.end_beeps, BeepKind::EndTick);
                if self.seconds_left == 0 {
                    self.set_state(TimerState::Delayed);
                    self.seconds_left = u16::from(config.delay.sample(rng));
                    if config.repeat == RepeatMode::Rounds {
                        self.limit_left = self.limit_left.saturating_sub(1);
                    }
                    beep = Some(BeepKind::Delay);
                }
                beep
            }
            TimerState::Delayed => {
                let mut beep = self.count_down(config.start_beeps, BeepKind::StartTick);
                if self.seconds_left == 0 {
                    self.set_state(TimerState::Started);
                    self.seconds_left = u16::from(config.timer.sample(rng));
                    beep = Some(BeepKind::Start);
                }
                beep
            }
            TimerState::NotStarted | TimerState::TimerPaused | TimerState::DelayPaused => None,
        };

        // Counts in Started and Delayed alike.
        if was_running && config.repeat == RepeatMode::TimeLimit {
            self.limit_left = self.limit_left.saturating_sub(1);
        }
        beep
    }

    /// One second off the running phase, with a tick beep in the tail window.
    fn count_down(&mut self, tail_beeps: bool, kind: BeepKind) -> Option<BeepKind> {
        if self.seconds_left == 0 {
            return None;
        }
        self.seconds_left -= 1;
        (tail_beeps && self.seconds_left > 0 && self.seconds_left < TAIL_COUNTDOWN_SECS)
            .then_some(kind)
    }

    fn enforce_limit(&mut self, config: &TimerConfig) -> Option<BeepKind> {
        if config.repeat == RepeatMode::Forever || self.limit_left > 0 {
            return None;
        }
        let beep = self.state.is_running().then_some(BeepKind::End);
        self.set_state(TimerState::NotStarted);
        beep
    }
}

/// Runner for the timer page.
///
/// SELECT (re)starts the cycle, RIGHT pauses/resumes, DOWN ends the
/// running phase. A held key acts once.
pub struct TimerRunner {
    runtime: TimerRuntime,
}

impl Default for TimerRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerRunner {
    pub const fn new() -> Self {
        Self {
            runtime: TimerRuntime::new(),
        }
    }

    pub fn runtime(&self) -> &TimerRuntime {
        &self.runtime
    }

    fn render(&self, ctx: &mut RunContext<'_>) {
        let rt = &self.runtime;
        ctx.frame
            .set_fmt(0, format_args!("TIMER:{}", rt.state().label()));
        match rt.state() {
            TimerState::NotStarted => ctx.frame.set(1, ""),
            TimerState::StartCountdown => {
                ctx.frame.set_fmt(1, format_args!("{}", rt.countdown_left()))
            }
            _ => ctx.frame.set_fmt(1, format_args!("{}", rt.seconds_left())),
        }
    }
}

impl Runner for TimerRunner {
    fn step(&mut self, key: Key, ctx: &mut RunContext<'_>) -> Outcome {
        if !ctx.is_held(key) {
            match key.code {
                KeyCode::Select => self.runtime.start(ctx.config, ctx.rng, ctx.now),
                KeyCode::Right => self.runtime.toggle_pause(),
                KeyCode::Down => self.runtime.skip_phase(),
                _ => {}
            }
        }

        if let Some(beep) = self.runtime.update(ctx.config, ctx.rng, ctx.now) {
            ctx.beep(beep);
        }
        self.render(ctx);
        Outcome::Continue
    }
}
