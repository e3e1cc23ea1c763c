//! Runners for the settings pages.
//!
//! All editors share one pattern: act on the key, then render the field.
//! SELECT switches mode, RIGHT moves between sub-fields, UP/DOWN change
//! the value by [`EDIT_STEP`] (or [`EDIT_STEP_LONG`] on a long press),
//! clamped to the field's range. A held key in single mode does nothing;
//! a long press keeps stepping.
//!
//! Editors change `ctx.config` in place; the controller persists the
//! snapshot when it differs after the poll.

use crate::config::{EDIT_STEP, EDIT_STEP_LONG};
use crate::keys::{Key, KeyCode, KeyMode};
use crate::menu::Outcome;
use crate::runner::{RunContext, Runner};
use crate::settings::{
    PhaseBounds, PhaseMode, RepeatMode, TimerConfig, ValueRange, DELAY_RANGE, TIMER_RANGE,
};

/// Value change requested by UP/DOWN, or 0.
fn edit_delta(key: Key, held: bool) -> i16 {
    let magnitude = match key.mode {
        KeyMode::Long => EDIT_STEP_LONG,
        _ if !held => EDIT_STEP,
        _ => 0,
    };
    match key.code {
        KeyCode::Up => magnitude,
        KeyCode::Down => -magnitude,
        _ => 0,
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

/// Which sub-field of a two-part editor is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    First,
    Second,
}

impl Slot {
    fn toggled(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Timer / delay bounds
// ═══════════════════════════════════════════════════════════════════════════

/// Phase whose bounds an editor works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseField {
    Timer,
    Delay,
}

impl PhaseField {
    fn label(self) -> &'static str {
        match self {
            PhaseField::Timer => "SET TMR: ",
            PhaseField::Delay => "SET DELAY:",
        }
    }

    fn range(self) -> ValueRange {
        match self {
            PhaseField::Timer => TIMER_RANGE,
            PhaseField::Delay => DELAY_RANGE,
        }
    }

    fn bounds(self, config: &mut TimerConfig) -> &mut PhaseBounds {
        match self {
            PhaseField::Timer => &mut config.timer,
            PhaseField::Delay => &mut config.delay,
        }
    }
}

/// Fixed/random mode plus min/max of the timer or delay phase.
///
/// In fixed mode only `min` is edited and `max` follows it.
pub struct BoundsEditor {
    field: PhaseField,
    selected: Slot,
}

impl BoundsEditor {
    pub const fn new(field: PhaseField) -> Self {
        Self {
            field,
            selected: Slot::First,
        }
    }

    fn render(&self, ctx: &mut RunContext<'_>) {
        let bounds = *self.field.bounds(ctx.config);
        match bounds.mode {
            PhaseMode::Fixed => {
                ctx.frame
                    .set_fmt(0, format_args!("{}FIX", self.field.label()));
                ctx.frame.set_fmt(1, format_args!("{}", bounds.min));
            }
            PhaseMode::Random => {
                ctx.frame
                    .set_fmt(0, format_args!("{}RND", self.field.label()));
                match self.selected {
                    Slot::First => ctx.frame.set_fmt(1, format_args!("MIN: {}", bounds.min)),
                    Slot::Second => ctx.frame.set_fmt(1, format_args!("MAX: {}", bounds.max)),
                }
            }
        }
    }
}

impl Runner for BoundsEditor {
    fn step(&mut self, key: Key, ctx: &mut RunContext<'_>) -> Outcome {
        let held = ctx.is_held(key);
        let range = self.field.range();
        let bounds = self.field.bounds(ctx.config);

        match key.code {
            KeyCode::Select if !held => {
                bounds.mode = match bounds.mode {
                    PhaseMode::Fixed => PhaseMode::Random,
                    PhaseMode::Random => PhaseMode::Fixed,
                };
                bounds.align();
            }
            KeyCode::Right if !held => {
                if bounds.mode == PhaseMode::Random {
                    self.selected = self.selected.toggled();
                }
            }
            KeyCode::Up | KeyCode::Down => {
                let delta = edit_delta(key, held);
                match self.selected {
                    Slot::First => bounds.min = range.step(bounds.min, delta),
                    Slot::Second => bounds.max = range.step(bounds.max, delta),
                }
                bounds.align();
            }
            _ => {}
        }

        if bounds.mode == PhaseMode::Fixed {
            self.selected = Slot::First;
        }
        self.render(ctx);
        Outcome::Continue
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Repeat mode
// ═══════════════════════════════════════════════════════════════════════════

/// Repeat mode and its limit (rounds or time units).
pub struct RepeatEditor;

impl RepeatEditor {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RepeatEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner for RepeatEditor {
    fn step(&mut self, key: Key, ctx: &mut RunContext<'_>) -> Outcome {
        let held = ctx.is_held(key);
        let config = &mut *ctx.config;

        match key.code {
            KeyCode::Select if !held => {
                config.repeat = config.repeat.next();
                if let Some(range) = config.repeat.limit_range() {
                    config.limit = range.clamp(i16::from(config.limit));
                }
            }
            KeyCode::Up | KeyCode::Down => {
                if let Some(range) = config.repeat.limit_range() {
                    config.limit = range.step(config.limit, edit_delta(key, held));
                }
            }
            _ => {}
        }

        let (mode, limit) = (config.repeat, config.limit);
        match mode {
            RepeatMode::Forever => {
                ctx.frame.set(0, "SET RPT:FRV");
                ctx.frame.set(1, "");
            }
            RepeatMode::TimeLimit | RepeatMode::Rounds => {
                let label = if mode == RepeatMode::TimeLimit {
                    "SET RPT:TIME"
                } else {
                    "SET RPT:RND"
                };
                ctx.frame.set(0, label);
                ctx.frame.set_fmt(1, format_args!("{}", limit));
            }
        }
        Outcome::Continue
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Countdown beeps
// ═══════════════════════════════════════════════════════════════════════════

/// On/off toggles for the start and end countdown beeps.
pub struct BeepEditor {
    selected: Slot,
}

impl BeepEditor {
    pub const fn new() -> Self {
        Self {
            selected: Slot::First,
        }
    }
}

impl Default for BeepEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner for BeepEditor {
    fn step(&mut self, key: Key, ctx: &mut RunContext<'_>) -> Outcome {
        if !ctx.is_held(key) {
            match key.code {
                KeyCode::Right => self.selected = self.selected.toggled(),
                KeyCode::Up | KeyCode::Down => match self.selected {
                    Slot::First => ctx.config.start_beeps = !ctx.config.start_beeps,
                    Slot::Second => ctx.config.end_beeps = !ctx.config.end_beeps,
                },
                _ => {}
            }
        }

        ctx.frame.set(0, "SET CNTDWN BEEP");
        match self.selected {
            Slot::First => ctx
                .frame
                .set_fmt(1, format_args!("START:{}", on_off(ctx.config.start_beeps))),
            Slot::Second => ctx
                .frame
                .set_fmt(1, format_args!("END:{}", on_off(ctx.config.end_beeps))),
        }
        Outcome::Continue
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Factory reset
// ═══════════════════════════════════════════════════════════════════════════

/// Two-state confirmation. UP/DOWN arm or disarm, SELECT while armed
/// restores the defaults and leaves the page.
pub struct ResetConfirm {
    armed: bool,
}

impl ResetConfirm {
    pub const fn new() -> Self {
        Self { armed: false }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl Default for ResetConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner for ResetConfirm {
    fn step(&mut self, key: Key, ctx: &mut RunContext<'_>) -> Outcome {
        if !ctx.is_held(key) {
            match key.code {
                KeyCode::Select if self.armed => {
                    info!("settings: factory reset");
                    *ctx.config = TimerConfig::defaults();
                    self.armed = false;
                    return Outcome::Exit;
                }
                KeyCode::Up | KeyCode::Down => self.armed = !self.armed,
                _ => {}
            }
        }

        ctx.frame.set(0, "RESET?");
        ctx.frame.set(1, if self.armed { "YES" } else { "NO" });
        Outcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::RandomSource;
    use crate::ui::Frame;

    struct Zero;

    impl RandomSource for Zero {
        fn next_u32(&mut self) -> u32 {
            0
        }
    }

    /// Minimal page harness: tracks the last key like the controller does.
    struct Page<R: Runner> {
        runner: R,
        config: TimerConfig,
        frame: Frame,
        last_key: KeyCode,
    }

    impl<R: Runner> Page<R> {
        fn new(runner: R) -> Self {
            Self {
                runner,
                config: TimerConfig::defaults(),
                frame: Frame::new(),
                last_key: KeyCode::None,
            }
        }

        fn send(&mut self, key: Key) -> Outcome {
            let mut rng = Zero;
            let mut ctx =
                RunContext::new(0, self.last_key, &mut self.config, &mut rng, &mut self.frame);
            let outcome = self.runner.step(key, &mut ctx);
            self.last_key = key.code;
            outcome
        }

        fn tap(&mut self, code: KeyCode) -> Outcome {
            let outcome = self.send(Key::single(code));
            self.send(Key::NONE);
            outcome
        }

        fn line(&self, row: usize) -> &str {
            self.frame.line(row)
        }
    }

    #[test]
    fn delta_rules() {
        assert_eq!(edit_delta(Key::single(KeyCode::Up), false), 1);
        assert_eq!(edit_delta(Key::single(KeyCode::Down), false), -1);
        assert_eq!(edit_delta(Key::single(KeyCode::Up), true), 0);
        assert_eq!(edit_delta(Key::long(KeyCode::Down), true), -5);
        assert_eq!(edit_delta(Key::long(KeyCode::Right), false), 0);
    }

    // -- bounds -------------------------------------------------------------

    #[test]
    fn bounds_render_random_min_then_max() {
        let mut page = Page::new(BoundsEditor::new(PhaseField::Timer));
        page.send(Key::NONE);
        assert_eq!(page.line(0), "SET TMR: RND");
        assert_eq!(page.line(1), "MIN: 30");

        page.tap(KeyCode::Right);
        assert_eq!(page.line(1), "MAX: 180");
    }

    #[test]
    fn up_increments_and_down_decrements() {
        let mut page = Page::new(BoundsEditor::new(PhaseField::Timer));
        page.tap(KeyCode::Up);
        page.tap(KeyCode::Up);
        assert_eq!(page.config.timer.min, 32);
        page.tap(KeyCode::Down);
        assert_eq!(page.config.timer.min, 31);
    }

    #[test]
    fn held_single_does_not_repeat_but_long_does() {
        let mut page = Page::new(BoundsEditor::new(PhaseField::Timer));
        page.send(Key::single(KeyCode::Up));
        page.send(Key::single(KeyCode::Up));
        page.send(Key::single(KeyCode::Up));
        assert_eq!(page.config.timer.min, 31);

        page.send(Key::long(KeyCode::Up));
        page.send(Key::long(KeyCode::Up));
        assert_eq!(page.config.timer.min, 41);
    }

    #[test]
    fn values_are_clamped_to_range() {
        let mut page = Page::new(BoundsEditor::new(PhaseField::Delay));
        page.send(Key::long(KeyCode::Down));
        assert_eq!(page.config.delay.min, 1);

        page.tap(KeyCode::Right);
        for _ in 0..5 {
            page.send(Key::long(KeyCode::Up));
        }
        assert_eq!(page.config.delay.max, 60);
        assert_eq!(page.line(0), "SET DELAY:RND");
    }

    #[test]
    fn min_above_max_drags_max_along() {
        let mut page = Page::new(BoundsEditor::new(PhaseField::Delay));
        page.config.delay = PhaseBounds::new(PhaseMode::Random, 10, 12);
        for _ in 0..3 {
            page.tap(KeyCode::Up);
        }
        assert_eq!(page.config.delay, PhaseBounds::new(PhaseMode::Random, 13, 13));
    }

    #[test]
    fn lowering_max_below_min_snaps_to_min() {
        let mut page = Page::new(BoundsEditor::new(PhaseField::Delay));
        page.config.delay = PhaseBounds::new(PhaseMode::Random, 10, 12);
        page.tap(KeyCode::Right);
        page.send(Key::long(KeyCode::Down));
        assert_eq!(page.config.delay, PhaseBounds::new(PhaseMode::Random, 10, 10));
    }

    #[test]
    fn select_switches_to_fixed_and_aligns() {
        let mut page = Page::new(BoundsEditor::new(PhaseField::Timer));
        page.tap(KeyCode::Right);
        page.tap(KeyCode::Select);
        assert_eq!(page.config.timer, PhaseBounds::new(PhaseMode::Fixed, 30, 30));
        assert_eq!(page.line(0), "SET TMR: FIX");
        assert_eq!(page.line(1), "30");

        // Fixed mode edits min only; RIGHT does nothing.
        page.tap(KeyCode::Right);
        page.tap(KeyCode::Up);
        assert_eq!(page.config.timer, PhaseBounds::new(PhaseMode::Fixed, 31, 31));

        page.tap(KeyCode::Select);
        assert_eq!(page.config.timer.mode, PhaseMode::Random);
        assert_eq!(page.line(1), "MIN: 31");
    }

    // -- repeat -------------------------------------------------------------

    #[test]
    fn repeat_select_cycles_modes() {
        let mut page = Page::new(RepeatEditor::new());
        page.send(Key::NONE);
        assert_eq!(page.line(0), "SET RPT:RND");
        assert_eq!(page.line(1), "3");

        page.tap(KeyCode::Select);
        assert_eq!(page.config.repeat, RepeatMode::Forever);
        assert_eq!(page.line(0), "SET RPT:FRV");
        assert_eq!(page.line(1), "");

        page.tap(KeyCode::Select);
        assert_eq!(page.config.repeat, RepeatMode::TimeLimit);
        assert_eq!(page.config.limit, 60);
        assert_eq!(page.line(0), "SET RPT:TIME");

        page.tap(KeyCode::Select);
        assert_eq!(page.config.repeat, RepeatMode::Rounds);
        assert_eq!(page.config.limit, 50);
    }

    #[test]
    fn repeat_limit_ignored_when_forever() {
        let mut page = Page::new(RepeatEditor::new());
        page.config.repeat = RepeatMode::Forever;
        page.config.limit = 3;
        page.tap(KeyCode::Up);
        page.send(Key::long(KeyCode::Down));
        assert_eq!(page.config.limit, 3);
    }

    #[test]
    fn repeat_limit_steps_and_clamps() {
        let mut page = Page::new(RepeatEditor::new());
        page.tap(KeyCode::Up);
        assert_eq!(page.config.limit, 4);
        page.send(Key::long(KeyCode::Down));
        assert_eq!(page.config.limit, 1);
    }

    // -- beeps --------------------------------------------------------------

    #[test]
    fn beep_toggles() {
        let mut page = Page::new(BeepEditor::new());
        page.send(Key::NONE);
        assert_eq!(page.line(0), "SET CNTDWN BEEP");
        assert_eq!(page.line(1), "START:ON");

        page.tap(KeyCode::Down);
        assert!(!page.config.start_beeps);
        assert_eq!(page.line(1), "START:OFF");

        page.tap(KeyCode::Right);
        assert_eq!(page.line(1), "END:ON");
        page.send(Key::single(KeyCode::Up));
        page.send(Key::long(KeyCode::Up));
        assert!(!page.config.end_beeps);
        assert!(!page.config.start_beeps);
    }

    // -- reset --------------------------------------------------------------

    #[test]
    fn reset_needs_arming() {
        let mut page = Page::new(ResetConfirm::new());
        page.config.limit = 9;
        assert_eq!(page.tap(KeyCode::Select), Outcome::Continue);
        assert_eq!(page.line(0), "RESET?");
        assert_eq!(page.line(1), "NO");
        assert_eq!(page.config.limit, 9);

        page.tap(KeyCode::Up);
        assert_eq!(page.line(1), "YES");
        page.tap(KeyCode::Down);
        assert_eq!(page.line(1), "NO");
    }

    #[test]
    fn armed_select_restores_defaults_and_exits() {
        let mut page = Page::new(ResetConfirm::new());
        page.config.limit = 9;
        page.config.end_beeps = false;

        page.tap(KeyCode::Up);
        assert!(page.runner.is_armed());
        assert_eq!(page.send(Key::single(KeyCode::Select)), Outcome::Exit);
        assert_eq!(page.config, TimerConfig::defaults());
        assert!(!page.runner.is_armed());
    }

    #[test]
    fn held_select_does_not_commit() {
        let mut page = Page::new(ResetConfirm::new());
        page.send(Key::single(KeyCode::Select));
        page.send(Key::single(KeyCode::Up));
        page.send(Key::long(KeyCode::Up));
        assert!(page.runner.is_armed());
    }
}
