//! Process-wide context and the per-poll dispatch.
//!
//! [`Controller`] owns every piece of mutable state (decoder, menu cursor,
//! runners, config) together with the device adapters. The firmware calls
//! [`Controller::poll`] from a single loop with the current monotonic time;
//! nothing in here blocks.

use crate::beeper::Beeper;
use crate::devices::{AnalogInput, ByteStore, RandomSource, TextPanel, ToneOutput};
use crate::keys::{Key, KeyCode, KeyDecoder};
use crate::menu::{self, MenuCursor, Outcome};
use crate::runner::{RunContext, Runners};
use crate::settings::{self, TimerConfig};
use crate::ui::lcd::Lcd;
use crate::ui::{Frame, ROWS};

pub struct Controller<A, P, T, S, R>
where
    A: AnalogInput,
    P: TextPanel,
    T: ToneOutput,
    S: ByteStore,
    R: RandomSource,
{
    keypad: A,
    decoder: KeyDecoder,
    cursor: MenuCursor,
    runners: Runners,
    config: TimerConfig,
    frame: Frame,
    lcd: Lcd<P>,
    beeper: Beeper<T>,
    store: S,
    rng: R,
}

impl<A, P, T, S, R> Controller<A, P, T, S, R>
where
    A: AnalogInput,
    P: TextPanel,
    T: ToneOutput,
    S: ByteStore,
    R: RandomSource,
{
    /// Load the persisted config (writing defaults on first boot) and
    /// start at the main menu.
    pub fn new(keypad: A, panel: P, tone: T, mut store: S, rng: R) -> Self {
        let config = settings::load(&mut store);
        info!("controller: ready");
        Self {
            keypad,
            decoder: KeyDecoder::new(),
            cursor: MenuCursor::new(),
            runners: Runners::new(),
            config,
            frame: Frame::new(),
            lcd: Lcd::new(panel),
            beeper: Beeper::new(tone),
            store,
            rng,
        }
    }

    /// Run one cycle: decode a key, dispatch it, persist, refresh the display.
    pub fn poll(&mut self, now: u64) {
        let previous = self.decoder.last();
        let key = self.decoder.decode(self.keypad.read_level(), now);
        if key != previous && !key.is_none() {
            trace!("key: {=str} {=str}", key.code.name(), key.mode.name());
        }
        self.beeper.service(now);

        let Some(step) = menu::lookup(self.cursor.current) else {
            error!("menu: unknown step {}", self.cursor.current);
            return;
        };

        if key.code == KeyCode::Left {
            self.cursor.leave(step);
            return;
        }

        match step.runner {
            Some(kind) => {
                let before = self.config;
                let mut ctx = RunContext::new(
                    now,
                    self.cursor.last_key,
                    &mut self.config,
                    &mut self.rng,
                    &mut self.frame,
                );
                let outcome = self.runners.step(kind, key, &mut ctx);
                let beep = ctx.take_beep();

                self.cursor.last_key = key.code;
                if outcome == Outcome::Exit {
                    self.cursor.leave(step);
                }
                if let Some(kind) = beep {
                    self.beeper.beep(kind, now);
                }
                if self.config != before {
                    settings::save(&mut self.store, &self.config);
                }
            }
            None => menu::navigate(&mut self.cursor, step, key, &mut self.frame),
        }

        for row in 0..ROWS {
            self.lcd.show_line(self.frame.line(row), row as u8, now);
        }
    }

    /// Key decoded on the most recent poll.
    pub fn last_key(&self) -> Key {
        self.decoder.last()
    }

    pub fn cursor(&self) -> &MenuCursor {
        &self.cursor
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn runners(&self) -> &Runners {
        &self.runners
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn panel(&self) -> &P {
        self.lcd.panel()
    }

    pub fn beeper(&self) -> &Beeper<T> {
        &self.beeper
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access for the firmware's flush of the store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn keypad_mut(&mut self) -> &mut A {
        &mut self.keypad
    }
}
