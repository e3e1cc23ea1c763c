//! Interfaces of the external collaborators driven by the core.
//!
//! The core never touches hardware directly. The firmware binary implements
//! these traits on top of the nRF52840 peripherals; tests implement them
//! with plain in-memory fakes.

/// Raw analog source the resistive keypad ladder is wired to.
pub trait AnalogInput {
    /// Latest reading in `0..=KEY_ADC_MAX`.
    fn read_level(&mut self) -> u16;
}

/// Fixed-width character panel with two rows.
///
/// `write_row` receives at most `DISPLAY_COLS` characters and must blank
/// the rest of the row. Scrolling is handled by [`crate::ui::lcd::Lcd`].
pub trait TextPanel {
    fn write_row(&mut self, row: u8, text: &str);
}

/// Square-wave tone generator (piezo).
pub trait ToneOutput {
    fn start(&mut self, frequency_hz: u32);
    fn stop(&mut self);
}

/// Byte-addressed nonvolatile memory.
pub trait ByteStore {
    fn read(&mut self, offset: usize) -> u8;
    fn write(&mut self, offset: usize, value: u8);

    /// Write `value` only if it differs from what is stored.
    fn update(&mut self, offset: usize, value: u8) {
        if self.read(offset) != value {
            self.write(offset, value);
        }
    }
}

/// Source of random numbers for the random timer/delay modes.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;
}

/// Draw uniformly from `[min, max)`. Returns `min` if the range is empty.
pub fn random_between(rng: &mut dyn RandomSource, min: u8, max: u8) -> u8 {
    if max <= min {
        return min;
    }
    let span = u32::from(max - min);
    min + (rng.next_u32() % span) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl RandomSource for Counter {
        fn next_u32(&mut self) -> u32 {
            self.0 = self.0.wrapping_add(1);
            self.0
        }
    }

    #[test]
    fn random_between_stays_in_half_open_range() {
        let mut rng = Counter(0);
        for _ in 0..200 {
            let v = random_between(&mut rng, 30, 35);
            assert!((30..35).contains(&v));
        }
    }

    #[test]
    fn random_between_empty_range_returns_min() {
        let mut rng = Counter(7);
        assert_eq!(random_between(&mut rng, 40, 40), 40);
        assert_eq!(random_between(&mut rng, 40, 20), 40);
    }

    struct Mem([u8; 4], usize);

    impl ByteStore for Mem {
        fn read(&mut self, offset: usize) -> u8 {
            self.0[offset]
        }
        fn write(&mut self, offset: usize, value: u8) {
            self.0[offset] = value;
            self.1 += 1;
        }
    }

    #[test]
    fn update_skips_identical_bytes() {
        let mut mem = Mem([1, 2, 3, 4], 0);
        mem.update(0, 1);
        assert_eq!(mem.1, 0);
        mem.update(0, 9);
        assert_eq!(mem.1, 1);
        assert_eq!(mem.0[0], 9);
    }
}
