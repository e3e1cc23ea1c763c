//! Persisted timer configuration.
//!
//! Storage layout (11 bytes, stable across firmware revisions):
//!
//! | offset | field                                   |
//! |--------|-----------------------------------------|
//! | 0      | marker (`CONFIG_MARKER`)                |
//! | 1      | timer mode (0 = fixed, 1 = random)      |
//! | 2, 3   | timer min, timer max (s)                |
//! | 4      | delay mode (0 = fixed, 1 = random)      |
//! | 5, 6   | delay min, delay max (s)                |
//! | 7      | repeat mode (0 = forever, 1 = time, 2 = rounds) |
//! | 8      | repeat limit                            |
//! | 9, 10  | start / end countdown beeps (0 = off)   |
//!
//! A missing marker, an unreadable mode byte or a value outside its range is
//! handled as a first boot: defaults are written back and used.

use crate::config::{
    CONFIG_LEN, CONFIG_MARKER, DEFAULT_ROUND_LIMIT, DELAY_MAX_SECS, DELAY_MIN_SECS,
    ROUND_LIMIT_MAX, ROUND_LIMIT_MIN, TIMER_MAX_SECS, TIMER_MIN_SECS, TIME_LIMIT_MAX,
    TIME_LIMIT_MIN,
};
use crate::devices::{random_between, ByteStore, RandomSource};
use crate::error::Error;

/// Inclusive range a numeric setting is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: u8,
    pub max: u8,
}

impl ValueRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn clamp(&self, value: i16) -> u8 {
        value.clamp(i16::from(self.min), i16::from(self.max)) as u8
    }

    /// Apply `delta` to `value` and clamp the result.
    pub fn step(&self, value: u8, delta: i16) -> u8 {
        self.clamp(i16::from(value) + delta)
    }
}

pub const TIMER_RANGE: ValueRange = ValueRange::new(TIMER_MIN_SECS, TIMER_MAX_SECS);
pub const DELAY_RANGE: ValueRange = ValueRange::new(DELAY_MIN_SECS, DELAY_MAX_SECS);
pub const ROUND_LIMIT_RANGE: ValueRange = ValueRange::new(ROUND_LIMIT_MIN, ROUND_LIMIT_MAX);
pub const TIME_LIMIT_RANGE: ValueRange = ValueRange::new(TIME_LIMIT_MIN, TIME_LIMIT_MAX);

/// How a phase length is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseMode {
    Fixed,
    Random,
}

impl PhaseMode {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(PhaseMode::Fixed),
            1 => Some(PhaseMode::Random),
            _ => None,
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            PhaseMode::Fixed => 0,
            PhaseMode::Random => 1,
        }
    }
}

/// When the cycle stops on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RepeatMode {
    Forever,
    TimeLimit,
    Rounds,
}

impl RepeatMode {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(RepeatMode::Forever),
            1 => Some(RepeatMode::TimeLimit),
            2 => Some(RepeatMode::Rounds),
            _ => None,
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            RepeatMode::Forever => 0,
            RepeatMode::TimeLimit => 1,
            RepeatMode::Rounds => 2,
        }
    }

    /// Next mode in the editor cycle: Rounds -> Forever -> TimeLimit -> Rounds.
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Rounds => RepeatMode::Forever,
            RepeatMode::Forever => RepeatMode::TimeLimit,
            RepeatMode::TimeLimit => RepeatMode::Rounds,
        }
    }

    /// Valid range of the limit in this mode, `None` when there is no limit.
    pub fn limit_range(self) -> Option<ValueRange> {
        match self {
            RepeatMode::Forever => None,
            RepeatMode::TimeLimit => Some(TIME_LIMIT_RANGE),
            RepeatMode::Rounds => Some(ROUND_LIMIT_RANGE),
        }
    }
}

/// Mode plus lower/upper bound of one phase (timer or delay), in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBounds {
    pub mode: PhaseMode,
    pub min: u8,
    pub max: u8,
}

impl PhaseBounds {
    pub const fn new(mode: PhaseMode, min: u8, max: u8) -> Self {
        Self { mode, min, max }
    }

    /// Force `max = min` in fixed mode or when the bounds crossed.
    pub fn align(&mut self) {
        if self.mode == PhaseMode::Fixed || self.min > self.max {
            self.max = self.min;
        }
    }

    /// Phase length: the fixed bound, or uniform in `[min, max)` when random.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> u8 {
        match self.mode {
            PhaseMode::Fixed => self.min,
            PhaseMode::Random => random_between(rng, self.min, self.max),
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub timer: PhaseBounds,
    pub delay: PhaseBounds,
    pub repeat: RepeatMode,
    pub limit: u8,
    /// Tick beeps before a timer phase starts (and the initial countdown).
    pub start_beeps: bool,
    /// Tick beeps before a timer phase ends.
    pub end_beeps: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl TimerConfig {
    pub const fn defaults() -> Self {
        Self {
            timer: PhaseBounds::new(PhaseMode::Random, TIMER_MIN_SECS, TIMER_MAX_SECS),
            delay: PhaseBounds::new(PhaseMode::Random, DELAY_MIN_SECS, DELAY_MAX_SECS),
            repeat: RepeatMode::Rounds,
            limit: DEFAULT_ROUND_LIMIT,
            start_beeps: true,
            end_beeps: true,
        }
    }

    /// Serialize into the persisted layout, marker included.
    pub fn encode(&self) -> [u8; CONFIG_LEN] {
        [
            CONFIG_MARKER,
            self.timer.mode.to_byte(),
            self.timer.min,
            self.timer.max,
            self.delay.mode.to_byte(),
            self.delay.min,
            self.delay.max,
            self.repeat.to_byte(),
            self.limit,
            u8::from(self.start_beeps),
            u8::from(self.end_beeps),
        ]
    }

    /// Parse the persisted layout.
    ///
    /// Mode bytes must be valid and every bound and limit must lie in its
    /// range. Bounds are re-aligned after parsing.
    pub fn decode(image: &[u8; CONFIG_LEN]) -> Result<Self, Error> {
        if image[0] != CONFIG_MARKER {
            return Err(Error::MissingMarker);
        }
        let corrupt = |offset: usize| Error::CorruptField {
            offset: offset as u8,
        };
        let bounds = |offset: usize, range: ValueRange| -> Result<PhaseBounds, Error> {
            let mode = PhaseMode::from_byte(image[offset]).ok_or(corrupt(offset))?;
            for field in [offset + 1, offset + 2] {
                if !range.contains(image[field]) {
                    return Err(corrupt(field));
                }
            }
            let mut parsed = PhaseBounds::new(mode, image[offset + 1], image[offset + 2]);
            parsed.align();
            Ok(parsed)
        };
        let timer = bounds(1, TIMER_RANGE)?;
        let delay = bounds(4, DELAY_RANGE)?;
        let repeat = RepeatMode::from_byte(image[7]).ok_or(corrupt(7))?;
        let limit = image[8];
        if repeat.limit_range().is_some_and(|range| !range.contains(limit)) {
            return Err(corrupt(8));
        }

        Ok(Self {
            timer,
            delay,
            repeat,
            limit,
            start_beeps: image[9] != 0,
            end_beeps: image[10] != 0,
        })
    }
}

/// Read the configuration, writing defaults on first boot or corruption.
pub fn load<S: ByteStore>(store: &mut S) -> TimerConfig {
    let mut image = [0u8; CONFIG_LEN];
    for (offset, byte) in image.iter_mut().enumerate() {
        *byte = store.read(offset);
    }

    match TimerConfig::decode(&image) {
        Ok(config) => {
            debug!("config: loaded {=[u8]}", &image[..]);
            config
        }
        Err(e) => {
            warn!("config: {}, writing defaults", e);
            let config = TimerConfig::defaults();
            store.update(0, CONFIG_MARKER);
            save(store, &config);
            config
        }
    }
}

/// Persist every field, touching only bytes that changed.
pub fn save<S: ByteStore>(store: &mut S, config: &TimerConfig) {
    let image = config.encode();
    for (offset, &byte) in image.iter().enumerate().skip(1) {
        store.update(offset, byte);
    }
    debug!("config: saved");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ImageStore;

    struct Fixed(u32);

    impl RandomSource for Fixed {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        let config = TimerConfig {
            timer: PhaseBounds::new(PhaseMode::Fixed, 45, 45),
            delay: PhaseBounds::new(PhaseMode::Random, 5, 20),
            repeat: RepeatMode::TimeLimit,
            limit: 120,
            start_beeps: false,
            end_beeps: true,
        };
        let image = config.encode();
        assert_eq!(image, [73, 0, 45, 45, 1, 5, 20, 1, 120, 0, 1]);
        assert_eq!(TimerConfig::decode(&image), Ok(config));
    }

    #[test]
    fn decode_rejects_missing_marker() {
        let mut image = TimerConfig::defaults().encode();
        image[0] = 0xFF;
        assert_eq!(TimerConfig::decode(&image), Err(Error::MissingMarker));
    }

    #[test]
    fn decode_rejects_unknown_modes() {
        let mut image = TimerConfig::defaults().encode();
        image[4] = 7;
        assert_eq!(
            TimerConfig::decode(&image),
            Err(Error::CorruptField { offset: 4 })
        );

        let mut image = TimerConfig::defaults().encode();
        image[7] = 3;
        assert_eq!(
            TimerConfig::decode(&image),
            Err(Error::CorruptField { offset: 7 })
        );
    }

    #[test]
    fn decode_rejects_out_of_range_values() {
        let image = [73, 1, 0, 250, 1, 1, 60, 2, 5, 1, 1];
        assert_eq!(
            TimerConfig::decode(&image),
            Err(Error::CorruptField { offset: 2 })
        );

        let image = [73, 1, 30, 180, 0, 90, 90, 2, 5, 1, 1];
        assert_eq!(
            TimerConfig::decode(&image),
            Err(Error::CorruptField { offset: 5 })
        );

        let image = [73, 1, 30, 180, 1, 1, 60, 2, 99, 1, 1];
        assert_eq!(
            TimerConfig::decode(&image),
            Err(Error::CorruptField { offset: 8 })
        );
    }

    #[test]
    fn decode_accepts_any_limit_when_repeating_forever() {
        let image = [73, 1, 30, 180, 0, 20, 40, 0, 0, 1, 1];
        let config = TimerConfig::decode(&image).unwrap();
        assert_eq!(config.repeat, RepeatMode::Forever);
        assert_eq!(config.limit, 0);
        // Fixed mode forces max = min.
        assert_eq!(config.delay, PhaseBounds::new(PhaseMode::Fixed, 20, 20));
    }

    #[test]
    fn out_of_range_image_is_replaced_with_defaults() {
        let image = [73, 1, 0, 250, 1, 1, 60, 2, 5, 1, 1];
        let mut store = ImageStore::from_image(image);
        assert_eq!(load(&mut store), TimerConfig::defaults());
        assert_eq!(store.image(), &TimerConfig::defaults().encode());
    }

    #[test]
    fn align_forces_max_to_min() {
        let mut b = PhaseBounds::new(PhaseMode::Random, 50, 40);
        b.align();
        assert_eq!(b.max, 50);

        let mut b = PhaseBounds::new(PhaseMode::Fixed, 50, 90);
        b.align();
        assert_eq!(b.max, 50);

        let mut b = PhaseBounds::new(PhaseMode::Random, 50, 90);
        b.align();
        assert_eq!(b.max, 90);
    }

    #[test]
    fn sample_honours_mode() {
        let fixed = PhaseBounds::new(PhaseMode::Fixed, 42, 42);
        assert_eq!(fixed.sample(&mut Fixed(12345)), 42);

        let random = PhaseBounds::new(PhaseMode::Random, 30, 40);
        assert_eq!(random.sample(&mut Fixed(3)), 33);
        assert_eq!(random.sample(&mut Fixed(10)), 30);
    }

    #[test]
    fn repeat_mode_cycle() {
        assert_eq!(RepeatMode::Rounds.next(), RepeatMode::Forever);
        assert_eq!(RepeatMode::Forever.next(), RepeatMode::TimeLimit);
        assert_eq!(RepeatMode::TimeLimit.next(), RepeatMode::Rounds);
    }

    #[test]
    fn range_step_clamps() {
        assert_eq!(DELAY_RANGE.step(1, -5), 1);
        assert_eq!(DELAY_RANGE.step(58, 5), 60);
        assert_eq!(TIMER_RANGE.step(100, -1), 99);
    }

    #[test]
    fn first_boot_writes_marker_and_defaults() {
        let mut store = ImageStore::erased();
        let config = load(&mut store);
        assert_eq!(config, TimerConfig::defaults());
        assert_eq!(store.image(), &TimerConfig::defaults().encode());
    }

    #[test]
    fn load_reads_back_saved_config() {
        let mut store = ImageStore::erased();
        let _ = load(&mut store);

        let mut config = TimerConfig::defaults();
        config.timer = PhaseBounds::new(PhaseMode::Fixed, 60, 60);
        config.end_beeps = false;
        save(&mut store, &config);

        assert_eq!(load(&mut store), config);
    }

    #[test]
    fn save_only_touches_changed_bytes() {
        let mut store = ImageStore::erased();
        let mut config = load(&mut store);
        let writes = store.writes();

        save(&mut store, &config);
        assert_eq!(store.writes(), writes);

        config.limit = 4;
        save(&mut store, &config);
        assert_eq!(store.writes(), writes + 1);
    }
}
