//! Resistive keypad decoding.
//!
//! The five keys share one ADC pin through a resistor ladder, so only one
//! key can be reported at a time. Each poll the raw level is mapped to a
//! [`KeyCode`] and run through debounce, double-click and long-press
//! detection to produce exactly one [`Key`] event.

use crate::config::{KEY_ADC_MAX, KEY_DEBOUNCE_MS, KEY_DOUBLE_CLICK_MS, KEY_LONG_PRESS_MS};

/// Which key (if any) is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCode {
    None,
    Select,
    Left,
    Up,
    Down,
    Right,
}

impl KeyCode {
    pub const fn name(self) -> &'static str {
        match self {
            KeyCode::None => "NO_KEY",
            KeyCode::Select => "SELECT",
            KeyCode::Left => "LEFT",
            KeyCode::Up => "UP",
            KeyCode::Down => "DOWN",
            KeyCode::Right => "RIGHT",
        }
    }
}

impl core::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the key is being pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyMode {
    Single,
    Long,
    Double,
}

impl KeyMode {
    pub const fn name(self) -> &'static str {
        match self {
            KeyMode::Single => "SNGL",
            KeyMode::Long => "LONG",
            KeyMode::Double => "DBL",
        }
    }
}

/// One classified key event, produced once per poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key {
    pub code: KeyCode,
    pub mode: KeyMode,
}

impl Key {
    pub const NONE: Key = Key::single(KeyCode::None);

    pub const fn new(code: KeyCode, mode: KeyMode) -> Self {
        Self { code, mode }
    }

    pub const fn single(code: KeyCode) -> Self {
        Self::new(code, KeyMode::Single)
    }

    pub const fn long(code: KeyCode) -> Self {
        Self::new(code, KeyMode::Long)
    }

    pub fn is_none(&self) -> bool {
        self.code == KeyCode::None
    }
}

// ADC Threshold Table
// Each entry: (upper bound exclusive, key). Ascending; first match wins.
// Levels at or above the last bound are unmapped and read as no key.
pub const KEY_THRESHOLDS: &[(u16, KeyCode)] = &[
    (50, KeyCode::Right),
    (150, KeyCode::Up),
    (350, KeyCode::Down),
    (500, KeyCode::Left),
    (850, KeyCode::Select),
    (KEY_ADC_MAX, KeyCode::None),
];

/// Map a raw ladder level to a key code.
pub fn decode_level(level: u16, thresholds: &[(u16, KeyCode)]) -> KeyCode {
    thresholds
        .iter()
        .find(|&&(bound, _)| level < bound)
        .map_or(KeyCode::None, |&(_, code)| code)
}

/// Debounce and press-classification state.
pub struct KeyDecoder {
    last: Key,
    /// Time of the last accepted (non-suppressed) decode.
    last_accepted_at: u64,
    /// Time the current key went down, cleared on release.
    held_since: Option<u64>,
    /// Last real key released and when it was released.
    last_effective: Option<(KeyCode, u64)>,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    pub const fn new() -> Self {
        Self {
            last: Key::NONE,
            last_accepted_at: 0,
            held_since: None,
            last_effective: None,
        }
    }

    /// Last event returned by [`KeyDecoder::decode`].
    pub fn last(&self) -> Key {
        self.last
    }

    /// Classify `level` sampled at `now` (ms).
    pub fn decode(&mut self, level: u16, now: u64) -> Key {
        let code = decode_level(level, KEY_THRESHOLDS);

        if code != self.last.code && now.saturating_sub(self.last_accepted_at) < KEY_DEBOUNCE_MS {
            return self.last;
        }
        self.last_accepted_at = now;

        if code == KeyCode::None {
            if self.last.code != KeyCode::None {
                self.last_effective = Some((self.last.code, now));
            }
            self.held_since = None;
            self.last = Key::NONE;
            return self.last;
        }

        if self.last.code == KeyCode::None {
            self.held_since = Some(now);
            if let Some((prev, released_at)) = self.last_effective {
                if prev == code && now.saturating_sub(released_at) < KEY_DOUBLE_CLICK_MS {
                    self.last = Key::new(code, KeyMode::Double);
                    return self.last;
                }
            }
        }

        if code == self.last.code {
            if let Some(since) = self.held_since {
                if now.saturating_sub(since) >= KEY_LONG_PRESS_MS {
                    self.last.mode = KeyMode::Long;
                    return self.last;
                }
            }
        }

        self.last = Key::single(code);
        self.last
    }
}
