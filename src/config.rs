//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, value ranges and
//! persisted-layout constants live here so they can be tuned in one place.

// Keypad

/// Minimum time a differing key reading must wait before it is trusted (ms).
pub const KEY_DEBOUNCE_MS: u64 = 20;

/// Maximum gap between release and re-press of the same key for a
/// double click (ms).
pub const KEY_DOUBLE_CLICK_MS: u64 = 300;

/// Hold time after which a pressed key is reported as a long press (ms).
pub const KEY_LONG_PRESS_MS: u64 = 500;

/// Full-scale value of the keypad ADC reading (10-bit).
pub const KEY_ADC_MAX: u16 = 1023;

// Timer

/// Seconds counted down (with tick beeps) before the first round starts.
pub const START_COUNTDOWN_SECS: u16 = 10;

/// Tail window of a phase in which countdown tick beeps are emitted (s).
pub const TAIL_COUNTDOWN_SECS: u16 = 5;

/// Length of one timer tick (ms).
pub const TICK_MS: u64 = 1000;

/// Allowed range for the timer (round) bounds, seconds.
pub const TIMER_MIN_SECS: u8 = 30;
pub const TIMER_MAX_SECS: u8 = 180;

/// Allowed range for the delay (rest) bounds, seconds.
pub const DELAY_MIN_SECS: u8 = 1;
pub const DELAY_MAX_SECS: u8 = 60;

/// Allowed range for the round limit.
pub const ROUND_LIMIT_MIN: u8 = 1;
pub const ROUND_LIMIT_MAX: u8 = 50;

/// Allowed range for the time limit. The limit is stored in one byte,
/// so the upper bound is capped at `u8::MAX`.
pub const TIME_LIMIT_MIN: u8 = 2 * TIMER_MIN_SECS;
pub const TIME_LIMIT_MAX: u8 = u8::MAX;

/// Round limit restored by a factory reset.
pub const DEFAULT_ROUND_LIMIT: u8 = 3;

/// Edit step for a single press and for a long press.
pub const EDIT_STEP: i16 = 1;
pub const EDIT_STEP_LONG: i16 = 5;

// Display

/// Visible characters per display row.
pub const DISPLAY_COLS: usize = 16;

/// Capacity of one rendered line (longer descriptions scroll).
pub const LINE_CAPACITY: usize = 128;

/// Interval between scroll steps of an overflowing line (ms).
pub const SCROLL_INTERVAL_MS: u64 = 450;

// Persisted configuration

/// Byte written at offset 0 once the store holds a valid configuration.
pub const CONFIG_MARKER: u8 = 73;

/// Total size of the persisted image: marker + 10 config fields.
pub const CONFIG_LEN: usize = 11;

/// Flash page index where the config image starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for the config image.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

// Main loop

/// Period of the cooperative poll loop (ms).
pub const POLL_PERIOD_MS: u64 = 10;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Keypad ladder  → P0.02 (AIN0)
//   Piezo          → P0.03 (PWM0 ch0)
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

/// I²C address of the SSD1306 panel.
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;
