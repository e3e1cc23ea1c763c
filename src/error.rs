//! Unified error type for rtimer.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! None of these cross the core boundary: the controller turns a config
//! error into a first boot and the main loop logs hardware errors and
//! keeps polling.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Persisted configuration
    /// Offset 0 of the store does not hold the config marker.
    MissingMarker,

    /// A persisted field holds a value outside its valid range.
    CorruptField {
        /// Byte offset of the offending field.
        offset: u8,
    },

    // Storage
    /// Flash read/write/erase failed.
    Storage,

    // UI / Display
    /// I²C transaction to the display failed.
    Display,
}
