//! Interval timer core for a two-line display and a five-key resistive keypad.
//!
//! Everything here is hardware independent and runs on the host: the
//! firmware binary (`main.rs`, `embedded` feature) only supplies the
//! [`devices`] adapters and calls [`controller::Controller::poll`] every
//! [`config::POLL_PERIOD_MS`].
//!
//! Usage: `cargo test --lib` / `cargo test --tests`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! Logging goes through `defmt` when the `defmt` feature is on and is
//! compiled out otherwise.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod beeper;
pub mod config;
pub mod controller;
pub mod devices;
pub mod editors;
pub mod error;
pub mod keys;
pub mod menu;
pub mod runner;
pub mod settings;
pub mod store;
pub mod timer;
pub mod ui;

pub use controller::Controller;
pub use error::Error;
pub use keys::{Key, KeyCode, KeyMode};
pub use settings::TimerConfig;
