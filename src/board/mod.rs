//! nRF52840 adapters for the core's device traits.
//!
//! Only built with the `embedded` feature, as part of the firmware binary.

pub mod display;
pub mod flash;
pub mod keypad;
pub mod rng;
pub mod tone;
