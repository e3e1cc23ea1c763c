//! Resistive keypad ladder on one SAADC channel.
//!
//! The SAADC is async, the core's [`AnalogInput`] is not: the main loop
//! awaits [`KeypadAdc::sample`] once per poll and stores the reading in
//! the [`LatchedLevel`] the controller reads from.

use embassy_nrf::saadc::{Config, Resolution, Saadc};

use rtimer::config::KEY_ADC_MAX;
use rtimer::devices::AnalogInput;

pub struct KeypadAdc<'d> {
    adc: Saadc<'d, 1>,
}

/// SAADC settings matching the keypad threshold table (10-bit).
pub fn adc_config() -> Config {
    let mut config = Config::default();
    config.resolution = Resolution::_10BIT;
    config
}

impl<'d> KeypadAdc<'d> {
    /// `adc` must be created with [`adc_config`].
    pub async fn new(adc: Saadc<'d, 1>) -> Self {
        adc.calibrate().await;
        Self { adc }
    }

    /// One reading in `0..=KEY_ADC_MAX`.
    pub async fn sample(&mut self) -> u16 {
        let mut buf = [0i16; 1];
        self.adc.sample(&mut buf).await;
        // Single-ended readings dip slightly below zero near ground.
        (buf[0].max(0) as u16).min(KEY_ADC_MAX)
    }
}

/// Most recent keypad reading.
#[derive(Default)]
pub struct LatchedLevel(u16);

impl LatchedLevel {
    pub fn set(&mut self, level: u16) {
        self.0 = level;
    }
}

impl AnalogInput for LatchedLevel {
    fn read_level(&mut self) -> u16 {
        self.0
    }
}
