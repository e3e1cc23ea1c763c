//! Piezo driven by one PWM channel at 50 % duty.

use embassy_nrf::pwm::{Instance, Prescaler, SimplePwm};

use rtimer::devices::ToneOutput;

/// PWM base clock with `Prescaler::Div16`.
const PWM_CLOCK_HZ: u32 = 1_000_000;

/// Largest counter top the PWM supports (15 bits).
const MAX_TOP: u32 = 0x7FFF;

pub struct Piezo<'d, T: Instance> {
    pwm: SimplePwm<'d, T>,
}

impl<'d, T: Instance> Piezo<'d, T> {
    pub fn new(mut pwm: SimplePwm<'d, T>) -> Self {
        pwm.set_prescaler(Prescaler::Div16);
        pwm.disable();
        Self { pwm }
    }
}

impl<T: Instance> ToneOutput for Piezo<'_, T> {
    fn start(&mut self, frequency_hz: u32) {
        let top = (PWM_CLOCK_HZ / frequency_hz.max(1)).clamp(2, MAX_TOP) as u16;
        self.pwm.set_max_duty(top);
        self.pwm.set_duty(0, top / 2);
        self.pwm.enable();
    }

    fn stop(&mut self) {
        self.pwm.disable();
    }
}
