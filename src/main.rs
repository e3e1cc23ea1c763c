//! rtimer firmware for the nRF52840.
//!
//! One cooperative loop: every `POLL_PERIOD_MS` it samples the keypad
//! ladder, runs one controller poll and flushes the config image to
//! flash if the poll changed it.

#![no_std]
#![no_main]

mod board;

use defmt::{error, info, unwrap};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::rng::Rng;
use embassy_nrf::saadc::{ChannelConfig, Saadc};
use embassy_nrf::{bind_interrupts, peripherals, rng, saadc, twim};
use embassy_time::{Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use rtimer::config::POLL_PERIOD_MS;
use rtimer::store::ImageStore;
use rtimer::Controller;

use crate::board::display::OledPanel;
use crate::board::keypad::{adc_config, KeypadAdc, LatchedLevel};
use crate::board::rng::HwRng;
use crate::board::tone::Piezo;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    RNG => rng::InterruptHandler<peripherals::RNG>;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("rtimer starting...");

    // Keypad ladder → P0.02 (AIN0)
    let channel = ChannelConfig::single_ended(p.P0_02);
    let adc = Saadc::new(p.SAADC, Irqs, adc_config(), [channel]);
    let mut keypad = KeypadAdc::new(adc).await;

    // SSD1306 on I²C: SDA P0.26, SCL P0.27
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let panel = unwrap!(OledPanel::init(i2c));

    // Piezo → P0.03
    let piezo = Piezo::new(SimplePwm::new_1ch(p.PWM0, p.P0_03));
    let hw_rng = HwRng::new(Rng::new(p.RNG, Irqs));

    let mut flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let store = match board::flash::load(&mut flash).await {
        Ok(store) => store,
        Err(e) => {
            error!("config image unreadable ({}), starting from defaults", e);
            ImageStore::erased()
        }
    };

    let mut controller = Controller::new(LatchedLevel::default(), panel, piezo, store, hw_rng);
    info!("rtimer ready");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_PERIOD_MS));
    loop {
        let level = keypad.sample().await;
        controller.keypad_mut().set(level);
        controller.poll(Instant::now().as_millis());

        // Written before the next poll can read it back.
        if let Err(e) = board::flash::flush(&mut flash, controller.store_mut()).await {
            error!("config flush failed: {}", e);
        }

        ticker.next().await;
    }
}
