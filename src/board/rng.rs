//! Hardware TRNG as the source for random phase lengths.

use embassy_nrf::peripherals;
use embassy_nrf::rng::Rng;

use rtimer::devices::RandomSource;

pub struct HwRng<'d> {
    rng: Rng<'d, peripherals::RNG>,
}

impl<'d> HwRng<'d> {
    pub fn new(mut rng: Rng<'d, peripherals::RNG>) -> Self {
        rng.set_bias_correction(true);
        Self { rng }
    }
}

impl RandomSource for HwRng<'_> {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.rng.blocking_fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }
}

