//! SSD1306 OLED used as a two-row character panel.

use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use rtimer::config::{DISPLAY_COLS, DISPLAY_I2C_ADDR};
use rtimer::devices::TextPanel;
use rtimer::Error;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Pixel height reserved for one text row.
const ROW_HEIGHT: u32 = 24;

/// Top margin so the two rows sit centred on the 64 px panel.
const TOP_MARGIN: i32 = 8;

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_8X13)
        .text_color(BinaryColor::On)
        .build()
}

pub struct OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    display: Display<I2C>,
}

impl<I2C> OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the SSD1306 and clear the screen.
    pub fn init(i2c: I2C) -> Result<Self, Error> {
        let interface = I2CDisplayInterface::new_custom_address(i2c, DISPLAY_I2C_ADDR);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        display.init().map_err(|_| Error::Display)?;
        display.clear_buffer();
        display.flush().map_err(|_| Error::Display)?;
        Ok(Self { display })
    }

    fn draw_row(&mut self, row: u8, text: &str) -> Result<(), Error> {
        let top = TOP_MARGIN + i32::from(row) * ROW_HEIGHT as i32;
        Rectangle::new(Point::new(0, top), Size::new(128, ROW_HEIGHT))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.display)
            .map_err(|_| Error::Display)?;

        let visible = match text.char_indices().nth(DISPLAY_COLS) {
            Some((end, _)) => &text[..end],
            None => text,
        };
        Text::with_baseline(visible, Point::new(0, top), text_style(), Baseline::Top)
            .draw(&mut self.display)
            .map_err(|_| Error::Display)?;

        self.display.flush().map_err(|_| Error::Display)
    }
}

impl<I2C> TextPanel for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn write_row(&mut self, row: u8, text: &str) {
        if let Err(e) = self.draw_row(row, text) {
            defmt::error!("display: row {} write failed: {}", row, e);
        }
    }
}
