use crate::{STRIP_BRIGHTNESS, STRIP_LENGTH, error::Error};
use smart_leds::{RGB8, SmartLedsWriteAsync};

/// Convenience type so we speak the same language when dealing with animations etc.
pub type LedBuffer = [RGB8; STRIP_LENGTH];

/// A buffer with every pixel switched off
pub const OFF_BUFFER: LedBuffer = [RGB8::new(0, 0, 0); STRIP_LENGTH];

/// Holds the state needed to drive the LED strip
pub struct LedDriver<W> {
    /// Whatever actually clocks the colours out to the strip (RMT adapter on the board)
    led: W,
    /// Global brightness level from 0 (off) to 255 (max brightness)
    brightness: u8,
}

impl<W> LedDriver<W>
where
    W: SmartLedsWriteAsync<Color = RGB8>,
{
    /// Create a new driver for the LED string at the default brightness.
    ///
    /// # Parameters
    /// * `led` - The writer connected to the LED strip
    pub fn new(led: W) -> Self {
        Self::with_brightness(led, STRIP_BRIGHTNESS)
    }

    /// Create a new driver for the LED string.
    ///
    /// # Parameters
    /// * `led` - The writer connected to the LED strip
    /// * `brightness` - Global brightness level from 0 (off) to 255 (max brightness)
    pub fn with_brightness(led: W, brightness: u8) -> Self {
        Self { led, brightness }
    }

    /// Push the contents of the buffer to the LED string, applying gamma correction and brightness.
    ///
    /// This must be called every time you want to propagate changes you have made to the buffer
    /// to the actual LED devices. This is not done automatically as you may want to do multiple
    /// changes before updating the display.
    ///
    /// # Parameters
    /// * `led_buffer` - Buffer containing LED values to write to the string
    pub async fn update_from_buffer(&mut self, led_buffer: &LedBuffer) -> Result<(), Error> {
        let adjusted =
            smart_leds::brightness(smart_leds::gamma(led_buffer.iter().cloned()), self.brightness);
        self.led.write(adjusted).await.map_err(|_| Error::StripOutput)
    }

    /// Switches all the LEDs off
    pub async fn all_off(&mut self) -> Result<(), Error> {
        self.update_from_buffer(&OFF_BUFFER).await
    }

    /// Give the underlying writer back, e.g. to tear the RMT channel down
    pub fn release(self) -> W {
        self.led
    }
}
