//! 74HC595 shift register feeding the 7-segment digit.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::Error;

/// Anything that can put an 8-bit segment pattern on the digit
pub trait SegmentOutput {
    /// Latch `bits` onto the segment outputs
    fn write(&mut self, bits: u8) -> Result<(), Error>;
}

/// Bit-banged 74HC595: serial data, storage (latch) clock and shift clock lines.
pub struct ShiftRegister<D, L, C> {
    data: D,
    latch: L,
    clock: C,
}

impl<D, L, C> ShiftRegister<D, L, C>
where
    D: OutputPin,
    L: OutputPin,
    C: OutputPin,
{
    pub fn new(data: D, latch: L, clock: C) -> Self {
        Self { data, latch, clock }
    }

    /// Shift `value` out MSB first with the latch held low, then raise the latch to commit it.
    pub fn shift_out(&mut self, value: u8) -> Result<(), Error> {
        self.latch.set_low().map_err(|_| Error::DigitOutput)?;
        for i in 0..8 {
            let bit = (value << i) & 0x80 == 0x80;
            self.clock.set_low().map_err(|_| Error::DigitOutput)?;
            self.data
                .set_state(PinState::from(bit))
                .map_err(|_| Error::DigitOutput)?;
            self.clock.set_high().map_err(|_| Error::DigitOutput)?;
        }
        self.latch.set_high().map_err(|_| Error::DigitOutput)
    }

    /// Give the pins back
    pub fn release(self) -> (D, L, C) {
        (self.data, self.latch, self.clock)
    }
}

impl<D, L, C> SegmentOutput for ShiftRegister<D, L, C>
where
    D: OutputPin,
    L: OutputPin,
    C: OutputPin,
{
    fn write(&mut self, bits: u8) -> Result<(), Error> {
        self.shift_out(bits)
    }
}
