pub mod button;
pub mod neopixel;
pub mod shift_register;

pub use neopixel::{LedBuffer, LedDriver, OFF_BUFFER};
pub use shift_register::{SegmentOutput, ShiftRegister};
