use core::fmt;

/// Failures of the output hardware. Each one is fatal to the loop that owns the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Writing a pattern to the shift register driving the digit failed
    DigitOutput,
    /// Pushing a pixel buffer to the LED strip failed
    StripOutput,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DigitOutput => f.write_str("digit output write failed"),
            Error::StripOutput => f.write_str("LED strip write failed"),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
