#![no_std]

#[macro_use]
mod fmt;

pub mod animations;
pub mod controller;
pub mod drivers;
pub mod error;
pub mod maths;
pub mod segments;
pub mod state;
pub mod tasks;

pub use controller::{ButtonEvent, Controller, Halt, SequenceSelector};
pub use error::Error;
pub use state::{DisplayMode, DisplayState, SharedState, StripState};
pub use tasks::*;

/// The number of LEDs in the string we are driving
pub const STRIP_LENGTH: usize = 30;

/// Global strip brightness applied on every push (roughly 20%)
pub const STRIP_BRIGHTNESS: u8 = 51;

/// Lowest selectable animation sequence
pub const SEQUENCE_MIN: u8 = 1;

/// Highest selectable animation sequence
pub const SEQUENCE_MAX: u8 = 9;

/// Pace at which a static character is re-rendered, in milliseconds
pub const DIGIT_REFRESH: u64 = 200;

/// Half period of the blinking decimal point, in milliseconds
pub const BLINK_HALF_PERIOD: u64 = 200;

/// Time each segment stays lit during the boot chase, in milliseconds
pub const BOOT_CHASE_STEP: u64 = 100;

/// Poll interval of the strip loop while no animation is playing, in milliseconds
pub const STRIP_IDLE_POLL: u64 = 100;

/// Lockout after a button press during which further edges are ignored, in milliseconds
pub const BUTTON_DEBOUNCE: u64 = 300;

/// The maximum number of button events waiting for the controller
pub const BUTTON_QUEUE_SIZE: usize = 4;
