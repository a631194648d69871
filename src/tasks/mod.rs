pub mod button;
pub mod display;
pub mod neopixel;

pub use button::button_task;
pub use display::digit_display_task;
pub use neopixel::strip_animation_task;
