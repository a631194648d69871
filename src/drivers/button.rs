use embassy_time::{Duration, Timer};
use embedded_hal_async::digital::Wait;

use crate::BUTTON_DEBOUNCE;

/// Wait for a press on an active-low (pulled-up) button
pub async fn wait_for_press<B: Wait>(button: &mut B) -> Result<(), B::Error> {
    button.wait_for_falling_edge().await
}

/// Ignore whatever the contacts do for the debounce window
pub async fn debounce() {
    Timer::after(Duration::from_millis(BUTTON_DEBOUNCE)).await;
}
