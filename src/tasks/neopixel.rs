use embassy_time::{Duration, Timer};
use smart_leds::{RGB8, SmartLedsWriteAsync};

use crate::{
    STRIP_IDLE_POLL,
    animations::{Animation, next_frame},
    drivers::neopixel::LedDriver,
    error::Error,
    state::SharedState,
};

/// LED strip main task.
/// The strip is fully managed from this task. Whenever the shared strip record names an
/// animation it is played from its first frame to its last; the record is only looked at again
/// between two runs, so an animation is never cut off halfway.
///
/// When the record says the loop is no longer running (or a push fails) the strip is switched
/// off, the shutdown signal is raised and the task returns.
///
/// # Parameters
/// * `shared` - State written by the controller
/// * `led` - LED driver for the strip
pub async fn strip_animation_task<W>(
    shared: &SharedState,
    led: &mut LedDriver<W>,
) -> Result<(), Error>
where
    W: SmartLedsWriteAsync<Color = RGB8>,
{
    info!("STRIP_TASK: Task started");
    let result = play_until_stopped(shared, led).await;
    if let Err(e) = result {
        error!("STRIP_TASK: Output failed: {}", e);
    }
    let off = led.all_off().await;
    shared.strip_finished();
    info!("STRIP_TASK: Strip off, task stopped");
    result.and(off)
}

async fn play_until_stopped<W>(shared: &SharedState, led: &mut LedDriver<W>) -> Result<(), Error>
where
    W: SmartLedsWriteAsync<Color = RGB8>,
{
    // Survives between runs so the rainbow strobe keeps walking around the wheel
    let mut strobe_index = 0;
    loop {
        let state = shared.strip().await;
        if !state.running {
            return Ok(());
        }
        match state.active {
            None => {
                led.all_off().await?;
                Timer::after(Duration::from_millis(STRIP_IDLE_POLL)).await;
            }
            Some(id) => {
                trace!("STRIP_TASK: Playing {}", id);
                let mut animation = Animation::from_id(id, &mut strobe_index);
                while let Some(frame) = next_frame(&mut animation) {
                    led.update_from_buffer(&frame.pixels).await?;
                    Timer::after(frame.hold).await;
                }
            }
        }
    }
}
