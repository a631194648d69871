use embassy_futures::select::{Either3, select3};
use embedded_hal_async::digital::Wait;

use crate::{
    controller::{ButtonEvent, ButtonSender},
    drivers::button::{debounce, wait_for_press},
};

/// Button main task.
/// Waits for any of the three pulled-up buttons to be pressed and forwards the press to the
/// controller. Edges arriving during the debounce window that follows a press are dropped.
///
/// # Parameters
/// * `select` - Steps through the animation numbers
/// * `confirm` - Starts or stops the selected animation
/// * `off` - Shuts everything down
/// * `sender` - Channel to the controller
pub async fn button_task<S, C, O>(
    mut select: S,
    mut confirm: C,
    mut off: O,
    sender: ButtonSender<'_>,
) where
    S: Wait,
    C: Wait,
    O: Wait,
{
    info!("BUTTON_TASK: Task started");
    loop {
        let event = match select3(
            wait_for_press(&mut select),
            wait_for_press(&mut confirm),
            wait_for_press(&mut off),
        )
        .await
        {
            Either3::First(Ok(())) => ButtonEvent::Select,
            Either3::Second(Ok(())) => ButtonEvent::Confirm,
            Either3::Third(Ok(())) => ButtonEvent::Off,
            Either3::First(Err(_)) | Either3::Second(Err(_)) | Either3::Third(Err(_)) => {
                warn!("BUTTON_TASK: Could not read button");
                debounce().await;
                continue;
            }
        };
        debug!("BUTTON_TASK: {}", event);
        sender.send(event).await;
        debounce().await;
    }
}
