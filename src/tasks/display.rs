use embassy_time::{Duration, Timer};

use crate::{
    BLINK_HALF_PERIOD, BOOT_CHASE_STEP, DIGIT_REFRESH,
    drivers::shift_register::SegmentOutput,
    error::Error,
    segments::{self, BOOT_CHASE, Segment},
    state::{DisplayMode, SharedState},
};

/// Digit display main task.
/// The digit is fully managed from this task. It owns the segment output for its whole life and
/// renders whatever the shared display record asks for, checking the record once per step.
///
/// Once the record says `Off` (or the output fails) the digit is blanked, the shutdown signal is
/// raised and the task returns.
///
/// # Parameters
/// * `shared` - State written by the controller
/// * `output` - Where the segment patterns go
pub async fn digit_display_task<S: SegmentOutput>(
    shared: &SharedState,
    output: &mut S,
) -> Result<(), Error> {
    info!("DIGIT_TASK: Task started");
    let result = render_until_off(shared, output).await;
    if let Err(e) = result {
        error!("DIGIT_TASK: Output failed: {}", e);
    }
    let blanked = output.write(segments::BLANK);
    shared.digit_finished();
    info!("DIGIT_TASK: Digit blanked, task stopped");
    result.and(blanked)
}

async fn render_until_off<S: SegmentOutput>(
    shared: &SharedState,
    output: &mut S,
) -> Result<(), Error> {
    loop {
        let (state, chase_request) = shared.display_and_chase().await;
        match state.mode {
            DisplayMode::Off => return Ok(()),
            DisplayMode::ShowChar => {
                match segments::encode(state.character, state.decimal_point) {
                    Some(bits) => output.write(bits)?,
                    None => warn!("DIGIT_TASK: Cannot show {}", state.character),
                }
                Timer::after(Duration::from_millis(DIGIT_REFRESH)).await;
            }
            DisplayMode::BlinkDot => {
                output.write(Segment::Dp.bits())?;
                Timer::after(Duration::from_millis(BLINK_HALF_PERIOD)).await;
                output.write(Segment::Blank.bits())?;
                Timer::after(Duration::from_millis(BLINK_HALF_PERIOD)).await;
            }
            DisplayMode::BootChase => {
                debug!("DIGIT_TASK: Boot chase");
                for segment in BOOT_CHASE {
                    output.write(segment.bits())?;
                    Timer::after(Duration::from_millis(BOOT_CHASE_STEP)).await;
                }
                shared.finish_boot_chase(chase_request).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::{block_on, join::join};

    extern crate std;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingDigit {
        writes: Vec<u8>,
        /// Reject the write after this many have gone through, once
        fail_once_after: Option<usize>,
    }

    impl SegmentOutput for RecordingDigit {
        fn write(&mut self, bits: u8) -> Result<(), Error> {
            if self.fail_once_after == Some(self.writes.len()) {
                self.fail_once_after = None;
                return Err(Error::DigitOutput);
            }
            self.writes.push(bits);
            Ok(())
        }
    }

    fn pause(millis: u64) -> Timer {
        Timer::after(Duration::from_millis(millis))
    }

    #[test]
    fn stopped_before_start_only_blanks() {
        let shared = SharedState::new('5');
        block_on(shared.stop_display());
        let mut digit = RecordingDigit::default();
        block_on(digit_display_task(&shared, &mut digit)).unwrap();
        assert_eq!(digit.writes, [segments::BLANK]);
        // Shutdown waiters see the signal
        shared.strip_finished();
        block_on(shared.wait_stopped());
    }

    #[test]
    fn shows_the_character_until_stopped() {
        let shared = SharedState::new('5');
        let mut digit = RecordingDigit::default();
        let (result, _) = block_on(join(digit_display_task(&shared, &mut digit), async {
            pause(DIGIT_REFRESH * 2 + 50).await;
            shared.stop_display().await;
        }));
        result.unwrap();
        let five = segments::encode('5', false).unwrap();
        assert!(digit.writes.len() >= 2);
        let (last, shown) = digit.writes.split_last().unwrap();
        assert!(shown.iter().all(|bits| *bits == five));
        assert_eq!(*last, segments::BLANK);
    }

    #[test]
    fn boot_chase_plays_once_then_shows_the_character() {
        let shared = SharedState::new('3');
        block_on(shared.boot_chase('3'));
        let mut digit = RecordingDigit::default();
        block_on(join(digit_display_task(&shared, &mut digit), async {
            pause(BOOT_CHASE_STEP * 8 + DIGIT_REFRESH / 2).await;
            shared.stop_display().await;
        }))
        .0
        .unwrap();

        let chase: Vec<u8> = BOOT_CHASE.iter().map(|s| s.bits()).collect();
        assert_eq!(digit.writes[..8], chase[..]);
        assert_eq!(digit.writes[8], segments::encode('3', false).unwrap());
        assert_eq!(*digit.writes.last().unwrap(), segments::BLANK);
        assert_eq!(block_on(shared.display()).mode, DisplayMode::Off);
    }

    #[test]
    fn blink_dot_alternates_point_and_blank() {
        let shared = SharedState::new('3');
        block_on(shared.blink_dot());
        let mut digit = RecordingDigit::default();
        block_on(join(digit_display_task(&shared, &mut digit), async {
            pause(BLINK_HALF_PERIOD * 3).await;
            shared.stop_display().await;
        }))
        .0
        .unwrap();

        assert_eq!(digit.writes[..3], [Segment::Dp.bits(), segments::BLANK, Segment::Dp.bits()]);
        assert_eq!(*digit.writes.last().unwrap(), segments::BLANK);
    }

    #[test]
    fn unknown_character_leaves_the_digit_alone() {
        let shared = SharedState::new('?');
        let mut digit = RecordingDigit::default();
        block_on(join(digit_display_task(&shared, &mut digit), async {
            pause(DIGIT_REFRESH + 50).await;
            shared.stop_display().await;
        }))
        .0
        .unwrap();
        assert_eq!(digit.writes, [segments::BLANK]);
    }

    #[test]
    fn output_failure_still_tries_to_blank() {
        let shared = SharedState::new('8');
        block_on(shared.boot_chase('8'));
        let mut digit = RecordingDigit {
            fail_once_after: Some(2),
            ..Default::default()
        };
        let result = block_on(digit_display_task(&shared, &mut digit));
        assert_eq!(result, Err(Error::DigitOutput));
        assert_eq!(
            digit.writes,
            [BOOT_CHASE[0].bits(), BOOT_CHASE[1].bits(), segments::BLANK]
        );
        // The loop reported itself finished even though it failed
        shared.strip_finished();
        block_on(shared.wait_stopped());
    }
}
