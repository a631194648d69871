//! Button handling: turns select / confirm / off presses into state for the two render loops.

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};

use crate::{
    BUTTON_QUEUE_SIZE, SEQUENCE_MAX, SEQUENCE_MIN, animations::AnimationId, state::SharedState,
};

/// The three push buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Step to the next animation number
    Select,
    /// Start or stop the selected animation
    Confirm,
    /// Blank everything and power down
    Off,
}

/// Channel types between the button task and the controller.
pub type ButtonChannel = Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE_SIZE>;
pub type ButtonSender<'a> = Sender<'a, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE_SIZE>;
pub type ButtonReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE_SIZE>;

/// Process control: whatever powers the board down once everything is dark
pub trait Halt {
    fn request_halt(&mut self);
}

/// Which animation number is selected and whether it is playing.
///
/// `min <= current <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceSelector {
    current: u8,
    min: u8,
    max: u8,
    confirmed: bool,
}

impl SequenceSelector {
    /// The full animation range, starting on the first one
    pub const DEFAULT: Self = Self::new(SEQUENCE_MIN, SEQUENCE_MAX);

    /// Selector over `min..=max` starting at `min`. The bounds are swapped if given backwards
    /// and capped at 15 so every number has a hex digit.
    pub const fn new(min: u8, max: u8) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let max = if max > 0xF { 0xF } else { max };
        let min = if min > max { max } else { min };
        Self {
            current: min,
            min,
            max,
            confirmed: false,
        }
    }

    /// Same as [`SequenceSelector::new`] but starting at `current`, clamped into range
    pub const fn starting_at(min: u8, max: u8, current: u8) -> Self {
        let mut selector = Self::new(min, max);
        selector.current = if current < selector.min {
            selector.min
        } else if current > selector.max {
            selector.max
        } else {
            current
        };
        selector
    }

    pub const fn current(&self) -> u8 {
        self.current
    }

    pub const fn confirmed(&self) -> bool {
        self.confirmed
    }

    /// Hex digit shown for the current number
    pub const fn character(&self) -> char {
        match char::from_digit(self.current as u32, 16) {
            Some(c) => c.to_ascii_uppercase(),
            None => ' ',
        }
    }

    /// Animation behind the current number
    pub fn animation(&self) -> Option<AnimationId> {
        AnimationId::try_from(self.current).ok()
    }

    /// Step to the next number, wrapping from `max` back to `min`. Refused while confirmed.
    pub fn advance(&mut self) -> bool {
        if self.confirmed {
            return false;
        }
        self.current = if self.current >= self.max {
            self.min
        } else {
            self.current + 1
        };
        true
    }

    /// Flip the confirmed flag, returning the new value
    pub fn toggle(&mut self) -> bool {
        self.confirmed = !self.confirmed;
        self.confirmed
    }
}

impl Default for SequenceSelector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Owns the selection and is the only one deciding what the digit and the strip show.
/// It never renders anything itself.
pub struct Controller<'a, H> {
    shared: &'a SharedState,
    selector: SequenceSelector,
    halt: H,
}

impl<'a, H: Halt> Controller<'a, H> {
    pub fn new(shared: &'a SharedState, selector: SequenceSelector, halt: H) -> Self {
        Self {
            shared,
            selector,
            halt,
        }
    }

    pub fn selector(&self) -> &SequenceSelector {
        &self.selector
    }

    /// Put the selected number on the digit, stopping whatever the strip plays
    pub async fn show_selection(&mut self) {
        if self.selector.confirmed() {
            self.selector.toggle();
        }
        self.shared.play(None).await;
        self.shared.show_char(self.selector.character(), false).await;
    }

    /// Select button: show the next animation number. Ignored while an animation is playing.
    pub async fn on_select(&mut self) {
        if !self.selector.advance() {
            debug!("CONTROLLER: Select ignored, animation {} is playing", self.selector.current());
            return;
        }
        debug!("CONTROLLER: Selected {}", self.selector.current());
        self.shared.show_char(self.selector.character(), false).await;
    }

    /// Confirm button: start the selected animation, or stop the one playing.
    pub async fn on_confirm(&mut self) {
        if self.selector.toggle() {
            let animation = self.selector.animation();
            if animation.is_none() {
                warn!("CONTROLLER: No animation numbered {}", self.selector.current());
            }
            info!("CONTROLLER: Playing {}", self.selector.current());
            self.shared.play(animation).await;
            self.shared.boot_chase(self.selector.character()).await;
        } else {
            info!("CONTROLLER: Stopping {}", self.selector.current());
            self.shared.play(None).await;
            self.shared.show_char(self.selector.character(), false).await;
        }
    }

    /// Off button: blank both outputs, wait until the loops have done so, then halt.
    pub async fn on_shutdown(&mut self) {
        info!("CONTROLLER: Shutting down");
        self.stop_loops().await;
        info!("CONTROLLER: Outputs dark, halting");
        self.halt.request_halt();
    }

    /// Blank both outputs and wait for the loops to exit, without halting. Safe to follow with
    /// [`Controller::on_shutdown`].
    pub async fn on_interrupt(&mut self) {
        info!("CONTROLLER: Interrupted, stopping loops");
        self.stop_loops().await;
    }

    async fn stop_loops(&mut self) {
        self.shared.stop_display().await;
        self.shared.stop_strip().await;
        self.shared.wait_stopped().await;
    }

    /// Dispatch one button event. Returns false once the controller has shut down.
    pub async fn handle(&mut self, event: ButtonEvent) -> bool {
        match event {
            ButtonEvent::Select => self.on_select().await,
            ButtonEvent::Confirm => self.on_confirm().await,
            ButtonEvent::Off => {
                self.on_shutdown().await;
                return false;
            }
        }
        true
    }

    /// Controller main task.
    /// Shows the starting selection, then handles button events from the channel until the off
    /// button has been handled.
    pub async fn run(mut self, channel: ButtonReceiver<'_>) -> H {
        info!("CONTROLLER: Task started. Waiting for buttons...");
        self.show_selection().await;
        while self.handle(channel.receive().await).await {}
        self.halt
    }
}
