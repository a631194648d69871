//! State shared between the controller and the two render loops.
//!
//! The controller is the only writer (the digit loop additionally ends its own boot chase). The
//! loops take a copy of their record once per iteration and render from that copy, so a change is
//! picked up at the next iteration and a burst of changes only shows the latest one.

use embassy_futures::join::join;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex, signal::Signal};

use crate::animations::AnimationId;

/// What the digit loop is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Loop must blank the digit and exit
    Off,
    /// Decimal point blinking on its own
    BlinkDot,
    /// Segment snake played once, then back to `ShowChar`
    BootChase,
    /// Static character
    ShowChar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    pub mode: DisplayMode,
    /// `'0'..='F'` or `' '`
    pub character: char,
    pub decimal_point: bool,
}

impl DisplayState {
    pub const fn new(character: char) -> Self {
        Self {
            mode: DisplayMode::ShowChar,
            character,
            decimal_point: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripState {
    /// Animation to play, `None` keeps the strip dark
    pub active: Option<AnimationId>,
    /// Cleared to make the loop blank the strip and exit
    pub running: bool,
}

impl StripState {
    pub const fn new() -> Self {
        Self {
            active: None,
            running: true,
        }
    }
}

impl Default for StripState {
    fn default() -> Self {
        Self::new()
    }
}

/// The digit record plus a count of boot chase requests, so the end of one chase can tell
/// whether another was asked for while it played
struct DisplayRecord {
    state: DisplayState,
    chase_request: u32,
}

/// Every record the controller and the loops communicate through, each behind its own lock
pub struct SharedState {
    display: Mutex<CriticalSectionRawMutex, DisplayRecord>,
    strip: Mutex<CriticalSectionRawMutex, StripState>,
    /// Raised by the digit loop once the digit has been blanked for good
    digit_done: Signal<CriticalSectionRawMutex, ()>,
    /// Raised by the strip loop once the strip has been switched off for good
    strip_done: Signal<CriticalSectionRawMutex, ()>,
}

impl SharedState {
    /// Create the shared state with `character` on the digit and the strip dark
    pub const fn new(character: char) -> Self {
        Self {
            display: Mutex::new(DisplayRecord {
                state: DisplayState::new(character),
                chase_request: 0,
            }),
            strip: Mutex::new(StripState::new()),
            digit_done: Signal::new(),
            strip_done: Signal::new(),
        }
    }

    /// Copy of the digit record
    pub async fn display(&self) -> DisplayState {
        self.display.lock().await.state
    }

    /// Copy of the digit record along with the latest boot chase request
    pub(crate) async fn display_and_chase(&self) -> (DisplayState, u32) {
        let display = self.display.lock().await;
        (display.state, display.chase_request)
    }

    /// Copy of the strip record
    pub async fn strip(&self) -> StripState {
        *self.strip.lock().await
    }

    /// Show `character` on the digit, with or without the decimal point
    pub async fn show_char(&self, character: char, decimal_point: bool) {
        self.display.lock().await.state = DisplayState {
            mode: DisplayMode::ShowChar,
            character,
            decimal_point,
        };
    }

    /// Blink the decimal point on its own
    pub async fn blink_dot(&self) {
        self.display.lock().await.state.mode = DisplayMode::BlinkDot;
    }

    /// Play the segment snake once, then show `character` without the decimal point
    pub async fn boot_chase(&self, character: char) {
        let mut display = self.display.lock().await;
        display.state = DisplayState {
            mode: DisplayMode::BootChase,
            character,
            decimal_point: false,
        };
        display.chase_request = display.chase_request.wrapping_add(1);
    }

    /// Tell the digit loop to blank the digit and exit
    pub async fn stop_display(&self) {
        self.display.lock().await.state = DisplayState {
            mode: DisplayMode::Off,
            character: ' ',
            decimal_point: false,
        };
    }

    /// Select what the strip plays, `None` for nothing
    pub async fn play(&self, animation: Option<AnimationId>) {
        self.strip.lock().await.active = animation;
    }

    /// Tell the strip loop to switch the strip off and exit
    pub async fn stop_strip(&self) {
        let mut strip = self.strip.lock().await;
        strip.active = None;
        strip.running = false;
    }

    /// Wait until both loops have blanked their output and exited. Returns straight away on
    /// every later call.
    pub async fn wait_stopped(&self) {
        join(wait_latched(&self.digit_done), wait_latched(&self.strip_done)).await;
    }

    /// Leave the boot chase started by `request`, unless the controller switched to something
    /// else or asked for a fresh chase meanwhile
    pub(crate) async fn finish_boot_chase(&self, request: u32) {
        let mut display = self.display.lock().await;
        if display.state.mode == DisplayMode::BootChase && display.chase_request == request {
            display.state.mode = DisplayMode::ShowChar;
        }
    }

    pub(crate) fn digit_finished(&self) {
        self.digit_done.signal(());
    }

    pub(crate) fn strip_finished(&self) {
        self.strip_done.signal(());
    }
}

/// `Signal::wait` consumes the signal, put it back for the next waiter
async fn wait_latched(done: &Signal<CriticalSectionRawMutex, ()>) {
    done.wait().await;
    done.signal(());
}
