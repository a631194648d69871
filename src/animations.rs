//! Animations module provides the LED strip patterns that can be selected from the digit.
//!
//! Every pattern is an iterator of [`Frame`]s. The strip loop pushes each frame and holds it for
//! the frame's duration, so a pattern always plays to its end before the loop looks at its state
//! again. Patterns:
//! - Rainbow cycle: the whole colour wheel spread along the strip, rotating
//! - Chase: a band of colour travelling along a background colour
//! - Rainbow chase: a single dot travelling along the strip, coloured by its position
//! - Alternate: blocks of two alternating colours that swap once
//! - Closing wipe: colour closing in from both ends towards the middle
//! - Strobe: two colours flashed with darkness in between
//! - Strobe rainbow: one flash of the next colour of the wheel
//! - Demo: closing wipe, rainbow cycle and rainbow chase one after another

use crate::{
    STRIP_LENGTH,
    drivers::neopixel::{LedBuffer, OFF_BUFFER},
    maths::{spread, wheel},
};
use embassy_time::Duration;
use smart_leds::RGB8;

pub const BLACK: RGB8 = RGB8::new(0, 0, 0);
pub const RED: RGB8 = RGB8::new(0xFF, 0, 0);
pub const MUSE_BLUE: RGB8 = RGB8::new(0x13, 0x11, 0xF0);
pub const MUSE_PINK: RGB8 = RGB8::new(0xCD, 0x00, 0xC4);

/// Number of frames in one rotation of the rainbow cycle
const RAINBOW_CYCLE_FRAMES: usize = 255;

/// One step of an animation: the pixels to push and how long to leave them on the strip
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub pixels: LedBuffer,
    pub hold: Duration,
}

/// The animations that can be selected, numbered as shown on the digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AnimationId {
    Demo = 1,
    RainbowCycle = 2,
    RedDot = 3,
    RainbowChase = 4,
    BandChase = 5,
    Alternate = 6,
    ClosingWipe = 7,
    Strobe = 8,
    StrobeRainbow = 9,
}

impl AnimationId {
    pub const ALL: [AnimationId; 9] = [
        AnimationId::Demo,
        AnimationId::RainbowCycle,
        AnimationId::RedDot,
        AnimationId::RainbowChase,
        AnimationId::BandChase,
        AnimationId::Alternate,
        AnimationId::ClosingWipe,
        AnimationId::Strobe,
        AnimationId::StrobeRainbow,
    ];

    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AnimationId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=9 => Ok(Self::ALL[value as usize - 1]),
            other => Err(other),
        }
    }
}

/// Represents the different animations that can be played on the LED strip
#[derive(Clone)]
pub enum Animation {
    RainbowCycle(RainbowCycle),
    Chase(Chase),
    RainbowChase(RainbowChase),
    Alternate(Alternate),
    ClosingWipe(ClosingWipe),
    Strobe(Strobe),
    StrobeRainbow(StrobeRainbow),
    Demo(Demo),
}

impl Animation {
    /// Build the pattern behind `id`.
    ///
    /// # Arguments
    /// * `id` - The selected animation
    /// * `strobe_index` - Colour wheel step of the rainbow strobe. It is advanced every time the
    ///   rainbow strobe is built so consecutive flashes walk around the wheel.
    pub fn from_id(id: AnimationId, strobe_index: &mut usize) -> Self {
        match id {
            AnimationId::Demo => Animation::Demo(Demo::new()),
            AnimationId::RainbowCycle => Animation::RainbowCycle(RainbowCycle::new()),
            AnimationId::RedDot => Animation::Chase(Chase::new(BLACK, RED, 1, ms(10))),
            AnimationId::RainbowChase => Animation::RainbowChase(RainbowChase::new(ms(10))),
            AnimationId::BandChase => Animation::Chase(Chase::new(MUSE_BLUE, MUSE_PINK, 3, ms(20))),
            AnimationId::Alternate => {
                Animation::Alternate(Alternate::new(MUSE_BLUE, MUSE_PINK, 3, ms(300)))
            }
            AnimationId::ClosingWipe => {
                Animation::ClosingWipe(ClosingWipe::new(MUSE_BLUE, MUSE_PINK, ms(40)))
            }
            AnimationId::Strobe => Animation::Strobe(Strobe::new(MUSE_BLUE, MUSE_PINK, ms(80))),
            AnimationId::StrobeRainbow => {
                let strobe = StrobeRainbow::new(*strobe_index, ms(80));
                *strobe_index = (*strobe_index + 1) % STRIP_LENGTH;
                Animation::StrobeRainbow(strobe)
            }
        }
    }
}

/// Steps whichever pattern `anim` holds. Patterns live in an enum rather than behind a trait
/// object since there is no heap to box them in.
///
/// # Returns
/// The next frame, or `None` once the pattern has played out
pub fn next_frame(anim: &mut Animation) -> Option<Frame> {
    match anim {
        Animation::RainbowCycle(a) => a.next(),
        Animation::Chase(a) => a.next(),
        Animation::RainbowChase(a) => a.next(),
        Animation::Alternate(a) => a.next(),
        Animation::ClosingWipe(a) => a.next(),
        Animation::Strobe(a) => a.next(),
        Animation::StrobeRainbow(a) => a.next(),
        Animation::Demo(a) => a.next(),
    }
}

const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Phase-shifted colour wheel across all pixels, one wheel step per frame
#[derive(Clone)]
pub struct RainbowCycle {
    step: usize,
}

impl RainbowCycle {
    pub fn new() -> Self {
        Self { step: 0 }
    }
}

impl Default for RainbowCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for RainbowCycle {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= RAINBOW_CYCLE_FRAMES {
            return None;
        }
        let mut pixels = OFF_BUFFER;
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let pos = (i * 256 / STRIP_LENGTH + self.step) & 255;
            *pixel = wheel(pos as i32);
        }
        self.step += 1;
        Some(Frame {
            pixels,
            hold: ms(1),
        })
    }
}

/// A band of `width` pixels in the foreground colour travelling over the background colour.
///
/// The band grows in from the start of the strip and drains out at the end, one pixel per frame.
#[derive(Clone)]
pub struct Chase {
    pixels: LedBuffer,
    background: RGB8,
    foreground: RGB8,
    width: usize,
    hold: Duration,
    step: usize,
}

impl Chase {
    pub fn new(background: RGB8, foreground: RGB8, width: usize, hold: Duration) -> Self {
        Self {
            pixels: [background; STRIP_LENGTH],
            background,
            foreground,
            width: width.max(1),
            hold,
            step: 0,
        }
    }
}

impl Iterator for Chase {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.step;
        if i >= STRIP_LENGTH + self.width {
            return None;
        }
        if i >= self.width {
            self.pixels[i - self.width] = self.background;
        }
        if i < STRIP_LENGTH {
            self.pixels[i] = self.foreground;
        }
        self.step += 1;
        Some(Frame {
            pixels: self.pixels,
            hold: self.hold,
        })
    }
}

/// A single dot travelling over a dark strip, its colour taken from the wheel at its position
#[derive(Clone)]
pub struct RainbowChase {
    pixels: LedBuffer,
    hold: Duration,
    step: usize,
}

impl RainbowChase {
    pub fn new(hold: Duration) -> Self {
        Self {
            pixels: OFF_BUFFER,
            hold,
            step: 0,
        }
    }
}

impl Iterator for RainbowChase {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.step;
        if i > STRIP_LENGTH {
            return None;
        }
        if i > 0 {
            self.pixels[i - 1] = BLACK;
        }
        if i < STRIP_LENGTH {
            self.pixels[i] = wheel(spread(i, STRIP_LENGTH));
        }
        self.step += 1;
        Some(Frame {
            pixels: self.pixels,
            hold: self.hold,
        })
    }
}

/// Adjacent blocks of `block` pixels alternating between two colours, shown twice with the
/// colours swapped the second time
#[derive(Clone)]
pub struct Alternate {
    pixels: LedBuffer,
    colours: (RGB8, RGB8),
    block: usize,
    hold: Duration,
    step: usize,
}

impl Alternate {
    pub fn new(first: RGB8, second: RGB8, block: usize, hold: Duration) -> Self {
        Self {
            pixels: OFF_BUFFER,
            colours: (first, second),
            block: block.max(1),
            hold,
            step: 0,
        }
    }
}

impl Iterator for Alternate {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= 2 {
            return None;
        }
        let (first, second) = self.colours;
        // Only whole pairs of blocks are painted; a remainder keeps its previous colour
        let pair = 2 * self.block;
        let painted = STRIP_LENGTH / pair * pair;
        for (i, pixel) in self.pixels[..painted].iter_mut().enumerate() {
            *pixel = if i % pair < self.block { first } else { second };
        }
        self.colours = (second, first);
        self.step += 1;
        Some(Frame {
            pixels: self.pixels,
            hold: self.hold,
        })
    }
}

/// Fill with the background, then light one pixel from each end per frame until they meet
#[derive(Clone)]
pub struct ClosingWipe {
    pixels: LedBuffer,
    background: RGB8,
    foreground: RGB8,
    hold: Duration,
    step: usize,
}

impl ClosingWipe {
    pub fn new(background: RGB8, foreground: RGB8, hold: Duration) -> Self {
        Self {
            pixels: OFF_BUFFER,
            background,
            foreground,
            hold,
            step: 0,
        }
    }
}

impl Iterator for ClosingWipe {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step {
            0 => self.pixels = [self.background; STRIP_LENGTH],
            s if s <= STRIP_LENGTH / 2 => {
                let rank = s - 1;
                self.pixels[rank] = self.foreground;
                self.pixels[STRIP_LENGTH - 1 - rank] = self.foreground;
            }
            _ => return None,
        }
        self.step += 1;
        Some(Frame {
            pixels: self.pixels,
            hold: self.hold,
        })
    }
}

/// Whole strip flashes the first colour, goes dark, then flashes the second colour
#[derive(Clone)]
pub struct Strobe {
    colours: [RGB8; 3],
    hold: Duration,
    step: usize,
}

impl Strobe {
    pub fn new(first: RGB8, second: RGB8, hold: Duration) -> Self {
        Self {
            colours: [first, BLACK, second],
            hold,
            step: 0,
        }
    }
}

impl Iterator for Strobe {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let colour = *self.colours.get(self.step)?;
        self.step += 1;
        Some(Frame {
            pixels: [colour; STRIP_LENGTH],
            hold: self.hold,
        })
    }
}

/// Whole strip flashes one colour of the wheel, then goes dark
#[derive(Clone)]
pub struct StrobeRainbow {
    colour: RGB8,
    hold: Duration,
    step: usize,
}

impl StrobeRainbow {
    /// # Arguments
    /// * `index` - Which of the `STRIP_LENGTH` evenly spaced wheel colours to flash
    pub fn new(index: usize, hold: Duration) -> Self {
        Self {
            colour: wheel(spread(index, STRIP_LENGTH)),
            hold,
            step: 0,
        }
    }
}

impl Iterator for StrobeRainbow {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let colour = match self.step {
            0 => self.colour,
            1 => BLACK,
            _ => return None,
        };
        self.step += 1;
        Some(Frame {
            pixels: [colour; STRIP_LENGTH],
            hold: self.hold,
        })
    }
}

/// Closing wipe, rainbow cycle and rainbow chase played back to back
#[derive(Clone)]
pub struct Demo {
    wipe: ClosingWipe,
    cycle: RainbowCycle,
    chase: RainbowChase,
}

impl Demo {
    pub fn new() -> Self {
        Self {
            wipe: ClosingWipe::new(MUSE_BLUE, MUSE_PINK, ms(40)),
            cycle: RainbowCycle::new(),
            chase: RainbowChase::new(ms(10)),
        }
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Demo {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        self.wipe
            .next()
            .or_else(|| self.cycle.next())
            .or_else(|| self.chase.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec::Vec;

    const GREEN: RGB8 = RGB8::new(0, 0xFF, 0);

    fn frames(mut anim: Animation) -> Vec<Frame> {
        core::iter::from_fn(|| next_frame(&mut anim)).collect()
    }

    #[test]
    fn id_numbers_round_trip() {
        for (n, id) in (1u8..).zip(AnimationId::ALL) {
            assert_eq!(id.number(), n);
            assert_eq!(AnimationId::try_from(n), Ok(id));
        }
        assert_eq!(AnimationId::try_from(0), Err(0));
        assert_eq!(AnimationId::try_from(10), Err(10));
    }

    #[test]
    fn every_animation_ends() {
        let mut index = 0;
        for id in AnimationId::ALL {
            let frames = frames(Animation::from_id(id, &mut index));
            assert!(!frames.is_empty(), "{:?}", id);
            assert!(frames.len() < 1000, "{:?}", id);
        }
    }

    #[test]
    fn red_dot_travels_one_pixel_per_frame() {
        let frames = frames(Animation::Chase(Chase::new(BLACK, RED, 1, ms(10))));
        assert_eq!(frames.len(), STRIP_LENGTH + 1);
        for (i, frame) in frames.iter().enumerate() {
            if i > 0 {
                assert_eq!(frame.pixels[i - 1], BLACK, "frame {}", i);
            }
            if i < STRIP_LENGTH {
                assert_eq!(frame.pixels[i], RED, "frame {}", i);
                let lit = frame.pixels.iter().filter(|p| **p != BLACK).count();
                assert_eq!(lit, 1, "frame {}", i);
            }
            assert_eq!(frame.hold, ms(10));
        }
        assert!(frames[STRIP_LENGTH].pixels.iter().all(|p| *p == BLACK));
    }

    #[test]
    fn wide_band_never_exceeds_its_width() {
        let frames = frames(Animation::Chase(Chase::new(MUSE_BLUE, MUSE_PINK, 3, ms(20))));
        assert_eq!(frames.len(), STRIP_LENGTH + 3);
        for frame in &frames {
            let lit = frame.pixels.iter().filter(|p| **p == MUSE_PINK).count();
            assert!(lit <= 3);
            assert!(frame.pixels.iter().all(|p| *p == MUSE_PINK || *p == MUSE_BLUE));
        }
        assert_eq!(frames[5].pixels[3..6], [MUSE_PINK; 3]);
        assert_eq!(frames[5].pixels[2], MUSE_BLUE);
        assert!(frames.last().unwrap().pixels.iter().all(|p| *p == MUSE_BLUE));
    }

    #[test]
    fn alternate_swaps_colours_on_the_same_blocks() {
        let frames = frames(Animation::Alternate(Alternate::new(RED, GREEN, 3, ms(300))));
        assert_eq!(frames.len(), 2);
        for i in 0..STRIP_LENGTH {
            let first_block = (i / 3) % 2 == 0;
            let (a, b) = if first_block { (RED, GREEN) } else { (GREEN, RED) };
            assert_eq!(frames[0].pixels[i], a, "pixel {}", i);
            assert_eq!(frames[1].pixels[i], b, "pixel {}", i);
        }
    }

    #[test]
    fn alternate_leaves_a_partial_block_dark() {
        let frames = frames(Animation::Alternate(Alternate::new(RED, GREEN, 4, ms(300))));
        // 30 pixels hold three pairs of 4-pixel blocks, the last 6 are not painted
        assert_eq!(frames[0].pixels[23], GREEN);
        assert!(frames[0].pixels[24..].iter().all(|p| *p == BLACK));
    }

    #[test]
    fn closing_wipe_meets_in_the_middle() {
        let frames = frames(Animation::ClosingWipe(ClosingWipe::new(MUSE_BLUE, RED, ms(40))));
        assert_eq!(frames.len(), STRIP_LENGTH / 2 + 1);
        assert!(frames[0].pixels.iter().all(|p| *p == MUSE_BLUE));
        let third = &frames[3].pixels;
        assert_eq!(third[..3], [RED; 3]);
        assert_eq!(third[STRIP_LENGTH - 3..], [RED; 3]);
        assert_eq!(third[3], MUSE_BLUE);
        assert_eq!(third[STRIP_LENGTH - 4], MUSE_BLUE);
        assert!(frames.last().unwrap().pixels.iter().all(|p| *p == RED));
    }

    #[test]
    fn strobe_flashes_dark_between_colours() {
        let frames = frames(Animation::Strobe(Strobe::new(RED, GREEN, ms(80))));
        let flashes: Vec<RGB8> = frames.iter().map(|f| f.pixels[0]).collect();
        assert_eq!(flashes, [RED, BLACK, GREEN]);
        assert!(frames.iter().all(|f| f.pixels.iter().all(|p| *p == f.pixels[0])));
    }

    #[test]
    fn rainbow_strobe_walks_the_wheel() {
        let mut index = STRIP_LENGTH - 2;
        let first = frames(Animation::from_id(AnimationId::StrobeRainbow, &mut index));
        assert_eq!(index, STRIP_LENGTH - 1);
        let second = frames(Animation::from_id(AnimationId::StrobeRainbow, &mut index));
        assert_eq!(index, 0);
        let third = frames(Animation::from_id(AnimationId::StrobeRainbow, &mut index));
        assert_eq!(index, 1);

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].pixels[0], wheel(spread(STRIP_LENGTH - 2, STRIP_LENGTH)));
        assert_eq!(second[0].pixels[0], wheel(spread(STRIP_LENGTH - 1, STRIP_LENGTH)));
        assert_eq!(third[0].pixels[0], wheel(0));
        assert!(first[1].pixels.iter().all(|p| *p == BLACK));
    }

    #[test]
    fn rainbow_cycle_rotates_the_wheel() {
        let frames = frames(Animation::RainbowCycle(RainbowCycle::new()));
        assert_eq!(frames.len(), RAINBOW_CYCLE_FRAMES);
        assert_eq!(frames[0].pixels[0], wheel(0));
        assert_eq!(frames[0].pixels[15], wheel(128));
        assert_eq!(frames[10].pixels[0], wheel(10));
        assert_eq!(frames[1].pixels[29], wheel(248));
        assert_eq!(frames[0].hold, ms(1));
    }

    #[test]
    fn rainbow_chase_leaves_the_strip_dark() {
        let frames = frames(Animation::RainbowChase(RainbowChase::new(ms(10))));
        assert_eq!(frames.len(), STRIP_LENGTH + 1);
        assert_eq!(frames[15].pixels[15], wheel(128));
        assert_eq!(frames[15].pixels[14], BLACK);
        assert!(frames[STRIP_LENGTH].pixels.iter().all(|p| *p == BLACK));
    }

    #[test]
    fn demo_plays_its_parts_in_order() {
        let frames = frames(Animation::from_id(AnimationId::Demo, &mut 0));
        let wipe = STRIP_LENGTH / 2 + 1;
        assert_eq!(frames.len(), wipe + RAINBOW_CYCLE_FRAMES + STRIP_LENGTH + 1);
        assert!(frames[0].pixels.iter().all(|p| *p == MUSE_BLUE));
        assert_eq!(frames[wipe].pixels[0], wheel(0));
        assert_eq!(frames[wipe].hold, ms(1));
        assert_eq!(frames.last().unwrap().hold, ms(10));
    }
}
