use smart_leds::RGB8;

// Hue wheel

/// Map a position on the colour wheel (0 to 255) to a colour. The colours are a transition
/// red - green - blue - back to red, built from three linear segments.
///
/// Anything outside 0..=255 is black.
pub const fn wheel(pos: i32) -> RGB8 {
    if pos < 0 || pos > 255 {
        return RGB8::new(0, 0, 0);
    }
    // All three branches stay inside 0..=255 so the casts never truncate
    if pos < 85 {
        RGB8::new((pos * 3) as u8, (255 - pos * 3) as u8, 0)
    } else if pos < 170 {
        let pos = pos - 85;
        RGB8::new((255 - pos * 3) as u8, 0, (pos * 3) as u8)
    } else {
        let pos = pos - 170;
        RGB8::new(0, (pos * 3) as u8, (255 - pos * 3) as u8)
    }
}

/// Wheel position of pixel `index` when one full turn of the wheel is spread over `len` pixels
pub const fn spread(index: usize, len: usize) -> i32 {
    if len == 0 {
        return 0;
    }
    ((index * 256 / len) & 255) as i32
}
