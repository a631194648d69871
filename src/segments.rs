//! Bit patterns for the common-anode 7-segment digit behind the 74HC595.
//!
//! One bit per segment, bit 0 = A through bit 6 = G and bit 7 = decimal point. The outputs are
//! active-low: a cleared bit lights its segment.

/// Every segment off
pub const BLANK: u8 = 0xFF;

/// AND this into a pattern to light the decimal point
pub const DECIMAL_POINT_MASK: u8 = 0x7F;

/// The segment walk played when an animation is confirmed: a snake tracing an "8"
pub const BOOT_CHASE: [Segment; 8] = [
    Segment::A,
    Segment::B,
    Segment::G,
    Segment::E,
    Segment::D,
    Segment::C,
    Segment::G,
    Segment::F,
];

/// A single illuminable stroke of the digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    /// Decimal point
    Dp,
    /// No segment at all
    Blank,
}

impl Segment {
    /// Parse a segment name (`"A"`..`"G"`, `"DP"` or `" "`), ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let segment = match name {
            n if n.eq_ignore_ascii_case("A") => Segment::A,
            n if n.eq_ignore_ascii_case("B") => Segment::B,
            n if n.eq_ignore_ascii_case("C") => Segment::C,
            n if n.eq_ignore_ascii_case("D") => Segment::D,
            n if n.eq_ignore_ascii_case("E") => Segment::E,
            n if n.eq_ignore_ascii_case("F") => Segment::F,
            n if n.eq_ignore_ascii_case("G") => Segment::G,
            n if n.eq_ignore_ascii_case("DP") => Segment::Dp,
            " " => Segment::Blank,
            _ => return None,
        };
        Some(segment)
    }

    /// The pattern lighting only this segment
    pub const fn bits(self) -> u8 {
        match self {
            Segment::A => 0b1111_1110,
            Segment::B => 0b1111_1101,
            Segment::C => 0b1111_1011,
            Segment::D => 0b1111_0111,
            Segment::E => 0b1110_1111,
            Segment::F => 0b1101_1111,
            Segment::G => 0b1011_1111,
            Segment::Dp => 0b0111_1111,
            Segment::Blank => BLANK,
        }
    }
}

/// Encode a hex digit (either case) or a space, optionally with the decimal point lit.
///
/// Returns `None` for any other character so the caller can leave the display untouched.
pub const fn encode(character: char, decimal_point: bool) -> Option<u8> {
    let bits = match character.to_ascii_uppercase() {
        '0' => 0xC0,
        '1' => 0xF9,
        '2' => 0xA4,
        '3' => 0xB0,
        '4' => 0x99,
        '5' => 0x92,
        '6' => 0x82,
        '7' => 0xF8,
        '8' => 0x80,
        '9' => 0x90,
        'A' => 0x88,
        'B' => 0x83,
        'C' => 0xC6,
        'D' => 0xA1,
        'E' => 0x86,
        'F' => 0x8E,
        ' ' => BLANK,
        _ => return None,
    };
    if decimal_point {
        Some(bits & DECIMAL_POINT_MASK)
    } else {
        Some(bits)
    }
}

/// Encode a segment given by name, see [`Segment::from_name`].
pub fn encode_segment(name: &str) -> Option<u8> {
    Segment::from_name(name).map(Segment::bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "0123456789ABCDEF";

    #[test]
    fn decimal_point_only_touches_its_own_bit() {
        for c in HEX.chars() {
            let plain = encode(c, false).unwrap();
            let dotted = encode(c, true).unwrap();
            assert_eq!(plain ^ dotted, 0x80, "digit {}", c);
            // No digit uses the point on its own
            assert_eq!(plain & 0x80, 0x80);
        }
    }

    #[test]
    fn space_is_all_segments_off() {
        assert_eq!(encode(' ', false), Some(BLANK));
        assert_eq!(encode(' ', true), Some(Segment::Dp.bits()));
    }

    #[test]
    fn lower_case_matches_upper_case() {
        for (lower, upper) in "abcdef".chars().zip("ABCDEF".chars()) {
            assert_eq!(encode(lower, false), encode(upper, false));
        }
    }

    #[test]
    fn unknown_characters_are_rejected() {
        assert_eq!(encode('G', false), None);
        assert_eq!(encode('-', true), None);
        assert_eq!(encode('\0', false), None);
    }

    #[test]
    fn eight_lights_every_segment_but_the_point() {
        let eight = encode('8', false).unwrap();
        for segment in [
            Segment::A,
            Segment::B,
            Segment::C,
            Segment::D,
            Segment::E,
            Segment::F,
            Segment::G,
        ] {
            assert_eq!(eight & !segment.bits(), 0, "{:?} should be lit", segment);
        }
        assert_eq!(eight | Segment::Dp.bits(), BLANK);
    }

    #[test]
    fn segment_names() {
        assert_eq!(encode_segment("A"), Some(0xFE));
        assert_eq!(encode_segment("g"), Some(0xBF));
        assert_eq!(encode_segment("dp"), Some(0x7F));
        assert_eq!(encode_segment(" "), Some(BLANK));
        assert_eq!(encode_segment("H"), None);
        assert_eq!(encode_segment(""), None);
    }

    #[test]
    fn each_segment_clears_exactly_one_bit() {
        for segment in BOOT_CHASE {
            assert_eq!(segment.bits().count_zeros(), 1);
        }
        assert_eq!(Segment::Dp.bits().count_zeros(), 1);
        assert_eq!(Segment::Blank.bits().count_zeros(), 0);
    }
}
