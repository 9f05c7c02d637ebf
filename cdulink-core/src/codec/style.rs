//! Style-byte decoding.
//!
//! The simulator supplies one style byte per character:
//!
//! - bit 7: large font
//! - bit 6: reverse video (colored background, black text)
//! - bit 5: flash
//! - bit 4: underline
//! - bits 3..0: color index — BLACK(0), CYAN(1), RED(2), YELLOW(3),
//!   GREEN(4), MAGENTA(5), AMBER(6), WHITE(7); 8..15 unassigned.
//!
//! The wire color letters come from the QPAM alphabet (`n` is black —
//! French *noir*). Reverse video flips the letter to upper case rather
//! than changing the table. Flash and underline are decoded for
//! completeness; the line encoder does not carry them yet.

use bitflags::bitflags;

/// Color letters indexed by the low style nibble. Unassigned indices
/// fall back to magenta, which is visually distinguishable on clients.
pub const COLOR_TABLE: [u8; 16] = *b"nbrygmawmmmmmmmm";

const LARGE_FONT_BIT: u8 = 1 << 7;
const REVERSE_VIDEO_BIT: u8 = 1 << 6;

bitflags! {
    /// Attribute bits of a style byte (color nibble excluded).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StyleFlags: u8 {
        const LARGE_FONT    = 1 << 7;
        const REVERSE_VIDEO = 1 << 6;
        const FLASH         = 1 << 5;
        const UNDERLINE     = 1 << 4;
    }
}

impl StyleFlags {
    /// Decode the attribute bits of `style`.
    pub fn decode(style: u8) -> Self {
        Self::from_bits_truncate(style)
    }
}

/// Wire font code: `l` for large font, `s` for small.
pub fn font_code(style: u8) -> u8 {
    if style & LARGE_FONT_BIT != 0 { b'l' } else { b's' }
}

/// Wire color code for `style`.
///
/// Lower case is the normal color; upper case (letter − 32) signals
/// reverse video. Total — every input byte maps to a defined output.
pub fn color_code(style: u8) -> u8 {
    let code = COLOR_TABLE[(style & 0x0F) as usize];
    if style & REVERSE_VIDEO_BIT != 0 {
        code - 32
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_codes() {
        assert_eq!(font_code(0x00), b's');
        assert_eq!(font_code(0x80), b'l');
        assert_eq!(font_code(0x84), b'l');
    }

    #[test]
    fn color_codes_low_nibble() {
        assert_eq!(color_code(0x00), b'n'); // black
        assert_eq!(color_code(0x01), b'b'); // cyan -> blue letter
        assert_eq!(color_code(0x02), b'r'); // red
        assert_eq!(color_code(0x04), b'g'); // green
        assert_eq!(color_code(0x07), b'w'); // white
    }

    #[test]
    fn unassigned_colors_fall_back_to_magenta() {
        for nibble in 8u8..=15 {
            assert_eq!(color_code(nibble), b'm');
        }
    }

    #[test]
    fn reverse_video_uppercases() {
        assert_eq!(color_code(0x40), b'N');
        assert_eq!(color_code(0x44), b'G');
        // Large font does not affect the color letter.
        assert_eq!(color_code(0xC4), b'G');
    }

    #[test]
    fn flags_decode_all_bits() {
        let f = StyleFlags::decode(0xF0);
        assert!(f.contains(StyleFlags::LARGE_FONT));
        assert!(f.contains(StyleFlags::REVERSE_VIDEO));
        assert!(f.contains(StyleFlags::FLASH));
        assert!(f.contains(StyleFlags::UNDERLINE));

        // Color nibble is not part of the flags.
        assert_eq!(StyleFlags::decode(0x0F), StyleFlags::empty());
    }
}
