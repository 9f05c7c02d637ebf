//! Styled run-length line encoder.
//!
//! Turns a [`NormalizedLine`] plus its parallel style bytes into the
//! compact representation carried in a packet slot: literal runs
//! prefixed by 4-byte style tokens, with long blank spans suppressed.
//!
//! ## Encoded form
//!
//! ```text
//! <font><color><tens><units>LITERAL…[;<font><color><tens><units>LITERAL…]…
//! ```
//!
//! A token names the font code, the color code and the two-digit start
//! column of the run that follows it. `"ABCDEF"` in small black at
//! column 0 encodes as `sn00ABCDEF`. A token is only ever emitted when
//! at least one literal follows, and identical consecutive styles
//! never repeat a token.

use crate::codec::charset::{LINE_BUF_LEN, NormalizedLine};
use crate::codec::style::{color_code, font_code};

// ── Constants ────────────────────────────────────────────────────

/// Columns scanned per line. Wider than the 24-column physical CDU so
/// clients that accept wider pages keep working; the two-digit column
/// encoding caps this below 100.
pub const SCAN_WIDTH: usize = 45;

/// Trailing bytes kept free so a final `;` + token + literal always
/// fits ahead of the zero terminator. Encoding truncates silently at
/// this margin.
const SAFETY_MARGIN: usize = 9;

/// Consecutive blanks tolerated inside a styled run before the run is
/// broken and the remaining blanks suppressed.
const BLANK_RUN_LIMIT: u32 = 2;

// ── EncodedLine ──────────────────────────────────────────────────

/// One encoded display line, zero-padded to the fixed slot size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedLine {
    buf: [u8; LINE_BUF_LEN],
    len: usize,
}

impl EncodedLine {
    /// An empty line (all padding).
    pub fn empty() -> Self {
        Self {
            buf: [0u8; LINE_BUF_LEN],
            len: 0,
        }
    }

    /// The encoded bytes, without padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when the line encoded to nothing (blank line).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The full zero-padded slot as it appears on the wire.
    pub fn slot(&self) -> &[u8; LINE_BUF_LEN] {
        &self.buf
    }
}

// ── encode_line ──────────────────────────────────────────────────

/// Encode one display line.
///
/// Walks columns `0..width`, tracking the current style and a blank
/// counter:
///
/// - non-blank with a new style → `;` separator (unless first output),
///   then a style token, then the literal;
/// - blank inside the text while the counter is below the limit → the
///   blank passes through;
/// - blank beyond the limit → nothing is emitted and the current style
///   is forgotten, forcing a fresh token on the next non-blank;
/// - past the end of the text with no short blank run pending → stop,
///   the rest of the line is implicitly blank.
///
/// The blank counter resets only when a token is emitted, so sparse
/// spacing like `N 1 2 3` re-tokenises after the second gap. Styles
/// missing past the style buffer read as 0 (small font, black).
pub fn encode_line(text: &NormalizedLine, styles: &[u8], width: usize) -> EncodedLine {
    let mut out = EncodedLine::empty();
    let mut current: Option<u8> = None;
    let mut blanks: u32 = 0;
    let chars = text.as_bytes();

    for col in 0..width {
        if out.len >= LINE_BUF_LEN - SAFETY_MARGIN {
            break;
        }

        if col < chars.len() && chars[col] != b' ' {
            let style = styles.get(col).copied().unwrap_or(0);
            if current != Some(style) {
                current = Some(style);
                blanks = 0;
                if out.len > 0 {
                    out.buf[out.len] = b';';
                    out.len += 1;
                }
                out.buf[out.len] = font_code(style);
                out.buf[out.len + 1] = color_code(style);
                out.buf[out.len + 2] = b'0' + (col / 10) as u8;
                out.buf[out.len + 3] = b'0' + (col % 10) as u8;
                out.len += 4;
            }
            out.buf[out.len] = chars[col];
            out.len += 1;
        } else if col < chars.len() && blanks < BLANK_RUN_LIMIT {
            out.buf[out.len] = b' ';
            out.len += 1;
            blanks += 1;
        } else if blanks > 1 {
            current = None;
        } else {
            break;
        }
    }

    out
}

// ── Tests ────────────────────────────────────────────────────────
