//! Byte-stream normaliser for simulator CDU text.
//!
//! CDU line datarefs are UTF-8 encoded and may need up to 48 bytes for
//! a 24-character line. Display clients speak a single-byte alphabet,
//! so every recognised multi-byte sequence folds into one sentinel
//! byte and everything unrecognised folds into a class-specific
//! fallback glyph. The substitution table is a compatibility contract
//! with deployed clients — do not change it:
//!
//! | sequence                | glyph  | meaning          |
//! |-------------------------|--------|------------------|
//! | `C2 B0`                 | `` ` ``| degree sign      |
//! | `CE 94`                 | `\|`   | capital delta    |
//! | other 2-byte            | `%`    | unknown          |
//! | `E2 98 90`              | `*`    | ballot box       |
//! | `E2 86 90`..`E2 86 93`  | `1C`..`1F` | arrows ←↑→↓ |
//! | other 3-byte            | `@`    | unknown          |
//! | 4-byte lead             | `#`    | unknown          |
//! | orphan continuation     | `?`    | malformed        |

// ── Constants ────────────────────────────────────────────────────

/// Maximum raw bytes consumed from a simulator text dataref.
pub const RAW_LINE_LEN: usize = 48;

/// Capacity of normalised and encoded line buffers (includes the
/// implicit zero terminator).
pub const LINE_BUF_LEN: usize = 80;

// ── NormalizedLine ───────────────────────────────────────────────

/// A single-byte-per-character line, zero-padded to capacity.
///
/// Every byte in `as_bytes()` is printable ASCII, a space, or one of
/// the arrow sentinels `0x1C..=0x1F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedLine {
    buf: [u8; LINE_BUF_LEN],
    len: usize,
}

impl NormalizedLine {
    /// The normalised bytes, without padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Character count after substitution.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when the raw read was empty or held only a terminator.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// ── normalize ────────────────────────────────────────────────────

/// Fold a raw simulator text buffer into a [`NormalizedLine`].
///
/// Scans left to right, stopping at a zero byte or after
/// [`RAW_LINE_LEN`] input bytes. The write cursor never outruns the
/// read cursor, so output length is bounded by input length.
///
/// An empty `raw` yields an empty line, which callers use to tell
/// "dataref absent" apart from "dataref present but blank".
pub fn normalize(raw: &[u8]) -> NormalizedLine {
    // Zero-padded staging buffer, wider than the read cap so that
    // continuation-byte lookahead near the cap reads padding zeroes
    // instead of running off the end.
    let mut input = [0u8; LINE_BUF_LEN];
    let n = raw.len().min(RAW_LINE_LEN);
    input[..n].copy_from_slice(&raw[..n]);

    let mut out = NormalizedLine {
        buf: [0u8; LINE_BUF_LEN],
        len: 0,
    };

    let mut i = 0;
    while i < RAW_LINE_LEN && input[i] != 0 {
        let b = input[i];
        let (glyph, consumed) = if b < 0x80 {
            // Plain ASCII.
            (b, 1)
        } else if b <= 0xBF {
            // Continuation byte with no lead.
            (b'?', 1)
        } else if (0xC2..=0xDF).contains(&b) {
            match (b, input[i + 1]) {
                (0xC2, 0xB0) => (b'`', 2), // degree
                (0xCE, 0x94) => (b'|', 2), // delta
                _ => (b'%', 2),
            }
        } else if (0xE0..=0xEF).contains(&b) {
            match (b, input[i + 1], input[i + 2]) {
                (0xE2, 0x98, 0x90) => (b'*', 3),  // ballot box
                (0xE2, 0x86, 0x90) => (0x1C, 3),  // left arrow
                (0xE2, 0x86, 0x91) => (0x1D, 3),  // up arrow
                (0xE2, 0x86, 0x92) => (0x1E, 3),  // right arrow
                (0xE2, 0x86, 0x93) => (0x1F, 3),  // down arrow
                _ => (b'@', 3),
            }
        } else {
            // 0xF0.. four-byte sequence (and the invalid leads
            // 0xC0/0xC1, which deployed clients expect here too).
            (b'#', 4)
        };

        out.buf[out.len] = glyph;
        out.len += 1;
        i += consumed;
    }

    out
}

// ── Tests ────────────────────────────────────────────────────────
