//! A synthetic CDU page for exercising display clients without a
//! simulator attached.
//!
//! The page shows the full color and font palette plus the special
//! glyphs, and a scratchpad frame counter that advances once a second
//! so the change detector has something real to detect.

use std::time::Instant;

use cdulink_core::{CduSource, SCRATCHPAD_LINE, TITLE_LINE};

/// Glyph sampler row: degree, delta, ballot box and the four arrows,
/// as the raw multi-byte sequences the normaliser folds.
const GLYPH_ROW: &[u8] = &[
    b'G', b'L', b'Y', b'P', b'H', b'S', b' ', 0xC2, 0xB0, b' ', 0xCE, 0x94, b' ', 0xE2, 0x98,
    0x90, b' ', 0xE2, 0x86, 0x90, 0xE2, 0x86, 0x91, 0xE2, 0x86, 0x92, 0xE2, 0x86, 0x93,
];

/// Time-driven [`CduSource`] producing a fixed test page.
///
/// Pure function of elapsed time — reads never mutate, so the source
/// needs no interior state.
pub struct TestPatternSource {
    start: Instant,
    pilot: i32,
    copilot: i32,
}

impl TestPatternSource {
    pub fn new(pilot: i32, copilot: i32) -> Self {
        Self {
            start: Instant::now(),
            pilot,
            copilot,
        }
    }

    fn frame(&self) -> u64 {
        self.start.elapsed().as_secs()
    }

    fn line_text(&self, side: i32, line: usize) -> Vec<u8> {
        match line {
            TITLE_LINE => format!("  CDULINK TEST {}  ", if side == 0 { "L" } else { "R" })
                .into_bytes(),
            2 => b"COLORS NBRYGMAW".to_vec(),
            4 => b"LARGE AND small".to_vec(),
            6 => GLYPH_ROW.to_vec(),
            8 => b"REVERSE VIDEO".to_vec(),
            SCRATCHPAD_LINE => format!("FRAME {:>6}", self.frame()).into_bytes(),
            _ => Vec::new(),
        }
    }

    fn line_styles(&self, _side: i32, line: usize) -> Vec<u8> {
        match line {
            TITLE_LINE => vec![0x87; 20], // large white
            2 => {
                // One character per palette color.
                let mut styles = vec![0x07; 7];
                styles.extend((0u8..8).map(|c| 0x80 | c));
                styles
            }
            4 => {
                let mut styles = vec![0x84; 6]; // large green
                styles.extend(vec![0x04; 9]); // small green
                styles
            }
            6 => vec![0x03; 29], // yellow
            8 => vec![0x46; 13], // amber, reverse video
            SCRATCHPAD_LINE => vec![0x07; 12],
            _ => Vec::new(),
        }
    }
}

fn copy_into(buf: &mut [u8], src: &[u8]) -> usize {
    let n = src.len().min(buf.len());
    buf[..n].copy_from_slice(&src[..n]);
    n
}

impl CduSource for TestPatternSource {
    fn read_text(&self, side: i32, line: usize, buf: &mut [u8]) -> usize {
        copy_into(buf, &self.line_text(side, line))
    }

    fn read_style(&self, side: i32, line: usize, buf: &mut [u8]) -> usize {
        copy_into(buf, &self.line_styles(side, line))
    }

    fn pilot_side(&self) -> i32 {
        self.pilot
    }

    fn copilot_side(&self) -> i32 {
        self.copilot
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cdulink_core::{PACKET_LINES, SCAN_WIDTH, cdu::encode_cdu_line};

    #[test]
    fn every_line_encodes_within_bounds() {
        let src = TestPatternSource::new(0, 1);
        for side in [0, 1] {
            for line in 0..PACKET_LINES {
                let enc = encode_cdu_line(&src, side, line, SCAN_WIDTH);
                assert!(enc.len() < 80, "side {side} line {line}");
            }
        }
    }

    #[test]
    fn glyph_row_folds_to_sentinels() {
        let src = TestPatternSource::new(0, 0);
        let enc = encode_cdu_line(&src, 0, 6, SCAN_WIDTH);
        let bytes = enc.as_bytes();
        assert!(bytes.windows(2).any(|w| w == [b'`', b' ']), "degree");
        assert!(bytes.contains(&b'*'), "ballot box");
        assert!(bytes.contains(&0x1C) && bytes.contains(&0x1F), "arrows");
    }

    #[test]
    fn title_differs_per_side() {
        let src = TestPatternSource::new(0, 1);
        let left = encode_cdu_line(&src, 0, TITLE_LINE, SCAN_WIDTH);
        let right = encode_cdu_line(&src, 1, TITLE_LINE, SCAN_WIDTH);
        assert_ne!(left.as_bytes(), right.as_bytes());
    }
}
