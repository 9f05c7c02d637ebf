//! The per-display-unit pipeline: source capability, change
//! detection, transmit throttling and the cycle loop.
//!
//! One [`service::CduService`] owns the whole pipeline for one display
//! family, so the previous-packet cache and throttle counters need no
//! locking — the host invokes cycles serially.

pub mod detector;
pub mod scheduler;
pub mod service;
pub mod source;

use crate::codec::charset::{RAW_LINE_LEN, normalize};
use crate::codec::line::{EncodedLine, encode_line};
use source::{CDU_LINE_WIDTH, CduSource};

/// Read, normalise and encode one line of one side.
///
/// This is the single path from simulator buffers to wire bytes; the
/// detector and the packet builder both go through it so signal-line
/// comparison sees exactly what would be transmitted.
pub fn encode_cdu_line<S: CduSource + ?Sized>(
    source: &S,
    side: i32,
    line: usize,
    width: usize,
) -> EncodedLine {
    let mut raw = [0u8; RAW_LINE_LEN];
    let n = source.read_text(side, line, &mut raw);
    let text = normalize(&raw[..n.min(RAW_LINE_LEN)]);

    let mut styles = [0u8; CDU_LINE_WIDTH];
    let m = source.read_style(side, line, &mut styles);
    encode_line(&text, &styles[..m.min(CDU_LINE_WIDTH)], width)
}
