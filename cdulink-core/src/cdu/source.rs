//! The side-data-source capability.
//!
//! [`CduSource`] is the seam between the pipeline and the simulator:
//! the host resolves dataref handles and answers raw byte reads; the
//! pipeline never sees handles, only bytes. Every display-unit flavor
//! (FMS, QPAC-style MCDU) collapses onto this one trait.

use std::sync::{Arc, Mutex};

use crate::codec::charset::RAW_LINE_LEN;

// ── Constants ────────────────────────────────────────────────────

/// Display rows per CDU screen.
pub const CDU_LINES: usize = 16;

/// Characters per physical display row (style datarefs cover exactly
/// this many columns).
pub const CDU_LINE_WIDTH: usize = 24;

/// Row holding the page title.
pub const TITLE_LINE: usize = 0;

/// Row holding the scratchpad.
pub const SCRATCHPAD_LINE: usize = 13;

// ── CduSource ────────────────────────────────────────────────────

/// Read access to one display family's live CDU state.
///
/// Readers copy into caller buffers (the shape of the simulator's
/// byte-dataref primitive) and return the byte count. A read of 0
/// means the underlying dataref is empty or unresolved.
pub trait CduSource {
    /// Copy up to `buf.len()` raw text bytes for `line` of `side`.
    fn read_text(&self, side: i32, line: usize, buf: &mut [u8]) -> usize;

    /// Copy up to `buf.len()` style bytes for `line` of `side`.
    fn read_style(&self, side: i32, line: usize, buf: &mut [u8]) -> usize;

    /// Side index the pilot's display shows (0 or 1).
    fn pilot_side(&self) -> i32;

    /// Side index the copilot's display shows (0 or 1).
    fn copilot_side(&self) -> i32;

    /// Whether this display family is ready to be encoded at all.
    fn is_ready(&self) -> bool;

    /// Whether transmission is enabled and no higher-priority provider
    /// has claimed the physical displays. The pipeline only reads
    /// this; superseding is arbitrated elsewhere.
    fn is_enabled(&self) -> bool;

    /// Rows compared by the change detector as a cheap proxy for
    /// "did this screen change" — title and scratchpad by default.
    fn signal_lines(&self) -> [usize; 2] {
        [TITLE_LINE, SCRATCHPAD_LINE]
    }
}

// ── ScriptedSource ───────────────────────────────────────────────

#[derive(Clone)]
struct ScriptedLine {
    text: Vec<u8>,
    styles: Vec<u8>,
}

struct ScriptedInner {
    sides: [Vec<ScriptedLine>; 2],
    pilot: i32,
    copilot: i32,
    ready: bool,
    enabled: bool,
}

/// An in-memory [`CduSource`] with mutable pages.
///
/// Handles are cheap clones sharing the same state, so a driver (or a
/// test) can keep one handle and mutate pages while the service owns
/// another.
#[derive(Clone)]
pub struct ScriptedSource {
    inner: Arc<Mutex<ScriptedInner>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        let blank = || {
            vec![
                ScriptedLine {
                    text: Vec::new(),
                    styles: Vec::new(),
                };
                CDU_LINES
            ]
        };
        Self {
            inner: Arc::new(Mutex::new(ScriptedInner {
                sides: [blank(), blank()],
                pilot: 0,
                copilot: 0,
                ready: true,
                enabled: true,
            })),
        }
    }

    /// Set a line with a uniform style byte.
    pub fn set_line(&self, side: i32, line: usize, text: &str, style: u8) {
        let styles = vec![style; text.len().min(CDU_LINE_WIDTH)];
        self.set_line_styled(side, line, text.as_bytes(), &styles);
    }

    /// Set a line with explicit per-character styles.
    pub fn set_line_styled(&self, side: i32, line: usize, text: &[u8], styles: &[u8]) {
        let mut inner = self.lock();
        let slot = &mut inner.sides[side_slot(side)][line];
        slot.text = text[..text.len().min(RAW_LINE_LEN)].to_vec();
        slot.styles = styles[..styles.len().min(CDU_LINE_WIDTH)].to_vec();
    }

    /// Clear every line of `side`.
    pub fn clear_side(&self, side: i32) {
        let mut inner = self.lock();
        for slot in &mut inner.sides[side_slot(side)] {
            slot.text.clear();
            slot.styles.clear();
        }
    }

    pub fn set_sides(&self, pilot: i32, copilot: i32) {
        let mut inner = self.lock();
        inner.pilot = pilot;
        inner.copilot = copilot;
    }

    pub fn set_ready(&self, ready: bool) {
        self.lock().ready = ready;
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Sides 0 and 1 have distinct state; the observer side mirrors 1.
fn side_slot(side: i32) -> usize {
    if side == 0 { 0 } else { 1 }
}

fn copy_into(buf: &mut [u8], src: &[u8]) -> usize {
    let n = src.len().min(buf.len());
    buf[..n].copy_from_slice(&src[..n]);
    n
}

impl CduSource for ScriptedSource {
    fn read_text(&self, side: i32, line: usize, buf: &mut [u8]) -> usize {
        let inner = self.lock();
        copy_into(buf, &inner.sides[side_slot(side)][line].text)
    }

    fn read_style(&self, side: i32, line: usize, buf: &mut [u8]) -> usize {
        let inner = self.lock();
        copy_into(buf, &inner.sides[side_slot(side)][line].styles)
    }

    fn pilot_side(&self) -> i32 {
        self.lock().pilot
    }

    fn copilot_side(&self) -> i32 {
        self.lock().copilot
    }

    fn is_ready(&self) -> bool {
        self.lock().ready
    }

    fn is_enabled(&self) -> bool {
        self.lock().enabled
    }
}

// ── Tests ────────────────────────────────────────────────────────
