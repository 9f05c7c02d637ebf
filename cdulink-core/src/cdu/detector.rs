//! Signal-line change detection between consecutive cycles.
//!
//! Re-encoding all 16 lines every cycle just to discover nothing
//! changed would waste most of the budget, so the detector encodes
//! only the signal lines (title and scratchpad) and compares their
//! bytes against the same slots of the last transmitted packet. Byte
//! comparison, not semantic — any encoding difference counts.

use crate::cdu::encode_cdu_line;
use crate::cdu::source::CduSource;
use crate::packet::DisplayPacket;

/// Stateful detector holding one previous-packet snapshot per side.
///
/// Snapshots are overwritten only after a transmit decision, so a
/// cycle that skips sending leaves the baseline untouched. The cache
/// lives for the process lifetime; [`invalidate`](Self::invalidate)
/// exists for the aircraft-change collaborator to call when cached
/// screens become meaningless.
pub struct ChangeDetector {
    previous: [Option<DisplayPacket>; 2],
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self {
            previous: [None, None],
        }
    }

    /// Compare the freshly encoded signal lines of every relevant side
    /// against the cached packets.
    ///
    /// A side with no cached packet counts as changed — the first
    /// cycle always transmits.
    pub fn is_updated<S: CduSource>(
        &self,
        source: &S,
        pilot: i32,
        copilot: i32,
        width: usize,
    ) -> bool {
        let mut changed = false;
        for side in [0, 1] {
            if pilot == side || copilot == side {
                changed |= self.side_changed(source, side, width);
            }
        }
        changed
    }

    /// Record `packet` as the new baseline for its side.
    pub fn store(&mut self, packet: DisplayPacket) {
        let slot = if packet.side == 0 { 0 } else { 1 };
        self.previous[slot] = Some(packet);
    }

    /// The cached packet for `side`, if any has been transmitted.
    pub fn previous(&self, side: i32) -> Option<&DisplayPacket> {
        self.previous[if side == 0 { 0 } else { 1 }].as_ref()
    }

    /// Drop both baselines, forcing the next comparison to report a
    /// change.
    pub fn invalidate(&mut self) {
        self.previous = [None, None];
    }

    fn side_changed<S: CduSource>(&self, source: &S, side: i32, width: usize) -> bool {
        let slot = if side == 0 { 0 } else { 1 };
        let prev = match &self.previous[slot] {
            Some(p) => p,
            None => return true,
        };
        for line in source.signal_lines() {
            let current = encode_cdu_line(source, side, line, width);
            if current.slot() != &prev.lines[line].bytes {
                return true;
            }
        }
        false
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────
