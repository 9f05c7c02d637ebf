//! Transmit throttling: when to re-encode and re-send.
//!
//! Three triggers make a cycle transmit:
//!
//! 1. the change detector reports different signal lines;
//! 2. keypress urgency is pending (a cockpit input was dispatched and
//!    the client should see its effect promptly);
//! 3. the quiescence counter passed its threshold — a heartbeat so a
//!    client that missed every earlier datagram still converges.
//!
//! Everything else skips the cycle entirely; the 16-line encode and
//! the packet build never run.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Cycles a display unit may stay silent before a heartbeat send.
pub const MAX_QUIET_CYCLES: u32 = 7;

/// Per-display-unit throttle counters.
///
/// The keypress counter lives behind an `Arc` so command dispatch can
/// bump it from outside the pipeline via
/// [`keypress_handle`](Self::keypress_handle); the cycle itself is
/// single-threaded and owns the rest.
pub struct TransmitScheduler {
    cycles_since_send: u32,
    keypress: Arc<AtomicU32>,
    max_quiet_cycles: u32,
}

impl TransmitScheduler {
    pub fn new() -> Self {
        Self::with_max_quiet(MAX_QUIET_CYCLES)
    }

    pub fn with_max_quiet(max_quiet_cycles: u32) -> Self {
        Self {
            cycles_since_send: 0,
            keypress: Arc::new(AtomicU32::new(0)),
            max_quiet_cycles,
        }
    }

    /// Cloneable handle for bumping keypress urgency from the command
    /// dispatch path.
    pub fn keypress_handle(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.keypress)
    }

    /// Record one pending keypress.
    pub fn notify_keypress(&self) {
        self.keypress.fetch_add(1, Ordering::SeqCst);
    }

    /// Advance the cycle counter. Called once per invocation, ready or
    /// not, so a display that just became ready transmits immediately.
    pub fn tick(&mut self) {
        self.cycles_since_send += 1;
    }

    /// Decide whether this cycle transmits. On a send decision the
    /// quiescence counter resets and at most one pending keypress is
    /// consumed.
    pub fn should_send(&mut self, changed: bool) -> bool {
        let urgent = self.keypress.load(Ordering::SeqCst) > 0;
        if changed || urgent || self.cycles_since_send > self.max_quiet_cycles {
            self.cycles_since_send = 0;
            if urgent {
                self.keypress.fetch_sub(1, Ordering::SeqCst);
            }
            true
        } else {
            false
        }
    }

    /// Cycles elapsed since the last send decision.
    pub fn quiet_cycles(&self) -> u32 {
        self.cycles_since_send
    }
}

impl Default for TransmitScheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_cycle(s: &mut TransmitScheduler) -> bool {
        s.tick();
        s.should_send(false)
    }

    #[test]
    fn change_triggers_send() {
        let mut s = TransmitScheduler::new();
        s.tick();
        assert!(s.should_send(true));
        assert_eq!(s.quiet_cycles(), 0);
    }

    #[test]
    fn unchanged_below_threshold_stays_silent() {
        let mut s = TransmitScheduler::new();
        for _ in 0..MAX_QUIET_CYCLES {
            assert!(!quiet_cycle(&mut s));
        }
    }

    #[test]
    fn heartbeat_fires_past_threshold() {
        let mut s = TransmitScheduler::new();
        for _ in 0..MAX_QUIET_CYCLES {
            assert!(!quiet_cycle(&mut s));
        }
        // 8th unchanged cycle after a threshold of 7.
        assert!(quiet_cycle(&mut s));
        // Counter reset — silent again.
        assert!(!quiet_cycle(&mut s));
    }

    #[test]
    fn keypress_forces_send_and_decrements_once() {
        let mut s = TransmitScheduler::new();
        s.notify_keypress();
        s.notify_keypress();

        assert!(quiet_cycle(&mut s));
        assert!(quiet_cycle(&mut s));
        // Both consumed, back to silence.
        assert!(!quiet_cycle(&mut s));
    }

    #[test]
    fn external_handle_bumps_urgency() {
        let mut s = TransmitScheduler::new();
        let handle = s.keypress_handle();
        handle.fetch_add(1, Ordering::SeqCst);
        assert!(quiet_cycle(&mut s));
    }

    #[test]
    fn idle_ticks_accumulate_toward_first_send() {
        // A display that was not ready for a while transmits on its
        // first ready cycle.
        let mut s = TransmitScheduler::new();
        for _ in 0..20 {
            s.tick();
        }
        assert!(s.should_send(false));
    }
}
