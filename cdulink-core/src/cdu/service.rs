//! Per-cycle pipeline orchestration.
//!
//! Each invocation of [`CduService::poll`] runs the whole pipeline
//! synchronously:
//!
//! 1. [`CduSource`] readiness / supersession gate.
//! 2. [`ChangeDetector`] compares signal lines against the cache.
//! 3. [`TransmitScheduler`] folds in keypress urgency and the
//!    heartbeat counter.
//! 4. On a send decision: build the full packet for the pilot side
//!    (and the copilot side when it differs), fan it out, cache it.
//!
//! The return value is the interval until the caller should poll
//! again — short while the display is live, long while it is not
//! ready or superseded. [`run`](CduService::run) wraps `poll` in a
//! sleep loop for hosts without their own timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::cdu::detector::ChangeDetector;
use crate::cdu::encode_cdu_line;
use crate::cdu::scheduler::{MAX_QUIET_CYCLES, TransmitScheduler};
use crate::cdu::source::CduSource;
use crate::codec::line::SCAN_WIDTH;
use crate::packet::{DisplayPacket, PACKET_LINES};
use crate::transport::DatagramFanout;

// ── CduServiceConfig ─────────────────────────────────────────────

/// Configuration for [`CduService`].
#[derive(Debug, Clone)]
pub struct CduServiceConfig {
    /// Poll interval while the display is live.
    pub active_interval: Duration,
    /// Poll interval while not ready or superseded.
    pub idle_interval: Duration,
    /// Quiescence threshold for the heartbeat send.
    pub max_quiet_cycles: u32,
    /// Columns scanned per line.
    pub scan_width: usize,
}

impl Default for CduServiceConfig {
    fn default() -> Self {
        Self {
            active_interval: Duration::from_millis(100),
            idle_interval: Duration::from_secs(10),
            max_quiet_cycles: MAX_QUIET_CYCLES,
            scan_width: SCAN_WIDTH,
        }
    }
}

// ── CduService ───────────────────────────────────────────────────

/// The pipeline instance for one display family.
///
/// Owns all mutable cycle state (cache, counters), so no locking is
/// needed — the host serialises invocations.
pub struct CduService<S: CduSource> {
    source: S,
    detector: ChangeDetector,
    scheduler: TransmitScheduler,
    transport: Arc<DatagramFanout>,
    running: Arc<AtomicBool>,
    config: CduServiceConfig,
}

impl<S: CduSource> CduService<S> {
    /// Create a service with the default configuration.
    pub fn new(source: S, transport: DatagramFanout) -> Self {
        Self::with_config(source, transport, CduServiceConfig::default())
    }

    /// Create a service with explicit configuration.
    pub fn with_config(source: S, transport: DatagramFanout, config: CduServiceConfig) -> Self {
        Self {
            source,
            detector: ChangeDetector::new(),
            scheduler: TransmitScheduler::with_max_quiet(config.max_quiet_cycles),
            transport: Arc::new(transport),
            running: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Cloneable handle that stops [`run`](Self::run) from another task.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Cloneable handle for bumping keypress urgency from command
    /// dispatch.
    pub fn keypress_handle(&self) -> Arc<AtomicU32> {
        self.scheduler.keypress_handle()
    }

    /// Drop the previous-packet cache (e.g. after an aircraft change).
    pub fn invalidate_cache(&mut self) {
        self.detector.invalidate();
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether either side currently encodes a non-empty signal line.
    /// An all-blank screen means the CDU is not driving its display.
    pub fn probe_ready(&self) -> bool {
        [0, 1].iter().any(|&side| {
            self.source
                .signal_lines()
                .iter()
                .any(|&line| !encode_cdu_line(&self.source, side, line, self.config.scan_width).is_empty())
        })
    }

    /// Encode the full screen of `side` into a packet.
    pub fn build_packet(&self, side: i32) -> DisplayPacket {
        let mut pkt = DisplayPacket::new(side, PACKET_LINES);
        for line in 0..PACKET_LINES {
            let enc = encode_cdu_line(&self.source, side, line, self.config.scan_width);
            pkt.set_line(line, &enc);
        }
        pkt
    }

    /// Run one cycle; returns the interval until the next poll.
    pub async fn poll(&mut self) -> Duration {
        self.scheduler.tick();

        if !self.source.is_ready() || !self.source.is_enabled() {
            return self.config.idle_interval;
        }

        let pilot = self.source.pilot_side();
        let copilot = self.source.copilot_side();
        let changed =
            self.detector
                .is_updated(&self.source, pilot, copilot, self.config.scan_width);

        if self.scheduler.should_send(changed) {
            debug!(pilot, copilot, changed, "transmitting CDU packet(s)");
            self.send_side(pilot).await;
            if copilot != pilot {
                self.send_side(copilot).await;
            }
        }

        self.config.active_interval
    }

    /// Poll in a sleep loop until [`stop`](Self::stop) is called.
    pub async fn run(&mut self) {
        self.running.store(true, Ordering::SeqCst);
        while self.running.load(Ordering::SeqCst) {
            let interval = self.poll().await;
            tokio::time::sleep(interval).await;
        }
    }

    /// Signal the run loop to stop after the current cycle.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the run loop is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn send_side(&mut self, side: i32) {
        let pkt = self.build_packet(side);
        self.transport.send_to_all(&pkt.encode()).await;
        // Cache even when every destination failed: the original
        // pipeline treats a built packet as transmitted.
        self.detector.store(pkt);
    }
}

// ── Tests ────────────────────────────────────────────────────────
