//! UDP datagram fan-out.
//!
//! One packet, one datagram, every enabled destination. The transport
//! is a stateless sink by contract: sends are fire-and-forget, a
//! failure is logged and the packet dropped — the next cycle simply
//! re-evaluates from current state. No retries, no backpressure, no
//! acknowledgements; receivers rely on last-write-wins plus the
//! pipeline heartbeat.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::UdpSocket;
use tracing::warn;

use crate::error::CduLinkError;

// ── Destination ──────────────────────────────────────────────────

/// One configured display client endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub addr: SocketAddr,
    /// Disabled destinations stay in the list but are skipped.
    pub enabled: bool,
}

impl Destination {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            enabled: true,
        }
    }
}

// ── DatagramFanout ───────────────────────────────────────────────

/// Outbound UDP socket plus its pre-resolved destination list.
pub struct DatagramFanout {
    socket: UdpSocket,
    destinations: Vec<Destination>,
    /// Total bytes handed to the socket across all destinations.
    bytes_sent: AtomicU64,
}

impl DatagramFanout {
    /// Wrap an already-bound socket.
    pub fn new(socket: UdpSocket, destinations: Vec<Destination>) -> Self {
        Self {
            socket,
            destinations,
            bytes_sent: AtomicU64::new(0),
        }
    }

    /// Bind a fresh socket on `local` and target `destinations`.
    pub async fn bind(
        local: SocketAddr,
        destinations: Vec<Destination>,
    ) -> Result<Self, CduLinkError> {
        let socket = UdpSocket::bind(local).await?;
        Ok(Self::new(socket, destinations))
    }

    /// Send `payload` to every enabled destination.
    ///
    /// Returns how many sends succeeded. Failures are logged at `warn`
    /// and otherwise ignored.
    pub async fn send_to_all(&self, payload: &[u8]) -> usize {
        let mut delivered = 0;
        for dest in self.destinations.iter().filter(|d| d.enabled) {
            match self.socket.send_to(payload, dest.addr).await {
                Ok(n) => {
                    self.bytes_sent.fetch_add(n as u64, Ordering::Relaxed);
                    delivered += 1;
                }
                Err(e) => {
                    warn!(dest = %dest.addr, error = %e, "dropping CDU packet");
                }
            }
        }
        delivered
    }

    /// Total bytes sent since construction.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    /// The configured destination list.
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Enable or disable the destination at `index`.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) {
        if let Some(dest) = self.destinations.get_mut(index) {
            dest.enabled = enabled;
        }
    }

    /// Returns a reference to the underlying socket.
    pub fn socket(&self) -> &UdpSocket {
        &self.socket
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    async fn receiver() -> (UdpSocket, SocketAddr) {
        let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = sock.local_addr().unwrap();
        (sock, addr)
    }

    #[tokio::test]
    async fn fans_out_to_every_enabled_destination() {
        let (rx_a, addr_a) = receiver().await;
        let (rx_b, addr_b) = receiver().await;

        let fanout = DatagramFanout::bind(
            "127.0.0.1:0".parse().unwrap(),
            vec![Destination::new(addr_a), Destination::new(addr_b)],
        )
        .await
        .unwrap();

        let delivered = fanout.send_to_all(b"QPAM-test").await;
        assert_eq!(delivered, 2);
        assert_eq!(fanout.bytes_sent(), 18);

        let mut buf = [0u8; 32];
        let (n, _) = rx_a.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"QPAM-test");
        let (n, _) = rx_b.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"QPAM-test");
    }

    #[tokio::test]
    async fn disabled_destination_is_skipped() {
        let (rx_a, addr_a) = receiver().await;
        let (_rx_b, addr_b) = receiver().await;

        let mut fanout = DatagramFanout::bind(
            "127.0.0.1:0".parse().unwrap(),
            vec![Destination::new(addr_a), Destination::new(addr_b)],
        )
        .await
        .unwrap();
        fanout.set_enabled(1, false);

        let delivered = fanout.send_to_all(b"x").await;
        assert_eq!(delivered, 1);

        let mut buf = [0u8; 4];
        let (n, _) = rx_a.recv_from(&mut buf).await.unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn empty_destination_list_is_a_no_op() {
        let fanout = DatagramFanout::bind("127.0.0.1:0".parse().unwrap(), Vec::new())
            .await
            .unwrap();
        assert_eq!(fanout.send_to_all(b"nobody home").await, 0);
        assert_eq!(fanout.bytes_sent(), 0);
    }
}
