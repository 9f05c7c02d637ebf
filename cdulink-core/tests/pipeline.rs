//! End-to-end pipeline tests — scripted CDU pages through the full
//! encode/detect/throttle/send path to a real UDP receiver, decoded
//! back with the wire-format decoder.

use std::time::Duration;

use cdulink_core::{
    CduService, CduServiceConfig, DatagramFanout, Destination, DisplayPacket, PACKET_LINES,
    SCRATCHPAD_LINE, ScriptedSource, TITLE_LINE,
};
use tokio::net::UdpSocket;

// ── Helpers ──────────────────────────────────────────────────────

async fn receiver() -> (UdpSocket, std::net::SocketAddr) {
    let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = sock.local_addr().unwrap();
    (sock, addr)
}

async fn recv_packet(rx: &UdpSocket) -> DisplayPacket {
    let mut buf = [0u8; 2048];
    let (n, _) = tokio::time::timeout(Duration::from_secs(5), rx.recv_from(&mut buf))
        .await
        .expect("timed out waiting for packet")
        .unwrap();
    assert_eq!(n, 1424, "QPAM packets are fixed-size");
    DisplayPacket::decode(&buf[..n]).unwrap()
}

async fn expect_silence(rx: &UdpSocket) {
    let mut buf = [0u8; 2048];
    let res = tokio::time::timeout(Duration::from_millis(50), rx.recv_from(&mut buf)).await;
    assert!(res.is_err(), "expected no datagram");
}

fn sample_page(source: &ScriptedSource, side: i32) {
    source.set_line(side, TITLE_LINE, "  ACT RTE 1     ", 0x80);
    source.set_line(side, 2, " KJFK", 0x04);
    source.set_line(side, 4, " KBOS", 0x04);
    source.set_line(side, SCRATCHPAD_LINE, "RTE COPY", 0x00);
}

// ── Tests ────────────────────────────────────────────────────────

#[tokio::test]
async fn full_screen_survives_the_wire() {
    let (rx, addr) = receiver().await;
    let fanout = DatagramFanout::bind(
        "127.0.0.1:0".parse().unwrap(),
        vec![Destination::new(addr)],
    )
    .await
    .unwrap();

    let source = ScriptedSource::new();
    sample_page(&source, 0);

    let mut svc = CduService::new(source.clone(), fanout);
    let reference = svc.build_packet(0);

    svc.poll().await;
    let received = recv_packet(&rx).await;

    assert_eq!(received.side, 0);
    assert_eq!(received.line_count(), PACKET_LINES);
    for line in 0..PACKET_LINES {
        assert_eq!(
            received.lines[line].encoded(),
            reference.lines[line].encoded(),
            "line {line}"
        );
    }
}

#[tokio::test]
async fn two_destinations_both_receive_every_update() {
    let (rx_a, addr_a) = receiver().await;
    let (rx_b, addr_b) = receiver().await;
    let fanout = DatagramFanout::bind(
        "127.0.0.1:0".parse().unwrap(),
        vec![Destination::new(addr_a), Destination::new(addr_b)],
    )
    .await
    .unwrap();

    let source = ScriptedSource::new();
    sample_page(&source, 0);

    let mut svc = CduService::new(source.clone(), fanout);
    svc.poll().await;

    let a = recv_packet(&rx_a).await;
    let b = recv_packet(&rx_b).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn pilot_and_copilot_packets_are_cached_independently() {
    let (rx, addr) = receiver().await;
    let fanout = DatagramFanout::bind(
        "127.0.0.1:0".parse().unwrap(),
        vec![Destination::new(addr)],
    )
    .await
    .unwrap();

    let source = ScriptedSource::new();
    source.set_sides(0, 1);
    sample_page(&source, 0);
    source.set_line(1, TITLE_LINE, "  ACT RTE 2     ", 0x80);
    source.set_line(1, SCRATCHPAD_LINE, "", 0x00);

    let mut svc = CduService::new(source.clone(), fanout);

    // First cycle: one packet per side.
    svc.poll().await;
    let first = recv_packet(&rx).await;
    let second = recv_packet(&rx).await;
    assert_eq!(first.side, 0);
    assert_eq!(second.side, 1);
    assert_ne!(
        first.lines[TITLE_LINE].encoded(),
        second.lines[TITLE_LINE].encoded()
    );

    // Nothing changed: both sides stay silent.
    svc.poll().await;
    expect_silence(&rx).await;

    // Editing one side's scratchpad retransmits both sides (the
    // cycle-level decision is shared, per the protocol).
    source.set_line(1, SCRATCHPAD_LINE, "HOLD AT KBOS", 0x00);
    svc.poll().await;
    let first = recv_packet(&rx).await;
    let second = recv_packet(&rx).await;
    assert_eq!(first.side, 0);
    assert_eq!(second.side, 1);
    assert_eq!(
        second.lines[SCRATCHPAD_LINE].encoded(),
        b"sn00HOLD AT KBOS"
    );
}

#[tokio::test]
async fn heartbeat_keeps_a_late_client_converging() {
    let (rx, addr) = receiver().await;
    let fanout = DatagramFanout::bind(
        "127.0.0.1:0".parse().unwrap(),
        vec![Destination::new(addr)],
    )
    .await
    .unwrap();

    let source = ScriptedSource::new();
    sample_page(&source, 0);

    let config = CduServiceConfig {
        max_quiet_cycles: 2,
        ..CduServiceConfig::default()
    };
    let mut svc = CduService::with_config(source.clone(), fanout, config);

    svc.poll().await;
    recv_packet(&rx).await;

    // Two quiet cycles, then the heartbeat.
    svc.poll().await;
    svc.poll().await;
    expect_silence(&rx).await;
    svc.poll().await;
    let pkt = recv_packet(&rx).await;
    assert_eq!(pkt.side, 0);
}
