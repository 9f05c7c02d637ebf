//! # cdulink-core
//!
//! Streaming pipeline that exposes live CDU (control/display unit) text
//! state from a flight simulator to external display clients over UDP.
//!
//! This crate contains:
//! - **Codec**: multi-byte text normalisation, style-byte decoding and
//!   the styled run-length line encoder (`codec`)
//! - **Packet**: the fixed-layout big-endian `QPAM` wire format (`packet`)
//! - **Pipeline**: the `CduSource` capability trait, signal-line change
//!   detection, transmit throttling and the per-cycle service loop (`cdu`)
//! - **Transport**: fire-and-forget UDP datagram fan-out (`transport`)
//! - **Error**: `CduLinkError` — typed, `thiserror`-based errors

pub mod cdu;
pub mod codec;
pub mod error;
pub mod packet;
pub mod transport;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use cdu::detector::ChangeDetector;
pub use cdu::scheduler::{MAX_QUIET_CYCLES, TransmitScheduler};
pub use cdu::service::{CduService, CduServiceConfig};
pub use cdu::source::{
    CDU_LINE_WIDTH, CDU_LINES, CduSource, SCRATCHPAD_LINE, ScriptedSource, TITLE_LINE,
};
pub use codec::charset::{LINE_BUF_LEN, NormalizedLine, RAW_LINE_LEN, normalize};
pub use codec::line::{EncodedLine, SCAN_WIDTH, encode_line};
pub use codec::style::{COLOR_TABLE, StyleFlags, color_code, font_code};
pub use error::CduLinkError;
pub use packet::{
    DisplayPacket, HEADER_LEN, LINE_SLOT_LEN, LineRecord, PACKET_LINES, PACKET_TAG, PacketStatus,
};
pub use transport::{DatagramFanout, Destination};
