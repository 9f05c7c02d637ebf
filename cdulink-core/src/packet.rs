//! The QPAM display packet — fixed-layout, big-endian wire format.
//!
//! One packet carries the complete screen of one CDU side. The layout
//! is fixed so a decoder can always read whole slots even when lines
//! are blank:
//!
//! ```text
//! offset 0:  4 bytes  ASCII tag "QPAM"
//! offset 4:  4 bytes  i32 BE: line count (≤ 16)
//! offset 8:  4 bytes  i32 BE: side (0 = left, 1 = right, 2 = observer)
//! offset 12: 4 bytes  i32 BE: status bitfield
//! offset 16: line_count × 88 bytes, each:
//!              4 bytes  i32 BE: line number
//!              4 bytes  i32 BE: encoded length
//!              80 bytes: zero-padded encoded line
//! ```
//!
//! Total size = 16 + line_count × 88 (1424 bytes for a 16-line CDU).
//! Transport is one UDP datagram per packet — no acknowledgement, no
//! sequence numbers, last write wins at the receiver.

use bitflags::bitflags;
use bytes::{Buf, BufMut};

use crate::codec::charset::LINE_BUF_LEN;
use crate::codec::line::EncodedLine;
use crate::error::CduLinkError;

// ── Constants ────────────────────────────────────────────────────

/// ASCII tag opening every packet. Shared with the original QPAC MCDU
/// packet family, so existing display clients decode both.
pub const PACKET_TAG: &[u8; 4] = b"QPAM";

/// Lines in a full CDU screen.
pub const PACKET_LINES: usize = 16;

/// Bytes per line slot: line number + encoded length + line bytes.
pub const LINE_SLOT_LEN: usize = 8 + LINE_BUF_LEN;

/// Header bytes ahead of the line slots.
pub const HEADER_LEN: usize = 16;

bitflags! {
    /// Status bitfield carried in the packet header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PacketStatus: u32 {
        /// EXEC annunciator lit.
        const EXEC = 1 << 0;
        /// A scratchpad message is pending.
        const MSG = 1 << 1;
    }
}

// ── LineRecord ───────────────────────────────────────────────────

/// One 88-byte line slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    /// Display row this slot describes.
    pub lineno: i32,
    /// Meaningful bytes in `bytes` (the rest is zero padding).
    pub len: i32,
    /// Zero-padded encoded line.
    pub bytes: [u8; LINE_BUF_LEN],
}

impl LineRecord {
    /// A blank slot.
    pub const fn empty() -> Self {
        Self {
            lineno: 0,
            len: 0,
            bytes: [0u8; LINE_BUF_LEN],
        }
    }

    /// The encoded bytes, without padding.
    pub fn encoded(&self) -> &[u8] {
        &self.bytes[..self.len.max(0) as usize]
    }
}

// ── DisplayPacket ────────────────────────────────────────────────

/// A complete QPAM packet for one CDU side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPacket {
    /// Which physical display this describes (0 left, 1 right,
    /// 2 observer).
    pub side: i32,
    /// Header status bitfield.
    pub status: PacketStatus,
    /// Line slots actually carried (`line_count` of them are encoded).
    pub lines: [LineRecord; PACKET_LINES],
    line_count: usize,
}

impl DisplayPacket {
    /// A blank packet for `side` carrying `line_count` slots.
    pub fn new(side: i32, line_count: usize) -> Self {
        assert!(line_count <= PACKET_LINES);
        let mut lines = [LineRecord::empty(); PACKET_LINES];
        for (i, rec) in lines.iter_mut().enumerate() {
            rec.lineno = i as i32;
        }
        Self {
            side,
            status: PacketStatus::empty(),
            lines,
            line_count,
        }
    }

    /// Number of line slots on the wire.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Encoded size on the wire — fixed for a given line count.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.line_count * LINE_SLOT_LEN
    }

    /// Store an encoded line into slot `line`.
    pub fn set_line(&mut self, line: usize, encoded: &EncodedLine) {
        let rec = &mut self.lines[line];
        rec.lineno = line as i32;
        rec.len = encoded.len() as i32;
        rec.bytes = *encoded.slot();
    }

    /// Sum of encoded lengths across all slots. Zero means the whole
    /// screen is blank, which readiness probing treats as "CDU not
    /// driving its display yet".
    pub fn total_encoded_len(&self) -> usize {
        self.lines[..self.line_count]
            .iter()
            .map(|rec| rec.len.max(0) as usize)
            .sum()
    }

    /// Serialise to the fixed big-endian layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.put_slice(PACKET_TAG);
        out.put_i32(self.line_count as i32);
        out.put_i32(self.side);
        out.put_i32(self.status.bits() as i32);
        for rec in &self.lines[..self.line_count] {
            out.put_i32(rec.lineno);
            out.put_i32(rec.len);
            out.put_slice(&rec.bytes);
        }
        out
    }

    /// Deserialise from the wire layout.
    pub fn decode(data: &[u8]) -> Result<Self, CduLinkError> {
        if data.len() < HEADER_LEN {
            return Err(CduLinkError::PacketTooShort {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut cur = data;
        let mut tag = [0u8; 4];
        cur.copy_to_slice(&mut tag);
        if &tag != PACKET_TAG {
            return Err(CduLinkError::InvalidTag);
        }

        let raw_count = cur.get_i32();
        if raw_count < 0 || raw_count as usize > PACKET_LINES {
            return Err(CduLinkError::InvalidLineCount(raw_count));
        }
        let line_count = raw_count as usize;

        let side = cur.get_i32();
        let status = PacketStatus::from_bits_truncate(cur.get_i32() as u32);

        let expected = HEADER_LEN + line_count * LINE_SLOT_LEN;
        if data.len() < expected {
            return Err(CduLinkError::PacketTooShort {
                expected,
                actual: data.len(),
            });
        }

        let mut lines = [LineRecord::empty(); PACKET_LINES];
        for rec in lines.iter_mut().take(line_count) {
            rec.lineno = cur.get_i32();
            rec.len = cur.get_i32();
            cur.copy_to_slice(&mut rec.bytes);
        }

        Ok(Self {
            side,
            status,
            lines,
            line_count,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────
