//! Domain-specific error types for the CDULINK pipeline.
//!
//! Encoding is total — malformed simulator input maps to fallback
//! glyphs and oversized lines truncate silently — so errors only arise
//! at the wire boundary: decoding a received packet or binding sockets.

use thiserror::Error;

/// The canonical error type for CDULINK.
#[derive(Debug, Error)]
pub enum CduLinkError {
    // ── Wire format errors ───────────────────────────────────────
    /// Received bytes that do not start with the QPAM tag.
    #[error("invalid packet tag: expected QPAM")]
    InvalidTag,

    /// The received buffer is shorter than its declared layout.
    #[error("packet too short: expected {expected} bytes, got {actual}")]
    PacketTooShort { expected: usize, actual: usize },

    /// The header declares a line count outside 0..=16.
    #[error("invalid line count: {0}")]
    InvalidLineCount(i32),

    // ── Socket errors ────────────────────────────────────────────
    /// The UDP layer reported an error outside the send path
    /// (send failures are logged and dropped, never surfaced).
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = CduLinkError::InvalidTag;
        assert!(e.to_string().contains("QPAM"));

        let e = CduLinkError::PacketTooShort {
            expected: 1424,
            actual: 10,
        };
        assert!(e.to_string().contains("1424"));
        assert!(e.to_string().contains("10"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let e: CduLinkError = io_err.into();
        assert!(matches!(e, CduLinkError::Io(_)));
    }
}
