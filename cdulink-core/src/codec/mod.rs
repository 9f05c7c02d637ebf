//! Display-text codec: normalisation, style decoding and line encoding.
//!
//! The simulator hands the pipeline raw UTF-8-ish text buffers and a
//! parallel style byte per character. These pass through three stages:
//!
//! 1. [`charset::normalize`] folds multi-byte sequences into the
//!    single-byte alphabet the display clients understand.
//! 2. [`style`] maps a style byte to font/color codes.
//! 3. [`line::encode_line`] produces the compact styled-run
//!    representation carried in [`crate::packet::DisplayPacket`] slots.

pub mod charset;
pub mod line;
pub mod style;
