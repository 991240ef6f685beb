// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Payload frame construction and parsing.
//!
//! The frame is the bit-level container that wraps the payload before it is
//! spread across move choices:
//!
//! ```text
//! [4 bits ] start marker 1010
//! [8N bits] payload bytes, MSB first
//! [0-7 bits] zero padding up to a byte boundary
//! [4 bits ] end marker 0101
//! ```
//!
//! Bits are carried as `u8` values 0/1, one per element.
//!
//! On parse the start marker is the *first* occurrence in the stream and the
//! end marker is the *last* occurrence after it. Marker patterns inside the
//! payload are therefore harmless; a stream that carries trailing data
//! reproducing the end marker is not, which is why [`ParsedFrame`] reports
//! any non-byte residue it had to drop.

use crate::stego::error::FrameError;

/// Frame start marker.
pub const START_MARKER: [u8; 4] = [1, 0, 1, 0];
/// Frame end marker.
pub const END_MARKER: [u8; 4] = [0, 1, 0, 1];

/// Number of zero bits needed after `payload_len` bytes to byte-align the frame.
pub fn padding_bits(payload_len: usize) -> usize {
    let unpadded = START_MARKER.len() + payload_len * 8 + END_MARKER.len();
    (8 - unpadded % 8) % 8
}

/// Total frame length in bits for a payload of `payload_len` bytes.
pub fn frame_bit_len(payload_len: usize) -> usize {
    START_MARKER.len() + payload_len * 8 + padding_bits(payload_len) + END_MARKER.len()
}

/// Build the framed bitstream for `payload`.
///
/// Never fails; an empty payload still yields markers (and padding).
pub fn build_frame(payload: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(frame_bit_len(payload.len()));
    bits.extend_from_slice(&START_MARKER);
    bits.extend(bytes_to_bits(payload));
    bits.resize(bits.len() + padding_bits(payload.len()), 0);
    bits.extend_from_slice(&END_MARKER);
    debug_assert_eq!(bits.len() % 8, 0);
    bits
}

/// Payload recovered from a framed bitstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    /// Whole bytes found between the markers.
    pub payload: Vec<u8>,
    /// Bits between the markers that did not make a whole byte and were
    /// dropped. Always 0 for a frame produced by [`build_frame`].
    pub residue_bits: usize,
    /// Bit offset of the start marker.
    pub start: usize,
    /// Bit offset of the end marker.
    pub end: usize,
}

fn find_first(bits: &[u8], pattern: &[u8]) -> Option<usize> {
    bits.windows(pattern.len()).position(|w| w == pattern)
}

fn find_last(bits: &[u8], pattern: &[u8]) -> Option<usize> {
    bits.windows(pattern.len()).rposition(|w| w == pattern)
}

/// Locate the frame in `bits` and return the payload bytes.
///
/// # Errors
/// - [`FrameError::MissingStartMarker`] if `1010` never occurs.
/// - [`FrameError::MissingEndMarker`] if `0101` does not occur at or after
///   the bit following the start marker.
/// - [`FrameError::Empty`] if no whole byte lies between the markers.
pub fn parse_frame(bits: &[u8]) -> Result<ParsedFrame, FrameError> {
    let start = find_first(bits, &START_MARKER).ok_or(FrameError::MissingStartMarker)?;
    let data_start = start + START_MARKER.len();

    let end = find_last(bits, &END_MARKER)
        .filter(|&end| end >= data_start)
        .ok_or(FrameError::MissingEndMarker)?;

    let region = &bits[data_start..end];
    let residue_bits = region.len() % 8;
    let aligned = &region[..region.len() - residue_bits];
    if aligned.is_empty() {
        return Err(FrameError::Empty);
    }

    Ok(ParsedFrame {
        payload: bits_to_bytes(aligned),
        residue_bits,
        start,
        end,
    })
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((bits.len() + 7) / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}
