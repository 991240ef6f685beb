// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers all failure modes from reading the source through
//! frame parsing, move reconstruction and the expiry check. The component
//! errors ([`InputError`], [`FrameError`], [`MoveSelectorError`]) are kept as
//! separate enums so callers can match on the failing stage.

use core::fmt;

use crate::pgn::PgnError;
use crate::stego::expiry::Elapsed;

/// Problems with the data handed to encode or decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The source file does not exist.
    MissingFile(String),
    /// The payload to encode is zero bytes long.
    EmptyPayload,
    /// The PGN text to decode is empty or whitespace only.
    EmptyPgn,
    /// The PGN text contains no games.
    NoGames,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile(path) => write!(f, "input file does not exist: {path}"),
            Self::EmptyPayload => write!(f, "input payload is empty"),
            Self::EmptyPgn => write!(f, "input PGN is empty"),
            Self::NoGames => write!(f, "no chess games found in PGN"),
        }
    }
}

impl std::error::Error for InputError {}

/// Problems locating the payload inside the extracted bitstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// No start marker anywhere in the stream.
    MissingStartMarker,
    /// No end marker after the start marker.
    MissingEndMarker,
    /// No whole byte between the markers.
    Empty,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartMarker => write!(f, "start marker not found in decoded data"),
            Self::MissingEndMarker => write!(f, "end marker not found in decoded data"),
            Self::Empty => write!(f, "no data found between markers"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Failures mapping between bits and move choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSelectorError {
    /// The bits read form an index past the end of the move list.
    IndexOutOfRange { index: usize, len: usize },
    /// The played move is not among the legal candidates.
    MoveNotFound { candidates: usize },
}

impl fmt::Display for MoveSelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "move index {index} out of range for {len} moves")
            }
            Self::MoveNotFound { candidates } => {
                write!(f, "played move is not one of the {candidates} legal moves")
            }
        }
    }
}

impl std::error::Error for MoveSelectorError {}

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug)]
pub enum StegoError {
    /// Missing or empty source data.
    Input(InputError),
    /// The PGN text could not be tokenized.
    Pgn(PgnError),
    /// The extracted bits do not contain a valid frame.
    Frame(FrameError),
    /// A game's Seed header is not an integer, or is an integer outside
    /// `0..=u64::MAX` (seeds are non-negative and fit in 64 bits).
    Seed { game: usize, value: String },
    /// The ExpiryTime header is not an integer.
    InvalidExpiry { value: String },
    /// A move could not be encoded or reconstructed.
    Move {
        /// Zero-based game index within the set.
        game: usize,
        /// Zero-based ply within the game.
        ply: usize,
        /// The move as written in the record (empty when encoding).
        mv: String,
        source: MoveSelectorError,
    },
    /// Games from the initial position cannot carry bits: either it has no
    /// legal moves, or a whole game ended on forced moves only.
    DeadPosition,
    /// The payload's expiry time has passed.
    Expired(Elapsed),
    /// Reading the source or writing the output failed.
    Io(std::io::Error),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "invalid input: {e}"),
            Self::Pgn(e) => write!(f, "invalid PGN: {e}"),
            Self::Frame(e) => write!(f, "invalid frame: {e}"),
            Self::Seed { game, value } if value.trim().parse::<i128>().is_ok() => {
                write!(f, "seed {value} in game {} out of range 0..={}", game + 1, u64::MAX)
            }
            Self::Seed { game, value } => {
                write!(f, "invalid seed {value:?} in game {}", game + 1)
            }
            Self::InvalidExpiry { value } => write!(f, "invalid expiry time {value:?}"),
            Self::Move { game, ply, mv, source } if mv.is_empty() => {
                write!(f, "game {}, ply {}: {source}", game + 1, ply + 1)
            }
            Self::Move { game, ply, mv, source } => {
                write!(f, "invalid move {mv} in game {}, ply {}: {source}", game + 1, ply + 1)
            }
            Self::DeadPosition => write!(f, "games from the initial position cannot carry any bits"),
            Self::Expired(elapsed) => {
                write!(f, "this file has expired {elapsed} ago and can no longer be decoded")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Pgn(e) => Some(e),
            Self::Frame(e) => Some(e),
            Self::Move { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for StegoError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<PgnError> for StegoError {
    fn from(e: PgnError) -> Self {
        Self::Pgn(e)
    }
}

impl From<FrameError> for StegoError {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

impl From<std::io::Error> for StegoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_position_message_covers_forced_games() {
        let msg = StegoError::DeadPosition.to_string();
        assert_eq!(msg, "games from the initial position cannot carry any bits");
    }

    #[test]
    fn seed_messages() {
        let not_integer = StegoError::Seed { game: 0, value: "abc".into() };
        assert_eq!(not_integer.to_string(), "invalid seed \"abc\" in game 1");

        let negative = StegoError::Seed { game: 2, value: "-5".into() };
        assert!(negative.to_string().starts_with("seed -5 in game 3 out of range"));
    }
}
