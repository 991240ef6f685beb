// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Chess steganography codec.
//!
//! Payload bytes are wrapped in a frame ([`frame`]), and the frame bits are
//! spent on move choices ([`permute`]) across one or more games
//! ([`sequencer`]). Each game carries the seed that keys its move shuffle and,
//! optionally, an expiry time ([`expiry`]) in its PGN headers
//! ([`metadata`]). [`pipeline`] ties these together into byte and file entry
//! points.

pub mod error;
pub mod expiry;
pub mod frame;
pub mod metadata;
pub mod output;
pub mod permute;
pub mod pipeline;
pub mod sequencer;

pub use error::{FrameError, InputError, MoveSelectorError, StegoError};
pub use expiry::Elapsed;
pub use frame::ParsedFrame;
pub use metadata::{games_from_pgn, games_to_pgn, GameHeaders, GameRecord};
pub use pipeline::{
    decode, decode_at, decode_file, decode_file_at, encode, encode_file, encode_games, EncodeOptions,
};
pub use sequencer::MAX_PLIES;
