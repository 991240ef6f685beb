// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! # chess-stego
//!
//! Hides arbitrary bytes in legal chess games. Each position with `n` legal
//! moves can carry `floor(log2(n))` bits: the move list is shuffled with a
//! per-game seeded PRNG and the next payload bits choose an index into it.
//! The resulting games are written as ordinary PGN, with the seed stored in
//! each game's headers so the payload can be recovered without any shared
//! secret.
//!
//! This is an encoding, not encryption. Anyone who knows the scheme can read
//! the payload.
//!
//! # Quick start
//!
//! ```rust
//! use chess_stego::{decode, encode, EncodeOptions};
//!
//! let pgn = encode(b"hello", &EncodeOptions::default()).unwrap();
//! assert_eq!(decode(&pgn).unwrap(), b"hello");
//! ```

pub mod pgn;
pub mod rules;
pub mod stego;

pub use pgn::{PgnError, PgnGame};
pub use rules::{Board, StandardBoard};
pub use stego::{decode, decode_at, decode_file, decode_file_at, encode, encode_file, encode_games};
pub use stego::{EncodeOptions, GameHeaders, GameRecord, StegoError};
