// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Minimal PGN (Portable Game Notation) text codec.
//!
//! Handles exactly what game records need to round-trip: tag pairs and the
//! SAN mainline. On read it tolerates the usual decorations found in PGN from
//! other tools:
//!
//! - `{...}` and `;` comments, `%` escape lines
//! - `(...)` variations (skipped, nested)
//! - NAGs (`$14`), move numbers (`12.`, `12...`) and `!`/`?` annotations
//!
//! SAN tokens are returned verbatim (minus annotation glyphs); turning them
//! into moves is the rules engine's job.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{PgnError, Result};
pub use reader::read_games;
pub use writer::{write_game, write_games};

/// Result tokens that terminate a game's movetext.
pub const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// One game as it appears in PGN text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnGame {
    /// Tag pairs in file order.
    pub tags: Vec<(String, String)>,
    /// Mainline moves in SAN.
    pub moves: Vec<String>,
    /// Game termination marker, if one was present.
    pub result: Option<String>,
}

impl PgnGame {
    /// Look up a tag value by key (case-sensitive, first match wins).
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Append a tag pair.
    pub fn push_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.push((key.into(), value.into()));
    }
}
