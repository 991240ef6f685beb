// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Standard chess backed by `shakmaty`.

use std::collections::HashMap;

use shakmaty::san::SanPlus;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Chess, EnPassantMode, Move, Position};

use super::Board;

/// Halfmove clock value at which the fifty-move rule can be claimed.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Occurrences of one position needed for a repetition claim.
const REPETITION_CLAIM: u32 = 3;

/// Standard chess position with the history needed for draw claims.
#[derive(Clone)]
pub struct StandardBoard {
    pos: Chess,
    plies: usize,
    /// Occurrence count per position, keyed by Zobrist hash.
    seen: HashMap<Zobrist64, u32>,
}

impl StandardBoard {
    /// A board at the standard initial position.
    pub fn new() -> Self {
        let mut board = Self {
            pos: Chess::default(),
            plies: 0,
            seen: HashMap::new(),
        };
        board.record_position();
        board
    }

    /// The underlying `shakmaty` position.
    pub fn position(&self) -> &Chess {
        &self.pos
    }

    fn position_hash(&self) -> Zobrist64 {
        self.pos.zobrist_hash(EnPassantMode::Legal)
    }

    fn record_position(&mut self) {
        *self.seen.entry(self.position_hash()).or_insert(0) += 1;
    }

    fn repetitions(&self) -> u32 {
        self.seen.get(&self.position_hash()).copied().unwrap_or(0)
    }
}

impl Default for StandardBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for StandardBoard {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        self.pos.legal_moves().into_iter().collect()
    }

    fn play(&mut self, mv: &Move) {
        self.pos.play_unchecked(mv);
        self.plies += 1;
        self.record_position();
    }

    fn is_game_over(&self) -> bool {
        self.pos.is_game_over()
    }

    fn is_insufficient_material(&self) -> bool {
        self.pos.is_insufficient_material()
    }

    fn can_claim_draw(&self) -> bool {
        self.pos.halfmoves() >= FIFTY_MOVE_HALFMOVES || self.repetitions() >= REPETITION_CLAIM
    }

    fn reset(&mut self) {
        self.pos = Chess::default();
        self.plies = 0;
        self.seen.clear();
        self.record_position();
    }

    fn ply_count(&self) -> usize {
        self.plies
    }

    fn to_san(&self, mv: &Move) -> String {
        SanPlus::from_move(self.pos.clone(), mv).to_string()
    }

    fn parse_san(&self, san: &str) -> Option<Move> {
        let san: SanPlus = san.parse().ok()?;
        san.san.to_move(&self.pos).ok()
    }
}
