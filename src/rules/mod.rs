// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Chess rules seam.
//!
//! The codec never inspects chess positions itself. It only needs to
//! enumerate legal moves in a stable order, play one, ask whether the game is
//! over, and convert moves to and from SAN. [`Board`] captures exactly that;
//! [`StandardBoard`] implements it on top of `shakmaty`.

pub mod standard;

pub use standard::StandardBoard;

use core::fmt::Debug;

/// A mutable chess position driven by the game sequencer.
///
/// `legal_moves` must enumerate moves in the same order for the same position
/// every time it is called; the deterministic shuffle is applied on top of
/// that order, so an engine whose enumeration order changes breaks decoding.
pub trait Board {
    /// Engine move type, compared by value when locating a played move.
    type Move: Clone + PartialEq + Debug;

    /// All legal moves from the current position, in engine order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Play a legal move.
    fn play(&mut self, mv: &Self::Move);

    /// Checkmate, stalemate, or any other position with no continuation.
    fn is_game_over(&self) -> bool;

    /// Neither side has enough material to mate.
    fn is_insufficient_material(&self) -> bool;

    /// A draw could be claimed (threefold repetition or fifty-move rule).
    fn can_claim_draw(&self) -> bool;

    /// Return to the standard initial position, forgetting all history.
    fn reset(&mut self);

    /// Plies played since the last reset.
    fn ply_count(&self) -> usize;

    /// SAN for a legal move in the current position.
    fn to_san(&self, mv: &Self::Move) -> String;

    /// Parse SAN into a legal move of the current position.
    fn parse_san(&self, san: &str) -> Option<Self::Move>;

    /// Any engine-reported reason to stop the current game.
    fn is_terminal(&self) -> bool {
        self.is_game_over() || self.is_insufficient_material() || self.can_claim_draw()
    }
}
