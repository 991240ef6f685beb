// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Deterministic move selection.
//!
//! Each game owns one [`MoveShuffler`]: a ChaCha20 PRNG seeded from the
//! game's integer seed. At every position with two or more legal moves the
//! move list is Fisher-Yates shuffled with it, and the next
//! `floor(log2(n))` payload bits pick an index into the shuffled list.
//! Positions with at most one legal move carry no bits and do not touch the
//! PRNG. Encoder and decoder visit the same positions in the same order, so
//! their PRNG streams stay in lock-step.
//!
//! # Wire contract
//!
//! The shuffle is part of the encoded format. [`SHUFFLE_VERSION`] identifies
//! the algorithm below; any change to it must bump the version.
//!
//! The Fisher-Yates shuffle uses `u32` for `gen_range` (not `usize`) so the
//! PRNG consumes the same entropy on 32-bit and 64-bit targets.
//!
//! # Final partial chunk
//!
//! When fewer than `floor(log2(n))` bits remain, they fill the high end of the
//! index and the low end is zero. The decoder always emits the full-width
//! index, so the reconstructed stream is the original followed only by zero
//! bits, which never form an end marker.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::stego::error::MoveSelectorError;

/// Version of the shuffle algorithm implemented by [`MoveShuffler`].
pub const SHUFFLE_VERSION: u32 = 1;

/// Per-game deterministic shuffler.
pub struct MoveShuffler {
    rng: ChaCha20Rng,
}

impl MoveShuffler {
    /// Create the shuffler for a game seed.
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha20Rng::seed_from_u64(seed) }
    }

    /// Fisher-Yates shuffle `items` in place, advancing the PRNG.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        let n = items.len();
        for i in (1..n).rev() {
            let j = self.rng.gen_range(0..=(i as u32)) as usize;
            items.swap(i, j);
        }
    }
}

/// Bits a position with `n` legal moves can carry: `floor(log2(n))`, or 0 for
/// `n <= 1`.
pub fn branch_bits(n: usize) -> usize {
    if n < 2 {
        0
    } else {
        (usize::BITS - 1 - n.leading_zeros()) as usize
    }
}

/// Choose the move that encodes the next bits of `bits`.
///
/// `bits` is the unconsumed remainder of the frame. Returns the chosen move
/// and how many bits it consumed, or `None` if there are no legal moves.
/// With a single legal move that move is returned and no bits are consumed.
///
/// # Errors
/// [`MoveSelectorError::IndexOutOfRange`] if the index read from the stream
/// does not address a move. Cannot happen for `n >= 2` since
/// `2^floor(log2(n)) <= n`; checked so a broken invariant fails loudly.
pub fn encode_step<M: Clone>(
    legal_moves: &mut [M],
    shuffler: &mut MoveShuffler,
    bits: &[u8],
) -> Result<Option<(M, usize)>, MoveSelectorError> {
    if legal_moves.len() <= 1 {
        return Ok(legal_moves.first().map(|mv| (mv.clone(), 0)));
    }

    let max_bits = branch_bits(legal_moves.len());
    if max_bits == 0 {
        shuffler.shuffle(legal_moves);
        return Ok(Some((legal_moves[0].clone(), 0)));
    }

    let take = max_bits.min(bits.len());
    let mut index = 0usize;
    for &bit in &bits[..take] {
        index = (index << 1) | (bit & 1) as usize;
    }
    index <<= max_bits - take;

    if index >= legal_moves.len() {
        return Err(MoveSelectorError::IndexOutOfRange { index, len: legal_moves.len() });
    }

    shuffler.shuffle(legal_moves);
    Ok(Some((legal_moves[index].clone(), take)))
}

/// Recover the bits carried by `played` and append them to `out`.
///
/// Returns the number of bits appended.
///
/// # Errors
/// [`MoveSelectorError::MoveNotFound`] if `played` is not in `legal_moves`.
pub fn decode_step<M: PartialEq>(
    legal_moves: &mut [M],
    shuffler: &mut MoveShuffler,
    played: &M,
    out: &mut Vec<u8>,
) -> Result<usize, MoveSelectorError> {
    if legal_moves.len() <= 1 {
        return Ok(0);
    }

    shuffler.shuffle(legal_moves);
    let index = legal_moves
        .iter()
        .position(|mv| mv == played)
        .ok_or(MoveSelectorError::MoveNotFound { candidates: legal_moves.len() })?;

    let width = branch_bits(legal_moves.len());
    for bit_pos in (0..width).rev() {
        out.push(((index >> bit_pos) & 1) as u8);
    }
    Ok(width)
}
