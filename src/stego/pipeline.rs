// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Encode/decode pipeline.
//!
//! Encoding:
//! 1. Wrap the payload in a frame (start marker, payload bits, end marker).
//! 2. Play games whose move choices spell out the frame bits.
//! 3. Stamp every game with its seed, the shared headers and the optional
//!    expiry, and serialize the set as PGN.
//!
//! Decoding reverses this: parse the PGN, refuse expired sets, replay every
//! game with its seed to recover the bits, then locate the frame.

use std::fs;
use std::path::Path;
use std::time::Duration;

use rand::Rng;

use crate::rules::StandardBoard;
use crate::stego::error::{InputError, StegoError};
use crate::stego::expiry::{self, check_expiry, expiry_from_timer};
use crate::stego::frame;
use crate::stego::metadata::{self, GameHeaders, GameRecord};
use crate::stego::output::{self, OutputFile};
use crate::stego::sequencer::{self, SequencerConfig, MAX_PLIES};

/// Caller-facing encode settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Descriptive headers copied onto every game.
    pub headers: GameHeaders,
    /// Self-destruct timer, measured from the start of encoding.
    pub self_destruct: Option<Duration>,
    /// Ply cap per game.
    pub max_plies: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            headers: GameHeaders::default(),
            self_destruct: None,
            max_plies: MAX_PLIES,
        }
    }
}

/// Encode `payload` into a PGN document.
///
/// Seeds come from the thread RNG and the expiry (if any) is measured from
/// the current system time, so two calls produce different games.
///
/// # Errors
/// - [`InputError::EmptyPayload`] if `payload` is empty.
/// - [`StegoError::DeadPosition`] / [`StegoError::Move`] from the sequencer.
pub fn encode(payload: &[u8], opts: &EncodeOptions) -> Result<String, StegoError> {
    let games = encode_games(payload, opts, &mut rand::thread_rng(), expiry::unix_now())?;
    Ok(metadata::games_to_pgn(&games))
}

/// Encode `payload` into a game set with explicit seed source and clock.
///
/// Identical `seeds` state and `now` give identical games.
pub fn encode_games<R: Rng + ?Sized>(
    payload: &[u8],
    opts: &EncodeOptions,
    seeds: &mut R,
    now: u64,
) -> Result<Vec<GameRecord>, StegoError> {
    if payload.is_empty() {
        return Err(InputError::EmptyPayload.into());
    }

    let bits = frame::build_frame(payload);
    let config = SequencerConfig {
        headers: opts.headers.clone(),
        expiry_time: expiry_from_timer(now, opts.self_destruct),
        max_plies: opts.max_plies,
    };

    let games = sequencer::encode_games(&mut StandardBoard::new(), &bits, seeds, &config)?;
    tracing::info!(
        bytes = payload.len(),
        bits = bits.len(),
        games = games.len(),
        expiry = ?config.expiry_time,
        "encoded payload"
    );
    Ok(games)
}

/// Decode a PGN document produced by [`encode`].
pub fn decode(pgn: &str) -> Result<Vec<u8>, StegoError> {
    decode_at(pgn, expiry::unix_now())
}

/// Decode with an explicit current time (Unix seconds).
///
/// # Errors
/// - [`InputError::EmptyPgn`] / [`InputError::NoGames`] for blank input.
/// - [`StegoError::Pgn`], [`StegoError::Seed`], [`StegoError::InvalidExpiry`]
///   for malformed records.
/// - [`StegoError::Expired`] if the first game's expiry has passed. Checked
///   before any move is replayed.
/// - [`StegoError::Move`] if a move cannot be reproduced.
/// - [`StegoError::Frame`] if the recovered bits hold no frame.
pub fn decode_at(pgn: &str, now: u64) -> Result<Vec<u8>, StegoError> {
    let games = metadata::games_from_pgn(pgn)?;
    check_expiry(games.first().and_then(|g| g.expiry_time), now)?;

    let bits = sequencer::decode_games::<StandardBoard>(&games)?;
    let parsed = frame::parse_frame(&bits)?;
    if parsed.residue_bits != 0 {
        tracing::warn!(
            residue_bits = parsed.residue_bits,
            start = parsed.start,
            end = parsed.end,
            "frame not byte aligned, input may be truncated or altered"
        );
    }

    tracing::info!(games = games.len(), bits = bits.len(), bytes = parsed.payload.len(), "decoded payload");
    Ok(parsed.payload)
}

/// Encode the file at `input` and write the PGN to `output`.
///
/// Returns the number of games written. On error nothing is left at
/// `output`.
pub fn encode_file(input: &Path, output: &Path, opts: &EncodeOptions) -> Result<usize, StegoError> {
    write_output(output, || {
        let payload = read_source(input)?;
        let games = encode_games(&payload, opts, &mut rand::thread_rng(), expiry::unix_now())?;
        Ok((metadata::games_to_pgn(&games).into_bytes(), games.len()))
    })
}

/// Decode the PGN file at `input` and write the payload to `output`.
///
/// Returns the payload length.
pub fn decode_file(input: &Path, output: &Path) -> Result<usize, StegoError> {
    decode_file_at(input, output, expiry::unix_now())
}

/// [`decode_file`] with an explicit current time.
pub fn decode_file_at(input: &Path, output: &Path, now: u64) -> Result<usize, StegoError> {
    write_output(output, || {
        let bytes = read_source(input)?;
        let text = String::from_utf8_lossy(&bytes);
        let payload = decode_at(&text, now)?;
        let len = payload.len();
        Ok((payload, len))
    })
}

fn read_source(path: &Path) -> Result<Vec<u8>, StegoError> {
    if !path.is_file() {
        return Err(InputError::MissingFile(path.display().to_string()).into());
    }
    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read source");
    Ok(bytes)
}

/// Run `produce` and commit its bytes to `target`. Any failure removes
/// `target`.
fn write_output<T, F>(target: &Path, produce: F) -> Result<T, StegoError>
where
    F: FnOnce() -> Result<(Vec<u8>, T), StegoError>,
{
    let result = produce().and_then(|(data, value)| {
        let mut out = OutputFile::create(target)?;
        out.write_all(&data)?;
        out.commit()?;
        Ok(value)
    });
    if let Err(e) = &result {
        tracing::debug!(path = %target.display(), error = %e, "discarding output");
        output::discard_stale(target);
    }
    result
}
