// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Game sequencing: frame bits to a set of games and back.
//!
//! Encoding plays games move by move, letting the frame bits choose each move
//! through [`permute::encode_step`]. A game ends when the rules engine reports
//! a terminal position or the ply cap is reached; the next game starts from
//! the initial position with a fresh seed. Encoding stops as soon as every
//! frame bit has been consumed.
//!
//! Decoding replays each game against a fresh board with the game's own seed
//! and concatenates the recovered bits in game order.

use rand::Rng;

use crate::rules::Board;
use crate::stego::error::{MoveSelectorError, StegoError};
use crate::stego::metadata::{GameHeaders, GameRecord};
use crate::stego::permute::{self, MoveShuffler};

/// Default ply cap per game.
pub const MAX_PLIES: usize = 150;

/// Smallest seed drawn for a game.
pub const SEED_MIN: u64 = 1;
/// Largest seed drawn for a game.
pub const SEED_MAX: u64 = 1_000_000;

/// Per-set settings for the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Headers copied onto every game.
    pub headers: GameHeaders,
    /// Expiry stamped on every game.
    pub expiry_time: Option<u64>,
    /// A game is closed once it reaches this many plies.
    pub max_plies: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            headers: GameHeaders::default(),
            expiry_time: None,
            max_plies: MAX_PLIES,
        }
    }
}

/// Draw a game seed in `SEED_MIN..=SEED_MAX`.
pub fn draw_seed<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(SEED_MIN..=SEED_MAX)
}

/// The game currently being written.
struct GameInProgress {
    seed: u64,
    shuffler: MoveShuffler,
    moves: Vec<String>,
    /// Frame bit offset at which this game started.
    first_bit: usize,
}

impl GameInProgress {
    fn start<R: Rng + ?Sized>(seeds: &mut R, first_bit: usize) -> Self {
        let seed = draw_seed(seeds);
        tracing::debug!(seed, first_bit, "starting game");
        Self { seed, shuffler: MoveShuffler::new(seed), moves: Vec::new(), first_bit }
    }

    fn finish(self, number: usize, config: &SequencerConfig) -> GameRecord {
        let mut headers = config.headers.clone();
        if number > 1 && headers.round.is_none() {
            headers.round = Some(number.to_string());
        }
        tracing::debug!(game = number, seed = self.seed, plies = self.moves.len(), "finished game");
        GameRecord {
            headers,
            seed: self.seed,
            expiry_time: config.expiry_time,
            moves: self.moves,
        }
    }
}

/// Spread `frame_bits` over as many games as needed.
///
/// `board` is reset before use and left at the final position. Seeds are
/// drawn from `seeds`, one per game, so a seeded RNG makes the output fully
/// reproducible.
///
/// # Errors
/// - [`StegoError::DeadPosition`] if the initial position offers no move, or
///   a whole game ends without carrying a single bit.
/// - [`StegoError::Move`] if a move index falls outside the move list.
pub fn encode_games<B, R>(
    board: &mut B,
    frame_bits: &[u8],
    seeds: &mut R,
    config: &SequencerConfig,
) -> Result<Vec<GameRecord>, StegoError>
where
    B: Board,
    R: Rng + ?Sized,
{
    let _span = tracing::debug_span!("encode_games", bits = frame_bits.len()).entered();

    board.reset();
    let mut games = Vec::new();
    let mut game = GameInProgress::start(seeds, 0);
    let mut cursor = 0usize;

    while cursor < frame_bits.len() {
        let mut legal_moves = board.legal_moves();
        let candidates = legal_moves.len();

        let step = permute::encode_step(&mut legal_moves, &mut game.shuffler, &frame_bits[cursor..])
            .map_err(|source| StegoError::Move {
                game: games.len(),
                ply: board.ply_count(),
                mv: String::new(),
                source,
            })?;

        match step {
            Some((mv, used)) => {
                tracing::trace!(ply = board.ply_count(), candidates, used, "move");
                game.moves.push(board.to_san(&mv));
                board.play(&mv);
                cursor += used;
            }
            None if game.moves.is_empty() => return Err(StegoError::DeadPosition),
            None => {}
        }

        let terminal = candidates == 0
            || board.is_terminal()
            || board.ply_count() >= config.max_plies;
        if terminal {
            // Every game replays the same forced line from the initial
            // position, so a game that carried nothing never will.
            if cursor == game.first_bit {
                return Err(StegoError::DeadPosition);
            }
            games.push(game.finish(games.len() + 1, config));
            board.reset();
            if cursor >= frame_bits.len() {
                tracing::debug!(games = games.len(), "encoded frame");
                return Ok(games);
            }
            game = GameInProgress::start(seeds, cursor);
        }
    }

    if !game.moves.is_empty() {
        games.push(game.finish(games.len() + 1, config));
    }

    tracing::debug!(games = games.len(), "encoded frame");
    Ok(games)
}

/// Recover the bits carried by one game.
///
/// `index` is the game's position in the set and is only used for errors.
pub fn extract_game_bits<B: Board>(
    board: &mut B,
    index: usize,
    game: &GameRecord,
) -> Result<Vec<u8>, StegoError> {
    board.reset();
    let mut shuffler = MoveShuffler::new(game.seed);
    let mut bits = Vec::new();

    for (ply, san) in game.moves.iter().enumerate() {
        let mut legal_moves = board.legal_moves();
        let move_error = |source| StegoError::Move {
            game: index,
            ply,
            mv: san.clone(),
            source,
        };

        let played = board
            .parse_san(san)
            .ok_or_else(|| move_error(MoveSelectorError::MoveNotFound { candidates: legal_moves.len() }))?;
        let emitted = permute::decode_step(&mut legal_moves, &mut shuffler, &played, &mut bits)
            .map_err(move_error)?;
        tracing::trace!(game = index, ply, emitted, "move");
        board.play(&played);
    }

    tracing::debug!(game = index, seed = game.seed, bits = bits.len(), "extracted game");
    Ok(bits)
}

/// Recover the concatenated bits of a whole game set, in game order.
///
/// With the `parallel` feature the games are replayed concurrently; each game
/// gets its own board, so the result is identical.
pub fn decode_games<B: Board + Default>(games: &[GameRecord]) -> Result<Vec<u8>, StegoError> {
    let _span = tracing::debug_span!("decode_games", games = games.len()).entered();

    let per_game = extract_all::<B>(games)?;
    Ok(per_game.concat())
}

#[cfg(not(feature = "parallel"))]
fn extract_all<B: Board + Default>(games: &[GameRecord]) -> Result<Vec<Vec<u8>>, StegoError> {
    games
        .iter()
        .enumerate()
        .map(|(i, game)| extract_game_bits(&mut B::default(), i, game))
        .collect()
}

#[cfg(feature = "parallel")]
fn extract_all<B: Board + Default>(games: &[GameRecord]) -> Result<Vec<Vec<u8>>, StegoError> {
    use rayon::prelude::*;

    games
        .par_iter()
        .enumerate()
        .map(|(i, game)| extract_game_bits(&mut B::default(), i, game))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::StandardBoard;
    use crate::stego::frame;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// A scripted board: a fixed sequence of positions, each with a given
    /// number of legal moves. Moves are named `p<ply>m<index>`.
    #[derive(Clone, Default)]
    struct ScriptBoard {
        branching: Vec<usize>,
        ply: usize,
    }

    impl ScriptBoard {
        fn new(branching: &[usize]) -> Self {
            Self { branching: branching.to_vec(), ply: 0 }
        }

        fn count(&self) -> usize {
            self.branching.get(self.ply).copied().unwrap_or(0)
        }
    }

    impl Board for ScriptBoard {
        type Move = (usize, usize);

        fn legal_moves(&self) -> Vec<(usize, usize)> {
            (0..self.count()).map(|i| (self.ply, i)).collect()
        }
        fn play(&mut self, _mv: &(usize, usize)) {
            self.ply += 1;
        }
        fn is_game_over(&self) -> bool {
            self.count() == 0
        }
        fn is_insufficient_material(&self) -> bool {
            false
        }
        fn can_claim_draw(&self) -> bool {
            false
        }
        fn reset(&mut self) {
            self.ply = 0;
        }
        fn ply_count(&self) -> usize {
            self.ply
        }
        fn to_san(&self, mv: &(usize, usize)) -> String {
            format!("p{}m{}", mv.0, mv.1)
        }
        fn parse_san(&self, san: &str) -> Option<(usize, usize)> {
            let (ply, index) = san.strip_prefix('p')?.split_once('m')?;
            let mv = (ply.parse().ok()?, index.parse().ok()?);
            self.legal_moves().contains(&mv).then_some(mv)
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(2024)
    }

    #[test]
    fn forced_moves_carry_no_bits() {
        // 4 moves (2 bits), forced, forced, 4 moves (2 bits).
        let mut board = ScriptBoard::new(&[4, 1, 1, 4, 4, 4]);
        let bits = [1, 0, 0, 1];
        let games = encode_games(&mut board, &bits, &mut rng(), &SequencerConfig::default()).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].moves.len(), 4);
        assert_eq!(games[0].moves[1], "p1m0");
        assert_eq!(games[0].moves[2], "p2m0");

        let decoded = decode_games_with(&[4, 1, 1, 4, 4, 4], &games);
        assert_eq!(decoded, bits);
    }

    fn decode_games_with(branching: &[usize], games: &[GameRecord]) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, game) in games.iter().enumerate() {
            let mut board = ScriptBoard::new(branching);
            out.extend(extract_game_bits(&mut board, i, game).unwrap());
        }
        out
    }

    #[test]
    fn terminal_position_starts_new_game() {
        // Each game can hold two 1-bit plies before the script runs out.
        let branching = [2, 2];
        let mut board = ScriptBoard::new(&branching);
        let bits = [1, 1, 0, 1, 0];
        let games = encode_games(&mut board, &bits, &mut rng(), &SequencerConfig::default()).unwrap();
        assert_eq!(games.len(), 3);
        assert_eq!(games[2].moves.len(), 1);
        assert_eq!(decode_games_with(&branching, &games), bits);
    }

    #[test]
    fn ply_cap_starts_new_game() {
        let branching = [8; 10];
        let config = SequencerConfig { max_plies: 3, ..SequencerConfig::default() };
        let bits = vec![1u8; 3 * 3 * 2 + 1];
        let games = encode_games(&mut ScriptBoard::new(&branching), &bits, &mut rng(), &config).unwrap();
        assert_eq!(games.len(), 3);
        assert!(games.iter().all(|g| g.moves.len() <= 3));
        assert_eq!(&decode_games_with(&branching, &games)[..bits.len()], &bits[..]);
    }

    #[test]
    fn round_numbers_after_first_game() {
        let branching = [2];
        let bits = [1, 0, 1];
        let games = encode_games(&mut ScriptBoard::new(&branching), &bits, &mut rng(), &SequencerConfig::default())
            .unwrap();
        let rounds: Vec<Option<&str>> = games.iter().map(|g| g.headers.round.as_deref()).collect();
        assert_eq!(rounds, vec![None, Some("2"), Some("3")]);

        let config = SequencerConfig {
            headers: GameHeaders { round: Some("7".into()), ..GameHeaders::default() },
            expiry_time: Some(99),
            ..SequencerConfig::default()
        };
        let games = encode_games(&mut ScriptBoard::new(&branching), &bits, &mut rng(), &config).unwrap();
        assert!(games.iter().all(|g| g.headers.round.as_deref() == Some("7")));
        assert!(games.iter().all(|g| g.expiry_time == Some(99)));
    }

    #[test]
    fn seeds_are_drawn_per_game_in_range() {
        let games = encode_games(&mut ScriptBoard::new(&[2]), &[1, 0, 1, 1], &mut rng(), &SequencerConfig::default())
            .unwrap();
        assert_eq!(games.len(), 4);
        for g in &games {
            assert!((SEED_MIN..=SEED_MAX).contains(&g.seed));
        }
    }

    #[test]
    fn dead_initial_position_is_an_error() {
        let result = encode_games(&mut ScriptBoard::new(&[]), &[1], &mut rng(), &SequencerConfig::default());
        assert!(matches!(result, Err(StegoError::DeadPosition)));
    }

    #[test]
    fn forced_only_game_is_an_error() {
        let result = encode_games(&mut ScriptBoard::new(&[1, 1, 1]), &[1], &mut rng(), &SequencerConfig::default());
        assert!(matches!(result, Err(StegoError::DeadPosition)));
    }

    #[test]
    fn foreign_move_reports_position() {
        let branching = [4, 4, 4];
        let game = GameRecord {
            headers: GameHeaders::default(),
            seed: 5,
            expiry_time: None,
            moves: vec!["p0m1".into(), "p1m9".into()],
        };
        match extract_game_bits(&mut ScriptBoard::new(&branching), 3, &game) {
            Err(StegoError::Move { game, ply, mv, source }) => {
                assert_eq!(game, 3);
                assert_eq!(ply, 1);
                assert_eq!(mv, "p1m9");
                assert_eq!(source, MoveSelectorError::MoveNotFound { candidates: 4 });
            }
            other => panic!("expected Move error, got {other:?}"),
        }
    }

    #[test]
    fn standard_board_roundtrip() {
        let bits = frame::build_frame(b"sequencer");
        let mut board = StandardBoard::new();
        let games = encode_games(&mut board, &bits, &mut rng(), &SequencerConfig::default()).unwrap();
        let decoded = decode_games::<StandardBoard>(&games).unwrap();
        assert_eq!(&decoded[..bits.len()], &bits[..]);
        assert!(decoded[bits.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn wrong_seed_does_not_recover_frame() {
        let bits = frame::build_frame(b"seed matters");
        let mut games =
            encode_games(&mut StandardBoard::new(), &bits, &mut rng(), &SequencerConfig::default()).unwrap();
        games[0].seed = if games[0].seed == 1 { 2 } else { games[0].seed - 1 };
        match decode_games::<StandardBoard>(&games) {
            Ok(decoded) => assert_ne!(decoded.get(..bits.len()), Some(&bits[..])),
            Err(StegoError::Move { .. }) => {}
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
}
