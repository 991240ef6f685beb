// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Game records and their PGN tag mapping.
//!
//! A [`GameRecord`] is one encoded game: the caller's descriptive headers, the
//! seed that drives its move shuffle, the optional expiry time and the SAN
//! moves. Only `Seed` and `ExpiryTime` matter for decoding; everything else is
//! cosmetic and can be edited freely without affecting the payload.

use serde::{Deserialize, Serialize};

use crate::pgn::{self, PgnGame, RESULT_TOKENS};
use crate::stego::error::{InputError, StegoError};

/// Seed assumed for a game without a `Seed` header.
pub const DEFAULT_SEED: u64 = 1;

/// PGN tag names used by the codec.
pub const TAG_SEED: &str = "Seed";
pub const TAG_EXPIRY: &str = "ExpiryTime";

/// Descriptive PGN headers shared by every game of an encoded set.
///
/// `None` (or an empty string) writes the PGN placeholder for the Seven Tag
/// Roster fields and omits the optional ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameHeaders {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub round: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub white_elo: Option<String>,
    pub black_elo: Option<String>,
    pub result: Option<String>,
    pub eco: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl GameHeaders {
    /// Seven Tag Roster, then the optional tags, as `(tag, value)` pairs.
    fn tag_pairs(&self) -> Vec<(&'static str, String)> {
        let roster = [
            ("Event", &self.event, "?"),
            ("Site", &self.site, "?"),
            ("Date", &self.date, "????.??.??"),
            ("Round", &self.round, "?"),
            ("White", &self.white, "?"),
            ("Black", &self.black, "?"),
            ("Result", &self.result, "*"),
        ];
        let optional = [
            ("WhiteElo", &self.white_elo),
            ("BlackElo", &self.black_elo),
            ("ECO", &self.eco),
        ];

        let mut pairs: Vec<(&'static str, String)> = roster
            .iter()
            .map(|(tag, value, default)| (*tag, non_empty(value).unwrap_or(*default).to_string()))
            .collect();
        pairs.extend(
            optional
                .iter()
                .filter_map(|(tag, value)| non_empty(value).map(|v| (*tag, v.to_string()))),
        );
        pairs
    }

    /// Read known tags back; PGN placeholders become `None`.
    fn from_pgn(game: &PgnGame) -> Self {
        let read = |tag: &str, placeholder: &str| {
            game.tag(tag)
                .filter(|v| !v.is_empty() && *v != placeholder)
                .map(str::to_string)
        };
        Self {
            event: read("Event", "?"),
            site: read("Site", "?"),
            date: read("Date", "????.??.??"),
            round: read("Round", "?"),
            white: read("White", "?"),
            black: read("Black", "?"),
            white_elo: read("WhiteElo", ""),
            black_elo: read("BlackElo", ""),
            result: read("Result", "*"),
            eco: read("ECO", ""),
        }
    }
}

/// One game of an encoded set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub headers: GameHeaders,
    /// Seed of the game's move shuffler.
    pub seed: u64,
    /// Absolute expiry, Unix seconds.
    pub expiry_time: Option<u64>,
    /// Mainline in SAN.
    pub moves: Vec<String>,
}

impl GameRecord {
    /// Convert to a PGN game (tags plus movetext).
    pub fn to_pgn(&self) -> PgnGame {
        let mut game = PgnGame::default();
        for (tag, value) in self.headers.tag_pairs() {
            game.push_tag(tag, value);
        }
        game.push_tag(TAG_SEED, self.seed.to_string());
        if let Some(expiry) = self.expiry_time {
            game.push_tag(TAG_EXPIRY, expiry.to_string());
        }
        game.moves = self.moves.clone();
        // Free-form results stay in the tag; movetext only takes a real token.
        let result = non_empty(&self.headers.result)
            .filter(|r| RESULT_TOKENS.contains(r))
            .unwrap_or("*");
        game.result = Some(result.to_string());
        game
    }

    /// Build a record from the `index`-th game of a PGN document.
    ///
    /// A missing `Seed` defaults to [`DEFAULT_SEED`]. `ExpiryTime` is parsed
    /// strictly only for the first game, since that is the only one consulted.
    pub fn from_pgn(index: usize, game: &PgnGame) -> Result<Self, StegoError> {
        let seed: u64 = match game.tag(TAG_SEED) {
            None => DEFAULT_SEED,
            Some(raw) => raw.trim().parse().map_err(|_| StegoError::Seed {
                game: index,
                value: raw.to_string(),
            })?,
        };

        let expiry_time: Option<u64> = match game.tag(TAG_EXPIRY) {
            None => None,
            Some(raw) if index == 0 => Some(raw.trim().parse().map_err(|_| {
                StegoError::InvalidExpiry { value: raw.to_string() }
            })?),
            Some(raw) => raw.trim().parse().ok(),
        };

        Ok(Self {
            headers: GameHeaders::from_pgn(game),
            seed,
            expiry_time,
            moves: game.moves.clone(),
        })
    }
}

/// Serialize a game set into one PGN document.
pub fn games_to_pgn(games: &[GameRecord]) -> String {
    let pgn_games: Vec<PgnGame> = games.iter().map(GameRecord::to_pgn).collect();
    pgn::write_games(&pgn_games)
}

/// Parse a PGN document into a game set.
///
/// # Errors
/// - [`InputError::EmptyPgn`] for blank input, [`InputError::NoGames`] when no
///   game is found.
/// - [`StegoError::Pgn`] for malformed PGN.
/// - [`StegoError::Seed`] / [`StegoError::InvalidExpiry`] for bad headers.
pub fn games_from_pgn(text: &str) -> Result<Vec<GameRecord>, StegoError> {
    if text.trim().is_empty() {
        return Err(InputError::EmptyPgn.into());
    }
    let games = pgn::read_games(text)?;
    if games.is_empty() {
        return Err(InputError::NoGames.into());
    }
    games
        .iter()
        .enumerate()
        .map(|(i, g)| GameRecord::from_pgn(i, g))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GameRecord {
        GameRecord {
            headers: GameHeaders {
                event: Some("Club night".into()),
                white: Some("Alice".into()),
                black_elo: Some("1850".into()),
                ..GameHeaders::default()
            },
            seed: 424_242,
            expiry_time: Some(1_900_000_000),
            moves: vec!["e4".into(), "e5".into()],
        }
    }

    #[test]
    fn tag_order_and_defaults() {
        let pgn = record().to_pgn();
        let keys: Vec<&str> = pgn.tags.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Event", "Site", "Date", "Round", "White", "Black", "Result", "BlackElo", "Seed", "ExpiryTime"]
        );
        assert_eq!(pgn.tag("Site"), Some("?"));
        assert_eq!(pgn.tag("Date"), Some("????.??.??"));
        assert_eq!(pgn.tag("Result"), Some("*"));
        assert_eq!(pgn.tag("Seed"), Some("424242"));
        assert_eq!(pgn.result.as_deref(), Some("*"));
    }

    #[test]
    fn pgn_roundtrip() {
        let games = vec![record(), GameRecord { seed: 9, expiry_time: None, ..record() }];
        let parsed = games_from_pgn(&games_to_pgn(&games)).unwrap();
        assert_eq!(parsed, games);
    }

    #[test]
    fn empty_strings_are_placeholders() {
        let mut rec = record();
        rec.headers.site = Some(String::new());
        rec.headers.eco = Some(String::new());
        let pgn = rec.to_pgn();
        assert_eq!(pgn.tag("Site"), Some("?"));
        assert_eq!(pgn.tag("ECO"), None);
    }

    #[test]
    fn free_form_result_kept_out_of_movetext() {
        let mut rec = record();
        rec.headers.result = Some("White wins".into());
        let pgn = rec.to_pgn();
        assert_eq!(pgn.tag("Result"), Some("White wins"));
        assert_eq!(pgn.result.as_deref(), Some("*"));

        let parsed = games_from_pgn(&games_to_pgn(&[rec.clone()])).unwrap();
        assert_eq!(parsed, vec![rec]);

        let mut decisive = record();
        decisive.headers.result = Some("0-1".into());
        assert_eq!(decisive.to_pgn().result.as_deref(), Some("0-1"));
    }

    #[test]
    fn missing_seed_defaults_to_one() {
        let games = games_from_pgn("[Event \"?\"]\n\n1. e4 *\n").unwrap();
        assert_eq!(games[0].seed, DEFAULT_SEED);
        assert_eq!(games[0].expiry_time, None);
    }

    #[test]
    fn non_integer_seed_rejected() {
        let text = "[Seed \"7\"]\n\n1. e4 *\n\n[Seed \"seven\"]\n\n1. d4 *\n";
        match games_from_pgn(text) {
            Err(StegoError::Seed { game, value }) => {
                assert_eq!(game, 1);
                assert_eq!(value, "seven");
            }
            other => panic!("expected Seed error, got {other:?}"),
        }
    }

    #[test]
    fn negative_seed_rejected() {
        match games_from_pgn("[Seed \"-5\"]\n\n1. e4 *\n") {
            Err(e @ StegoError::Seed { .. }) => assert!(e.to_string().contains("out of range")),
            other => panic!("expected Seed error, got {other:?}"),
        }
    }

    #[test]
    fn expiry_parsed_strictly_on_first_game_only() {
        let bad_first = "[ExpiryTime \"soon\"]\n\n1. e4 *\n";
        assert!(matches!(games_from_pgn(bad_first), Err(StegoError::InvalidExpiry { .. })));

        let bad_second = "[ExpiryTime \"10\"]\n\n1. e4 *\n\n[ExpiryTime \"soon\"]\n\n1. d4 *\n";
        let games = games_from_pgn(bad_second).unwrap();
        assert_eq!(games[0].expiry_time, Some(10));
        assert_eq!(games[1].expiry_time, None);
    }

    #[test]
    fn empty_inputs() {
        assert!(matches!(games_from_pgn(""), Err(StegoError::Input(InputError::EmptyPgn))));
        assert!(matches!(games_from_pgn(" \n\t"), Err(StegoError::Input(InputError::EmptyPgn))));
        assert!(matches!(
            games_from_pgn("; only a comment\n"),
            Err(StegoError::Input(InputError::NoGames))
        ));
    }

    #[test]
    fn headers_from_toml() {
        let headers: GameHeaders = toml::from_str(
            "event = \"Open\"\nwhite = \"A\"\nblack_elo = \"2100\"\n",
        )
        .unwrap();
        assert_eq!(headers.event.as_deref(), Some("Open"));
        assert_eq!(headers.black_elo.as_deref(), Some("2100"));
        assert_eq!(headers.site, None);

        let typo: Result<GameHeaders, _> = toml::from_str("evnet = \"Open\"\n");
        assert!(typo.is_err(), "unknown header keys must be rejected");
    }
}
