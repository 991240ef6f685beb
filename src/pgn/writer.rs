// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! PGN export.
//!
//! Produces export-style PGN: one tag pair per line, a blank line, then the
//! numbered movetext wrapped at [`MAX_LINE_LEN`] columns and terminated by the
//! result token.

use super::PgnGame;

/// Maximum movetext line length.
pub const MAX_LINE_LEN: usize = 80;

fn escape_tag_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Append one game to `out`.
pub fn write_game(game: &PgnGame, out: &mut String) {
    for (key, value) in &game.tags {
        out.push('[');
        out.push_str(key);
        out.push_str(" \"");
        out.push_str(&escape_tag_value(value));
        out.push_str("\"]\n");
    }
    out.push('\n');

    let result = game.result.as_deref().unwrap_or("*");
    let mut line = String::new();
    let mut push_token = |token: &str, out: &mut String| {
        if !line.is_empty() && line.len() + 1 + token.len() > MAX_LINE_LEN {
            out.push_str(&line);
            out.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(token);
    };

    for (ply, san) in game.moves.iter().enumerate() {
        if ply % 2 == 0 {
            push_token(&format!("{}.", ply / 2 + 1), out);
        }
        push_token(san, out);
    }
    push_token(result, out);

    out.push_str(&line);
    out.push('\n');
}

/// Serialize a list of games into one PGN document, separated by blank lines.
pub fn write_games(games: &[PgnGame]) -> String {
    let mut out = String::new();
    for (i, game) in games.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_game(game, &mut out);
    }
    out
}
