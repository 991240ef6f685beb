// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! PGN tokenizer and multi-game reader.
//!
//! Works on the raw bytes of the input. Every delimiter PGN uses is ASCII, so
//! slicing at delimiter positions never splits a UTF-8 sequence.

use super::error::{PgnError, Result};
use super::{PgnGame, RESULT_TOKENS};

/// Lexical tokens that matter for game records.
#[derive(Debug, PartialEq, Eq)]
enum Token {
    Tag(String, String),
    San(String),
    Result(String),
}

struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self { data: text.as_bytes(), pos: 0, line: 1 }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.data[self.pos - 1] == b'\n'
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn skip_line(&mut self) {
        while let Some(b) = self.bump() {
            if b == b'\n' {
                break;
            }
        }
    }

    fn skip_comment(&mut self) -> Result<()> {
        let line = self.line;
        self.bump(); // '{'
        loop {
            match self.bump() {
                Some(b'}') => return Ok(()),
                Some(_) => {}
                None => return Err(PgnError::UnterminatedComment { line }),
            }
        }
    }

    fn skip_variation(&mut self) -> Result<()> {
        let line = self.line;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Some(b'(') => {
                    depth += 1;
                    self.bump();
                }
                Some(b')') => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(b'{') => self.skip_comment()?,
                Some(b';') => self.skip_line(),
                Some(_) => {
                    self.bump();
                }
                None => return Err(PgnError::UnbalancedVariation { line }),
            }
        }
    }

    fn read_tag(&mut self) -> Result<Token> {
        let line = self.line;
        self.bump(); // '['
        self.skip_whitespace();

        let key_start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            self.bump();
        }
        if self.pos == key_start {
            return Err(PgnError::MalformedTag { line });
        }
        let key = String::from_utf8_lossy(&self.data[key_start..self.pos]).into_owned();

        self.skip_whitespace();
        if self.bump() != Some(b'"') {
            return Err(PgnError::MalformedTag { line });
        }

        let mut value = Vec::new();
        loop {
            match self.bump() {
                Some(b'\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(PgnError::UnterminatedTag { line }),
                },
                Some(b'"') => break,
                Some(b) => value.push(b),
                None => return Err(PgnError::UnterminatedTag { line }),
            }
        }

        self.skip_whitespace();
        match self.bump() {
            Some(b']') => {}
            Some(_) => return Err(PgnError::MalformedTag { line }),
            None => return Err(PgnError::UnterminatedTag { line }),
        }

        Ok(Token::Tag(key, String::from_utf8_lossy(&value).into_owned()))
    }

    fn read_symbol(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b"{}()[];$".contains(&b) {
                break;
            }
            self.bump();
        }
        // Delimiters are ASCII, so the slice boundaries are char boundaries.
        std::str::from_utf8(&self.data[start..self.pos]).unwrap_or("")
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            if self.at_line_start() && self.peek() == Some(b'%') {
                self.skip_line();
                continue;
            }
            let Some(b) = self.peek() else {
                return Ok(None);
            };
            match b {
                b if b.is_ascii_whitespace() => {
                    self.bump();
                }
                b';' => self.skip_line(),
                b'{' => self.skip_comment()?,
                b'(' => self.skip_variation()?,
                b')' => return Err(PgnError::UnbalancedVariation { line: self.line }),
                b'[' => return self.read_tag().map(Some),
                b'$' => {
                    self.bump();
                    while matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                        self.bump();
                    }
                }
                _ => {
                    let symbol = self.read_symbol();
                    if symbol.is_empty() {
                        // Stray ']' or a non-UTF-8 fragment: drop one byte.
                        self.bump();
                        continue;
                    }
                    if RESULT_TOKENS.contains(&symbol) {
                        return Ok(Some(Token::Result(symbol.to_string())));
                    }
                    if let Some(san) = strip_move_number(symbol) {
                        let san = san.trim_end_matches(['!', '?']);
                        if !san.is_empty() {
                            return Ok(Some(Token::San(san.to_string())));
                        }
                    }
                }
            }
        }
    }
}

/// Strip a leading move number (`12.`, `12...`) from a movetext symbol.
///
/// Returns `None` for a bare move number or ellipsis.
fn strip_move_number(symbol: &str) -> Option<&str> {
    let rest = symbol.trim_start_matches(|c: char| c.is_ascii_digit());
    let had_digits = rest.len() != symbol.len();
    let after_dots = rest.trim_start_matches('.');
    if had_digits && after_dots.len() == rest.len() {
        // Digits without a dot are not a move number; pass through unchanged.
        return Some(symbol);
    }
    if after_dots.is_empty() {
        None
    } else {
        Some(after_dots)
    }
}

/// Read every game in a PGN document.
///
/// A game ends at its result token, or implicitly when a new tag section
/// starts after movetext. Trailing movetext without a result is kept as a
/// final game.
pub fn read_games(text: &str) -> Result<Vec<PgnGame>> {
    let mut lexer = Lexer::new(text);
    let mut games = Vec::new();
    let mut current = PgnGame::default();
    let mut in_movetext = false;

    while let Some(token) = lexer.next_token()? {
        match token {
            Token::Tag(key, value) => {
                if in_movetext {
                    games.push(std::mem::take(&mut current));
                    in_movetext = false;
                }
                current.tags.push((key, value));
            }
            Token::San(san) => {
                in_movetext = true;
                current.moves.push(san);
            }
            Token::Result(result) => {
                current.result = Some(result);
                games.push(std::mem::take(&mut current));
                in_movetext = false;
            }
        }
    }

    if in_movetext || !current.tags.is_empty() {
        games.push(current);
    }
    Ok(games)
}
