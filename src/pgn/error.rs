// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for PGN parsing.

use std::fmt;

/// Errors that can occur while reading PGN text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    /// A tag pair (`[Key "Value"]`) is not closed before the end of input.
    UnterminatedTag { line: usize },
    /// A tag pair does not follow the `[Symbol "String"]` shape.
    MalformedTag { line: usize },
    /// A `{` comment is not closed before the end of input.
    UnterminatedComment { line: usize },
    /// A `(` variation is not closed, or a `)` has no matching `(`.
    UnbalancedVariation { line: usize },
}

impl fmt::Display for PgnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedTag { line } => write!(f, "unterminated tag pair on line {line}"),
            Self::MalformedTag { line } => write!(f, "malformed tag pair on line {line}"),
            Self::UnterminatedComment { line } => write!(f, "unterminated comment starting on line {line}"),
            Self::UnbalancedVariation { line } => write!(f, "unbalanced variation on line {line}"),
        }
    }
}

impl std::error::Error for PgnError {}

pub type Result<T> = std::result::Result<T, PgnError>;
