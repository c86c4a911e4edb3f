//! # Error Types
//!
//! This module defines all error types for the chart core.
//!
//! Fatal parse errors carry location information (line/column within the
//! selected difficulty section) so chart authors can find and fix the
//! offending token.
//!
//! ## Error Types
//! - `ParseError` - Difficulty-section and tokenization errors
//! - `BuildError` - Structural errors found while resolving timing
//! - `ParseWarning` - Recoverable per-note issues, accumulated alongside
//!   a best-effort parse result instead of aborting it

use serde::Serialize;
use thiserror::Error;

/// Fatal errors produced while locating and tokenizing a difficulty section.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The requested difficulty id has no section in the chart text.
    ///
    /// Recoverable by the caller choosing another id, typically the highest
    /// one reported by the difficulty scanner.
    #[error("difficulty section {id} not found in chart text")]
    DifficultySectionMissing { id: u8 },

    /// A symbol outside the closed note vocabulary.
    ///
    /// Surfaced immediately rather than skipped: silently dropping unknown
    /// notation would present an incomplete chart as if it were correct.
    ///
    /// # Example
    /// ```
    /// # use notechart::ParseError;
    /// let err = ParseError::UnrecognizedToken {
    ///     line: 2,
    ///     column: 7,
    ///     symbol: "X".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "unrecognized token 'X' at line 2, column 7");
    /// ```
    #[error("unrecognized token '{symbol}' at line {line}, column {column}")]
    UnrecognizedToken {
        line: usize,
        column: usize,
        symbol: String,
    },
}

/// Errors produced while resolving a parsed section into chart data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A structurally valid section that yields zero notes.
    ///
    /// Distinct from [`ParseError::DifficultySectionMissing`] so the caller
    /// can show "nothing to play" rather than "wrong difficulty".
    #[error("chart section contains no notes")]
    EmptyChart,
}

/// Either stage of the text-to-chart pipeline failing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Recoverable per-note issue, accumulated during parsing.
///
/// Warnings never abort the parse; the affected note degrades instead
/// (e.g. a hold with a malformed length suffix keeps a duration of zero).
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ParseWarning {
    #[error("malformed modifier at line {line}, column {column}: {detail}")]
    MalformedModifier {
        line: usize,
        column: usize,
        detail: String,
    },
}
