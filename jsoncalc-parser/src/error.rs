//! Tokenizer and parser error types

use crate::combinator::CombinatorError;
use thiserror::Error;

/// Errors raised while turning source text into tokens.
///
/// All parse-layer errors are `Clone` so cached outcomes can be handed back
/// verbatim on a repeat parse of the same text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    /// No lexer matched at the current position.
    #[error("unrecognized input at {remainder:?}")]
    UnrecognizedInput {
        /// A short window of the text that could not be tokenized.
        remainder: String,
    },

    /// A repetition was built with `min > max`.
    #[error("invalid repetition bounds: min {min} exceeds max {max}")]
    InvalidRepetition {
        /// Requested minimum.
        min: usize,
        /// Requested maximum.
        max: usize,
    },
}

impl CombinatorError for LexError {
    fn invalid_repetition(min: usize, max: usize) -> Self {
        LexError::InvalidRepetition { min, max }
    }
}

/// Errors raised while parsing a token sequence into an AST.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Tokenization failed before the grammar ran.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The source text held no tokens at all.
    #[error("cannot parse an empty expression")]
    Empty,

    /// No grammar rule matched the start of the token sequence.
    #[error("cannot parse the expression")]
    Unmatched,

    /// The grammar matched a prefix but tokens were left over.
    #[error("unexpected trailing tokens: {tokens}")]
    TrailingTokens {
        /// The leftover tokens, re-rendered as text.
        tokens: String,
    },

    /// A repetition was built with `min > max`.
    #[error("invalid repetition bounds: min {min} exceeds max {max}")]
    InvalidRepetition {
        /// Requested minimum.
        min: usize,
        /// Requested maximum.
        max: usize,
    },
}

impl CombinatorError for ParseError {
    fn invalid_repetition(min: usize, max: usize) -> Self {
        ParseError::InvalidRepetition { min, max }
    }
}
