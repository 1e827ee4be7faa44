//! The combined error surface of the engine

use jsoncalc_evaluator::RuntimeError;
use jsoncalc_parser::ParseError;
use thiserror::Error;

/// Anything that can go wrong between source text and a normal form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// The text failed to tokenize or parse.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The tree failed to evaluate.
    #[error("evaluation error: {0}")]
    Runtime(#[from] RuntimeError),
}
