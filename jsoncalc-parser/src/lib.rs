//! Parser for jsoncalc expressions
//!
//! The pipeline is two passes of the same combinator framework: the
//! [`lexer`] runs it over source text to produce a [`token::Token`]
//! sequence, the [`grammar`] runs it over that sequence to produce a
//! [`jsoncalc_ast::CalcNode`]. The top-level entry points in [`cache`] add a
//! source-text memo so repeated parses of identical text return the same
//! shared tree.

#![warn(missing_docs)]

pub mod cache;
pub mod combinator;
mod error;
pub mod grammar;
pub mod lexer;
pub mod token;

pub use cache::{parse, parse_uncached, ParseCache};
pub use error::{LexError, ParseError};
pub use grammar::parse_tokens;
pub use lexer::tokenize;
