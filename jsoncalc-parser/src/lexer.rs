//! Tokenizer: source text to a flat token sequence
//!
//! Each token class is itself a combinator over `&str`. The classes are tried
//! in a fixed order at every position, whitespace is trimmed between tokens,
//! and any position no class matches is a hard [`LexError`].

use crate::combinator::{alt, matched, no_match, ParseOutcome, Parser};
use crate::error::LexError;
use crate::token::{SpChar, Token};
use jsoncalc_model::Value;
use once_cell::sync::Lazy;
use regex::Regex;

type LexOutcome<'s> = ParseOutcome<&'s str, Token, LexError>;

static NUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+\.\d+(?:e[+-]?\d+)?|(?:0[xbo])?\d+)").unwrap());
static PROP_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][0-9A-Za-z_]*").unwrap());
static VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$[$#]?[0-9A-Za-z_]+").unwrap());
static FN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@#?[A-Za-z_][0-9A-Za-z_]*(?:\.[0-9A-Za-z_]+)?").unwrap());
static LAMBDA_VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Za-z_]+").unwrap());

/// Numeric value of a matched number literal, with JavaScript's `Number()`
/// reading of `0x` / `0o` / `0b` prefixes.
fn number_value(text: &str) -> f64 {
    if text.contains('.') {
        return text.parse().unwrap_or(f64::NAN);
    }
    let radix = match text.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => match u64::from_str_radix(&text[2..], radix) {
            Ok(n) => n as f64,
            Err(_) => f64::NAN,
        },
        None => text.parse().unwrap_or(f64::NAN),
    }
}

fn lex_num(stream: &str) -> LexOutcome<'_> {
    match NUM_RE.find(stream) {
        Some(m) => matched(
            &stream[m.end()..],
            Token::Value(Value::Number(number_value(m.as_str()))),
        ),
        None => no_match(),
    }
}

/// String literal: single or double quoted, with the closing quote doubled to
/// escape it (`"a""b"` reads as `a"b`). Empty literals do not lex.
fn lex_str(stream: &str) -> LexOutcome<'_> {
    let quote = match stream.chars().next() {
        Some(c @ ('"' | '\'')) => c,
        _ => return no_match(),
    };
    let body = &stream[quote.len_utf8()..];
    let mut content = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((at, c)) = chars.next() {
        if c != quote {
            content.push(c);
            continue;
        }
        if let Some(&(_, next)) = chars.peek() {
            if next == quote {
                content.push(quote);
                chars.next();
                continue;
            }
        }
        if content.is_empty() {
            return no_match();
        }
        return matched(&body[at + quote.len_utf8()..], Token::Value(Value::String(content)));
    }
    // unterminated
    no_match()
}

fn lex_prop_name(stream: &str) -> LexOutcome<'_> {
    match PROP_NAME_RE.find(stream) {
        Some(m) => matched(&stream[m.end()..], Token::PropName { name: m.as_str().to_string() }),
        None => no_match(),
    }
}

fn lex_fn(stream: &str) -> LexOutcome<'_> {
    match FN_RE.find(stream) {
        Some(m) => matched(&stream[m.end()..], Token::Fn { name: m.as_str().to_string() }),
        None => no_match(),
    }
}

/// `$name` lexes to the environment key `name`; a secondary sigil survives,
/// so `$$g` keys on `$g` and `$#t` on `#t`.
fn lex_var(stream: &str) -> LexOutcome<'_> {
    match VAR_RE.find(stream) {
        Some(m) => matched(&stream[m.end()..], Token::Var { name: m.as_str()[1..].to_string() }),
        None => no_match(),
    }
}

fn lex_lambda_var(stream: &str) -> LexOutcome<'_> {
    match LAMBDA_VAR_RE.find(stream) {
        Some(m) => {
            matched(&stream[m.end()..], Token::LambdaVar { name: m.as_str()[1..].to_string() })
        }
        None => no_match(),
    }
}

/// Longest-first scan of [`SpChar::ALL`].
fn lex_sp_char(stream: &str) -> LexOutcome<'_> {
    for ch in SpChar::ALL {
        if let Some(rest) = stream.strip_prefix(ch.as_str()) {
            return matched(rest, Token::SpChar(ch));
        }
    }
    no_match()
}

fn remainder_preview(rest: &str) -> String {
    rest.chars().take(24).collect()
}

/// Tokenize a whole source string.
///
/// Whitespace separates tokens and is otherwise ignored. Returns a hard error
/// quoting the offending position if any part of the input fails to lex.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let lexer =
        alt((lex_num, lex_str, lex_prop_name, lex_fn, lex_var, lex_lambda_var, lex_sp_char));
    let mut tokens = Vec::new();
    let mut rest = source.trim_start();
    while !rest.is_empty() {
        match lexer.parse(rest)? {
            Some((next, token)) => {
                tokens.push(token);
                rest = next.trim_start();
            }
            None => {
                return Err(LexError::UnrecognizedInput { remainder: remainder_preview(rest) })
            }
        }
    }
    log::trace!("tokenized {} tokens from {} bytes", tokens.len(), source.len());
    Ok(tokens)
}
