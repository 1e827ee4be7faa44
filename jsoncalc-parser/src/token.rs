//! Token model produced by the tokenizer and consumed by the grammar

use jsoncalc_model::Value;
use std::fmt;

/// Punctuation and operator tokens.
///
/// [`SpChar::ALL`] lists every spelling longest-first, so the tokenizer can
/// match greedily by trying them in order: `===` is found before `==`, `@[`
/// before `@`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpChar {
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `**`
    Pow,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    Nullish,
    /// `=>`
    Arrow,
    /// `$(`
    CalcVarOpen,
    /// `@(`
    CalcFnOpen,
    /// `@[`
    ListOpen,
    /// `@{`
    RecordOpen,
    /// `@|`
    LambdaOpen,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `!`
    Bang,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `,`
    Comma,
    /// `|`
    Pipe,
    /// `@`
    At,
    /// `$`
    Dollar,
}

impl SpChar {
    /// Every spelling, ordered so that no entry is a prefix of an earlier one.
    pub const ALL: [SpChar; 36] = [
        SpChar::StrictEq,
        SpChar::StrictNe,
        SpChar::Eq,
        SpChar::Ne,
        SpChar::Ge,
        SpChar::Le,
        SpChar::Pow,
        SpChar::And,
        SpChar::Or,
        SpChar::Nullish,
        SpChar::Arrow,
        SpChar::CalcVarOpen,
        SpChar::CalcFnOpen,
        SpChar::ListOpen,
        SpChar::RecordOpen,
        SpChar::LambdaOpen,
        SpChar::LParen,
        SpChar::RParen,
        SpChar::LBracket,
        SpChar::RBracket,
        SpChar::LBrace,
        SpChar::RBrace,
        SpChar::Lt,
        SpChar::Gt,
        SpChar::Question,
        SpChar::Colon,
        SpChar::Bang,
        SpChar::Plus,
        SpChar::Minus,
        SpChar::Star,
        SpChar::Slash,
        SpChar::Percent,
        SpChar::Comma,
        SpChar::Pipe,
        SpChar::At,
        SpChar::Dollar,
    ];

    /// The token as it is spelled in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpChar::StrictEq => "===",
            SpChar::StrictNe => "!==",
            SpChar::Eq => "==",
            SpChar::Ne => "!=",
            SpChar::Ge => ">=",
            SpChar::Le => "<=",
            SpChar::Pow => "**",
            SpChar::And => "&&",
            SpChar::Or => "||",
            SpChar::Nullish => "??",
            SpChar::Arrow => "=>",
            SpChar::CalcVarOpen => "$(",
            SpChar::CalcFnOpen => "@(",
            SpChar::ListOpen => "@[",
            SpChar::RecordOpen => "@{",
            SpChar::LambdaOpen => "@|",
            SpChar::LParen => "(",
            SpChar::RParen => ")",
            SpChar::LBracket => "[",
            SpChar::RBracket => "]",
            SpChar::LBrace => "{",
            SpChar::RBrace => "}",
            SpChar::Lt => "<",
            SpChar::Gt => ">",
            SpChar::Question => "?",
            SpChar::Colon => ":",
            SpChar::Bang => "!",
            SpChar::Plus => "+",
            SpChar::Minus => "-",
            SpChar::Star => "*",
            SpChar::Slash => "/",
            SpChar::Percent => "%",
            SpChar::Comma => ",",
            SpChar::Pipe => "|",
            SpChar::At => "@",
            SpChar::Dollar => "$",
        }
    }
}

impl fmt::Display for SpChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lexical token.
///
/// Sigils are resolved during tokenization: a `Var` carries its environment
/// key with the leading `$` stripped, a `LambdaVar` its name without the `#`,
/// while a `Fn` keeps its full `@`-prefixed registry key.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Number or string literal
    Value(Value),
    /// `$name`, `$$name` or `$#name`
    Var {
        /// Environment key, first `$` stripped
        name: String,
    },
    /// `#name`
    LambdaVar {
        /// Binding name without the `#`
        name: String,
    },
    /// `@name`, `@#name`, optionally dotted
    Fn {
        /// Full registry key including the `@`
        name: String,
    },
    /// Bare identifier, used as a static record key
    PropName {
        /// The identifier text
        name: String,
    },
    /// Punctuation or operator
    SpChar(SpChar),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Value(value) => write!(f, "{value}"),
            Token::Var { name } => write!(f, "${name}"),
            Token::LambdaVar { name } => write!(f, "#{name}"),
            Token::Fn { name } => f.write_str(name),
            Token::PropName { name } => f.write_str(name),
            Token::SpChar(ch) => f.write_str(ch.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_spelling_shadows_a_later_one() {
        for (i, ch) in SpChar::ALL.iter().enumerate() {
            for later in &SpChar::ALL[i + 1..] {
                assert!(
                    !later.as_str().starts_with(ch.as_str()),
                    "{later} is unreachable behind {ch}"
                );
            }
        }
    }
}
