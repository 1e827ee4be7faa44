//! Operator tables for infix and unary expression nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators, in the fixed set the grammar accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfixOp {
    /// `+`
    #[serde(rename = "+")]
    Add,
    /// `-`
    #[serde(rename = "-")]
    Sub,
    /// `*`
    #[serde(rename = "*")]
    Mul,
    /// `/`
    #[serde(rename = "/")]
    Div,
    /// `%`
    #[serde(rename = "%")]
    Rem,
    /// `**`
    #[serde(rename = "**")]
    Pow,
    /// `==`
    #[serde(rename = "==")]
    Eq,
    /// `===`
    #[serde(rename = "===")]
    StrictEq,
    /// `!=`
    #[serde(rename = "!=")]
    Ne,
    /// `!==`
    #[serde(rename = "!==")]
    StrictNe,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
    /// `&&`
    #[serde(rename = "&&")]
    And,
    /// `||`
    #[serde(rename = "||")]
    Or,
    /// `??`
    #[serde(rename = "??")]
    Nullish,
}

impl InfixOp {
    /// The operator as it is spelled in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Rem => "%",
            InfixOp::Pow => "**",
            InfixOp::Eq => "==",
            InfixOp::StrictEq => "===",
            InfixOp::Ne => "!=",
            InfixOp::StrictNe => "!==",
            InfixOp::Gt => ">",
            InfixOp::Ge => ">=",
            InfixOp::Lt => "<",
            InfixOp::Le => "<=",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
            InfixOp::Nullish => "??",
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `!`
    #[serde(rename = "!")]
    Not,
    /// `-`
    #[serde(rename = "-")]
    Neg,
    /// `+`
    #[serde(rename = "+")]
    Pos,
}

impl UnaryOp {
    /// The operator as it is spelled in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
