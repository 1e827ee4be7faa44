//! Abstract Syntax Tree (AST) definitions for jsoncalc expressions
//!
//! This crate provides the closed [`CalcNode`] sum type produced by the
//! parser and consumed by the evaluator, together with the operator tables
//! and the tagged-JSON interchange format used when an AST crosses a
//! process boundary.

#![warn(missing_docs)]

mod node;
mod operator;

pub use node::{CalcNode, NodeId, NodeKind, RecordKeys};
pub use operator::{InfixOp, UnaryOp};
