//! Evaluator for jsoncalc expression trees
//!
//! Evaluation reduces a [`jsoncalc_ast::CalcNode`] to a normal form
//! ([`Evaluated`]) against a variable environment ([`CalcEnv`]). Every node
//! outcome is memoized by `(environment, node)` identity, so shared
//! sub-trees (and the operands that short-circuiting operators already
//! reduced) are never re-walked within one [`Evaluator`].

#![warn(missing_docs)]

mod access;
mod context;
mod engine;
mod error;
mod operate;
mod registry;

pub use context::{CalcEnv, EnvId, VarDef};
pub use engine::{EvalResult, Evaluated, Evaluator};
pub use error::RuntimeError;
pub use registry::{BuiltinFn, FunctionRegistry};
