//! Evaluation error types

use thiserror::Error;

/// Errors raised while evaluating an expression tree.
///
/// `Clone` because the evaluator memoizes failures alongside successes: a
/// node that failed once against an environment fails identically on every
/// later visit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A variable name had no definition in the environment.
    #[error("no such variable defined: {name}")]
    UndefinedVariable {
        /// The environment key that was looked up.
        name: String,
    },

    /// A `$(...)` or `@(...)` name expression produced a non-string.
    #[error("calculated name must be resolved into a string")]
    InvalidCalculatedName,

    /// A member-access key expression produced something other than a plain
    /// value.
    #[error("member access key must be resolved into a string or number")]
    InvalidAccessKey,

    /// Member access was applied to a function or lambda.
    #[error("member access is allowed for value, list and record only")]
    InvalidAccessTarget,

    /// A function name had no entry in the registry.
    #[error("unknown function: {name}")]
    UnknownFunction {
        /// The registry key that was looked up.
        name: String,
    },

    /// The callee of an invocation was neither a function nor a lambda.
    #[error("only functions and lambdas can be invoked")]
    NotInvocable,

    /// A built-in was invoked with too few arguments.
    #[error("{name} expects {expected} arguments, got {actual}")]
    Arity {
        /// The function's registry key.
        name: String,
        /// How many arguments it requires.
        expected: usize,
        /// How many were supplied.
        actual: usize,
    },
}
