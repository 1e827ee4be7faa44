//! Built-in function registry

use crate::context::CalcEnv;
use crate::engine::{EvalResult, Evaluator};
use crate::error::RuntimeError;
use jsoncalc_ast::CalcNode;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A built-in function.
///
/// Arguments arrive unevaluated, so a built-in chooses which of them to
/// reduce (through the evaluator, keeping memoization) and which to skip.
/// The `&str` is the registry key the call resolved through, for error
/// reporting.
pub type BuiltinFn =
    fn(&mut Evaluator, &str, &[Arc<CalcNode>], &CalcEnv) -> EvalResult;

/// Named built-in functions, keyed by their full `@`-prefixed spelling.
///
/// Registries are shared immutably between evaluators; populate one up
/// front, wrap it in an `Arc`, and hand it out.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    entries: FxHashMap<String, BuiltinFn>,
}

impl FunctionRegistry {
    /// A registry holding the standard built-ins.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("@#if", builtin_if);
        registry
    }

    /// A registry with no entries at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace a built-in under `name`.
    pub fn register(&mut self, name: impl Into<String>, function: BuiltinFn) {
        self.entries.insert(name.into(), function);
    }

    /// Look up a built-in by registry key.
    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.entries.get(name).copied()
    }
}

/// `@#if(condition, then, orElse)`; the untaken branch is never evaluated.
fn builtin_if(
    evaluator: &mut Evaluator,
    name: &str,
    args: &[Arc<CalcNode>],
    env: &CalcEnv,
) -> EvalResult {
    if args.len() < 3 {
        return Err(RuntimeError::Arity {
            name: name.to_string(),
            expected: 3,
            actual: args.len(),
        });
    }
    if evaluator.evaluate(&args[0], env)?.is_truthy() {
        evaluator.evaluate(&args[1], env)
    } else {
        evaluator.evaluate(&args[2], env)
    }
}
