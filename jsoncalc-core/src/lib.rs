//! jsoncalc: an embedded JSON expression language
//!
//! Expressions live inside JSON documents as plain strings (`@#if($cond,
//! 1, 2)`, `@[1, 2, 3][0]`, `$user['name']`) and evaluate against a
//! host-supplied variable environment. The pipeline is tokenize, parse
//! (cached per source text) and memoized tree-walking evaluation; values
//! follow JavaScript coercion semantics.
//!
//! ```
//! use jsoncalc_core::{CalcEngine, CalcEnv, Evaluated, Value};
//!
//! let engine = CalcEngine::new();
//! let env = CalcEnv::new().with("price", 25.0).with("qty", 4.0);
//! let total = engine.evaluate("$price * $qty", &env).unwrap();
//! assert_eq!(total, Evaluated::Value(Value::Number(100.0)));
//! ```

#![warn(missing_docs)]

mod engine;
mod error;

pub use engine::CalcEngine;
pub use error::CalcError;

pub use jsoncalc_ast::{CalcNode, InfixOp, NodeId, NodeKind, UnaryOp};
pub use jsoncalc_evaluator::{
    BuiltinFn, CalcEnv, EnvId, EvalResult, Evaluated, Evaluator, FunctionRegistry, RuntimeError,
    VarDef,
};
pub use jsoncalc_model::{coercion, Map, Value};
pub use jsoncalc_parser::{LexError, ParseCache, ParseError};
