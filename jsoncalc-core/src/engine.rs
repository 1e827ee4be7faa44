//! The embedding-facing engine

use crate::error::CalcError;
use jsoncalc_ast::CalcNode;
use jsoncalc_evaluator::{CalcEnv, Evaluated, Evaluator, FunctionRegistry};
use jsoncalc_parser::{ParseCache, ParseError};
use std::sync::Arc;

/// One engine instance: a parse cache plus a function registry.
///
/// Parsing through the engine shares node identity per source text, so every
/// evaluator the engine hands out gets memo hits for repeated texts. The
/// registry is fixed at construction; evaluators created later all see it.
#[derive(Debug)]
pub struct CalcEngine {
    parses: ParseCache,
    functions: Arc<FunctionRegistry>,
}

impl Default for CalcEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CalcEngine {
    /// An engine with the standard built-ins.
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::new())
    }

    /// An engine over a caller-assembled registry.
    pub fn with_registry(functions: FunctionRegistry) -> Self {
        CalcEngine { parses: ParseCache::new(), functions: Arc::new(functions) }
    }

    /// Parse `text` through this engine's cache.
    pub fn parse(&self, text: &str) -> Result<Arc<CalcNode>, ParseError> {
        self.parses.parse(text)
    }

    /// A fresh evaluator over this engine's registry, with an empty memo.
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::with_registry(Arc::clone(&self.functions))
    }

    /// Parse and evaluate in one step, with a fresh memo.
    ///
    /// Hosts evaluating many expressions against one environment should
    /// keep a single [`Evaluator`] from [`CalcEngine::evaluator`] instead,
    /// so the memo carries across calls.
    pub fn evaluate(&self, text: &str, env: &CalcEnv) -> Result<Evaluated, CalcError> {
        log::debug!("evaluating expression of {} bytes", text.len());
        let node = self.parse(text)?;
        Ok(self.evaluator().evaluate(&node, env)?)
    }

    /// Parse and evaluate through a caller-held evaluator.
    pub fn evaluate_with(
        &self,
        evaluator: &mut Evaluator,
        text: &str,
        env: &CalcEnv,
    ) -> Result<Evaluated, CalcError> {
        let node = self.parse(text)?;
        Ok(evaluator.evaluate(&node, env)?)
    }

    /// Drop every cached parse.
    pub fn clear_parse_cache(&self) {
        self.parses.clear();
    }
}
