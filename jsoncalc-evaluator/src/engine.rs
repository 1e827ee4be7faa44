//! The memoizing tree-walking evaluator

use crate::context::{CalcEnv, EnvId, VarDef};
use crate::error::RuntimeError;
use crate::operate;
use crate::registry::FunctionRegistry;
use jsoncalc_ast::{CalcNode, NodeId, NodeKind};
use jsoncalc_model::{coercion, Value};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Outcome of evaluating one node against one environment.
pub type EvalResult = Result<Evaluated, RuntimeError>;

/// A normal form: what evaluation reduces a node to.
///
/// Lists, records and lambdas stay as (shared) sub-trees rather than being
/// reduced eagerly; member access and invocation reduce them further on
/// demand. Function references carry only their registry key until invoked.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    /// A plain value.
    Value(Value),
    /// An uninvoked function reference, by registry key.
    Fn(String),
    /// A list, record or lambda sub-tree in normal form.
    Node(Arc<CalcNode>),
}

impl Evaluated {
    /// Truthiness: values coerce, everything else counts as truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Evaluated::Value(value) => coercion::is_truthy(value),
            _ => true,
        }
    }

    /// Nullishness: only `null` and `undefined` values are nullish.
    pub fn is_nullish(&self) -> bool {
        match self {
            Evaluated::Value(value) => value.is_nullish(),
            _ => false,
        }
    }

    /// The plain value, if this normal form is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Evaluated::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Re-enter the environment: the definition a lambda argument binds to.
    pub(crate) fn into_var_def(self) -> VarDef {
        match self {
            Evaluated::Value(value) => VarDef::Value(value),
            Evaluated::Node(node) => VarDef::Node(node),
            Evaluated::Fn(name) => VarDef::node(CalcNode::fn_ref(name)),
        }
    }
}

impl From<Value> for Evaluated {
    fn from(value: Value) -> Self {
        Evaluated::Value(value)
    }
}

/// Evaluates expression trees against environments, memoizing every node
/// outcome by `(environment, node)` identity.
///
/// The memo lives for the evaluator's lifetime: within it, each node is
/// reduced at most once per environment, and failures are replayed just like
/// successes. Create a fresh evaluator to observe changed registry contents
/// or simply to drop the memo.
#[derive(Debug)]
pub struct Evaluator {
    functions: Arc<FunctionRegistry>,
    memo: FxHashMap<(EnvId, NodeId), EvalResult>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// An evaluator over the default function registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(FunctionRegistry::new()))
    }

    /// An evaluator over a caller-provided registry.
    pub fn with_registry(functions: Arc<FunctionRegistry>) -> Self {
        Evaluator { functions, memo: FxHashMap::default() }
    }

    /// Evaluate `node` against `env`, reusing any memoized outcome.
    pub fn evaluate(&mut self, node: &Arc<CalcNode>, env: &CalcEnv) -> EvalResult {
        let key = (env.id(), node.id());
        if let Some(hit) = self.memo.get(&key) {
            log::trace!("memo hit for node {:?} in env {:?}", key.1, key.0);
            return hit.clone();
        }
        let outcome = self.eval_node(node, env);
        self.memo.insert(key, outcome.clone());
        outcome
    }

    fn eval_node(&mut self, node: &Arc<CalcNode>, env: &CalcEnv) -> EvalResult {
        match node.kind() {
            NodeKind::Value { value } => Ok(Evaluated::Value(value.clone())),
            NodeKind::Fn { name } => Ok(Evaluated::Fn(name.clone())),
            NodeKind::Lambda { .. } | NodeKind::List { .. } | NodeKind::Record { .. } => {
                Ok(Evaluated::Node(Arc::clone(node)))
            }
            NodeKind::Var { name } | NodeKind::LambdaVar { name } => self.eval_var(name, env),
            NodeKind::CalculatedVar { name } => {
                let name = self.eval_name(name, env)?;
                self.eval_var(&name, env)
            }
            NodeKind::CalculatedFn { name } => {
                let name = self.eval_name(name, env)?;
                Ok(Evaluated::Fn(name))
            }
            NodeKind::Ternary { condition, then, or_else } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.evaluate(then, env)
                } else {
                    self.evaluate(or_else, env)
                }
            }
            NodeKind::Infix { op, lhs, rhs } => {
                let lhs = self.evaluate(lhs, env)?;
                let rhs = self.evaluate(rhs, env)?;
                Ok(operate::apply_infix(*op, lhs, rhs))
            }
            NodeKind::Unary { op, operand } => {
                let operand = self.evaluate(operand, env)?;
                Ok(operate::apply_unary(*op, operand))
            }
            NodeKind::MemberAccess { item, path } => {
                let item = self.evaluate(item, env)?;
                self.resolve_access(item, path, env)
            }
            NodeKind::Invoke { callee, args } => self.eval_invoke(callee, args, env),
        }
    }

    fn eval_var(&mut self, name: &str, env: &CalcEnv) -> EvalResult {
        match env.get(name) {
            None => Err(RuntimeError::UndefinedVariable { name: name.to_string() }),
            Some(VarDef::Value(value)) => Ok(Evaluated::Value(value.clone())),
            Some(VarDef::Node(node)) => {
                let node = Arc::clone(node);
                self.evaluate(&node, env)
            }
        }
    }

    /// A `$(...)` / `@(...)` name expression; must come out as a string.
    fn eval_name(&mut self, name: &Arc<CalcNode>, env: &CalcEnv) -> Result<String, RuntimeError> {
        match self.evaluate(name, env)? {
            Evaluated::Value(Value::String(name)) => Ok(name),
            _ => Err(RuntimeError::InvalidCalculatedName),
        }
    }

    /// Invocation: built-ins get their arguments unevaluated, lambdas get
    /// them reduced eagerly and bound in a child environment.
    fn eval_invoke(
        &mut self,
        callee: &Arc<CalcNode>,
        args: &[Arc<CalcNode>],
        env: &CalcEnv,
    ) -> EvalResult {
        match self.evaluate(callee, env)? {
            Evaluated::Fn(name) => {
                let function = self
                    .functions
                    .get(&name)
                    .ok_or_else(|| RuntimeError::UnknownFunction { name: name.clone() })?;
                function(self, &name, args, env)
            }
            Evaluated::Node(node) => match node.kind() {
                NodeKind::Lambda { identifiers, expression } => {
                    let mut bindings = Vec::with_capacity(identifiers.len());
                    for (identifier, arg) in identifiers.iter().zip(args) {
                        let bound = self.evaluate(arg, env)?;
                        bindings.push((identifier.clone(), bound.into_var_def()));
                    }
                    let child = env.child(bindings);
                    self.evaluate(expression, &child)
                }
                _ => Err(RuntimeError::NotInvocable),
            },
            Evaluated::Value(_) => Err(RuntimeError::NotInvocable),
        }
    }
}
