//! Variable environments and environment identity

use jsoncalc_ast::CalcNode;
use jsoncalc_model::Value;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Stable identity of an environment, assigned at construction time.
///
/// Together with a node id it keys the evaluator's memo, so two environments
/// with equal contents still cache separately. Lambda invocations mint a
/// fresh id for each child environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId(u64);

impl EnvId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        EnvId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A variable definition: either an already-resolved value or an expression
/// evaluated lazily (and memoized) on first reference.
///
/// The serde form is untagged; a JSON object carrying a valid node `type` tag
/// decodes as an expression, anything else as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarDef {
    /// An unevaluated expression.
    Node(Arc<CalcNode>),
    /// A plain value.
    Value(Value),
}

impl VarDef {
    /// Wrap an expression tree.
    pub fn node(node: CalcNode) -> Self {
        VarDef::Node(Arc::new(node))
    }
}

impl From<Value> for VarDef {
    fn from(value: Value) -> Self {
        VarDef::Value(value)
    }
}

impl From<f64> for VarDef {
    fn from(n: f64) -> Self {
        VarDef::Value(Value::Number(n))
    }
}

impl From<bool> for VarDef {
    fn from(b: bool) -> Self {
        VarDef::Value(Value::Bool(b))
    }
}

impl From<&str> for VarDef {
    fn from(s: &str) -> Self {
        VarDef::Value(Value::String(s.to_string()))
    }
}

impl From<String> for VarDef {
    fn from(s: String) -> Self {
        VarDef::Value(Value::String(s))
    }
}

/// The variables an expression evaluates against.
///
/// Environments are built up front and stay unchanged for the duration of an
/// evaluation pass; the builder methods consume `self` so a finished
/// environment cannot be mutated behind the memo's back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcEnv {
    #[serde(skip, default = "EnvId::fresh")]
    id: EnvId,
    vars: FxHashMap<String, VarDef>,
}

impl Default for CalcEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl CalcEnv {
    /// An empty environment with a fresh identity.
    pub fn new() -> Self {
        CalcEnv { id: EnvId::fresh(), vars: FxHashMap::default() }
    }

    /// This environment's identity.
    pub fn id(&self) -> EnvId {
        self.id
    }

    /// Add a variable definition.
    pub fn with(mut self, name: impl Into<String>, def: impl Into<VarDef>) -> Self {
        self.vars.insert(name.into(), def.into());
        self
    }

    /// Add a variable bound to an unevaluated expression.
    pub fn with_node(self, name: impl Into<String>, node: CalcNode) -> Self {
        self.with(name, VarDef::node(node))
    }

    /// Look up a definition by environment key.
    pub fn get(&self, name: &str) -> Option<&VarDef> {
        self.vars.get(name)
    }

    /// Derive a child environment: this environment's variables plus
    /// `bindings`, which shadow on collision. The child has its own identity.
    pub fn child(&self, bindings: impl IntoIterator<Item = (String, VarDef)>) -> CalcEnv {
        let mut vars = self.vars.clone();
        vars.extend(bindings);
        CalcEnv { id: EnvId::fresh(), vars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn child_shadows_and_gets_a_new_identity() {
        let parent = CalcEnv::new().with("a", 1.0).with("b", 2.0);
        let child = parent.child(vec![("a".to_string(), VarDef::from(10.0))]);
        assert_ne!(parent.id(), child.id());
        assert_eq!(child.get("a"), Some(&VarDef::Value(Value::Number(10.0))));
        assert_eq!(child.get("b"), Some(&VarDef::Value(Value::Number(2.0))));
    }

    #[test]
    fn deserialized_vardef_prefers_expression_nodes() {
        let def: VarDef = serde_json::from_value(serde_json::json!({
            "type": "var", "name": "x"
        }))
        .unwrap();
        assert!(matches!(def, VarDef::Node(_)));

        let def: VarDef = serde_json::from_value(serde_json::json!({ "name": "x" })).unwrap();
        assert!(matches!(def, VarDef::Value(Value::Object(_))));
    }
}
