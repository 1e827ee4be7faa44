//! Expression node definitions and node identity

use crate::operator::{InfixOp, UnaryOp};
use indexmap::IndexMap;
use jsoncalc_model::Value;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Stable identity of an AST node, assigned at construction time.
///
/// The evaluator memoizes by `(EnvId, NodeId)`, so identity rather than
/// structural equality decides whether two nodes share a cache slot.
/// Cloning a node preserves its id (a clone is the same node, shared);
/// deserializing always mints fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate an id no other node in this process has.
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::fresh()
    }
}

/// Statically-known record keys, in declaration order.
pub type RecordKeys = IndexMap<String, Arc<CalcNode>>;

/// A parsed expression node.
///
/// The tree is immutable once built: children are `Arc`-shared, and the
/// evaluator hands sub-trees back out (lists, records, lambdas are their own
/// normal forms) without copying. Structural equality ignores [`NodeId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcNode {
    #[serde(skip, default)]
    id: NodeId,
    #[serde(flatten)]
    kind: NodeKind,
}

/// The closed set of expression node shapes.
///
/// The serde representation is the tagged-record interchange format:
/// `{"type": "infix", "op": "+", "lhs": ..., "rhs": ...}`. Anything outside
/// this set fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    /// Literal value, already in normal form
    Value {
        /// The literal; an absent field decodes as `undefined`
        #[serde(default = "undefined_value")]
        value: Value,
    },
    /// Variable reference by static name
    Var {
        /// Environment key to look up
        name: String,
    },
    /// Variable reference whose name is itself an expression
    CalculatedVar {
        /// Expression that must resolve to the variable name
        name: Arc<CalcNode>,
    },
    /// Reference to a built-in function, uninvoked
    Fn {
        /// Registry key, e.g. `@#if`
        name: String,
    },
    /// Built-in function reference with a computed name
    CalculatedFn {
        /// Expression that must resolve to the function name
        name: Arc<CalcNode>,
    },
    /// Placeholder bound only inside a lambda body
    LambdaVar {
        /// Environment key the lambda binds
        name: String,
    },
    /// Closure definition; evaluation does not reduce the body
    Lambda {
        /// Parameter names, in binding order
        identifiers: Vec<String>,
        /// The body expression
        expression: Arc<CalcNode>,
    },
    /// Function or lambda application
    Invoke {
        /// Expression that must evaluate to a function or lambda
        callee: Arc<CalcNode>,
        /// Argument expressions
        args: Vec<Arc<CalcNode>>,
    },
    /// Binary operator application
    Infix {
        /// The operator
        op: InfixOp,
        /// Left operand
        lhs: Arc<CalcNode>,
        /// Right operand
        rhs: Arc<CalcNode>,
    },
    /// Unary prefix operator application
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Arc<CalcNode>,
    },
    /// Conditional expression
    Ternary {
        /// Condition, tested for truthiness
        condition: Arc<CalcNode>,
        /// Branch taken when the condition is truthy
        then: Arc<CalcNode>,
        /// Branch taken otherwise
        #[serde(rename = "orElse")]
        or_else: Arc<CalcNode>,
    },
    /// Ordered literal, elements evaluated on demand
    List {
        /// Element expressions
        items: Vec<Arc<CalcNode>>,
    },
    /// Object literal
    Record {
        /// Entries whose key was known at parse time
        raw: RecordKeys,
        /// Entries whose key must itself be evaluated
        pairs: Vec<(Arc<CalcNode>, Arc<CalcNode>)>,
    },
    /// Chained indexing / property access
    MemberAccess {
        /// The expression being indexed into
        item: Arc<CalcNode>,
        /// One expression per access step
        path: Vec<Arc<CalcNode>>,
    },
}

fn undefined_value() -> Value {
    Value::Undefined
}

impl PartialEq for CalcNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl CalcNode {
    /// Wrap a [`NodeKind`], stamping a fresh identity.
    pub fn new(kind: NodeKind) -> Self {
        CalcNode { id: NodeId::fresh(), kind }
    }

    /// This node's identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// This node's shape.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Literal node.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::new(NodeKind::Value { value: value.into() })
    }

    /// Variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Var { name: name.into() })
    }

    /// Variable reference with a computed name.
    pub fn calculated_var(name: CalcNode) -> Self {
        Self::new(NodeKind::CalculatedVar { name: Arc::new(name) })
    }

    /// Function reference.
    pub fn fn_ref(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Fn { name: name.into() })
    }

    /// Function reference with a computed name.
    pub fn calculated_fn(name: CalcNode) -> Self {
        Self::new(NodeKind::CalculatedFn { name: Arc::new(name) })
    }

    /// Lambda parameter reference.
    pub fn lambda_var(name: impl Into<String>) -> Self {
        Self::new(NodeKind::LambdaVar { name: name.into() })
    }

    /// Lambda definition.
    pub fn lambda(identifiers: Vec<String>, expression: CalcNode) -> Self {
        Self::new(NodeKind::Lambda { identifiers, expression: Arc::new(expression) })
    }

    /// Function or lambda application.
    pub fn invoke(callee: CalcNode, args: Vec<CalcNode>) -> Self {
        Self::new(NodeKind::Invoke {
            callee: Arc::new(callee),
            args: args.into_iter().map(Arc::new).collect(),
        })
    }

    /// Binary operator node.
    pub fn infix(op: InfixOp, lhs: CalcNode, rhs: CalcNode) -> Self {
        Self::new(NodeKind::Infix { op, lhs: Arc::new(lhs), rhs: Arc::new(rhs) })
    }

    /// Unary operator node.
    pub fn unary(op: UnaryOp, operand: CalcNode) -> Self {
        Self::new(NodeKind::Unary { op, operand: Arc::new(operand) })
    }

    /// Conditional node.
    pub fn ternary(condition: CalcNode, then: CalcNode, or_else: CalcNode) -> Self {
        Self::new(NodeKind::Ternary {
            condition: Arc::new(condition),
            then: Arc::new(then),
            or_else: Arc::new(or_else),
        })
    }

    /// List literal node.
    pub fn list(items: Vec<CalcNode>) -> Self {
        Self::new(NodeKind::List { items: items.into_iter().map(Arc::new).collect() })
    }

    /// Record literal node.
    pub fn record(raw: Vec<(String, CalcNode)>, pairs: Vec<(CalcNode, CalcNode)>) -> Self {
        Self::new(NodeKind::Record {
            raw: raw.into_iter().map(|(k, v)| (k, Arc::new(v))).collect(),
            pairs: pairs.into_iter().map(|(k, v)| (Arc::new(k), Arc::new(v))).collect(),
        })
    }

    /// Member access node.
    pub fn member_access(item: CalcNode, path: Vec<CalcNode>) -> Self {
        Self::new(NodeKind::MemberAccess {
            item: Arc::new(item),
            path: path.into_iter().map(Arc::new).collect(),
        })
    }

    /// True if this node is a literal.
    pub fn is_value(&self) -> bool {
        matches!(self.kind, NodeKind::Value { .. })
    }

    /// The literal value, if this node is one.
    pub fn as_value(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Value { value } => Some(value),
            _ => None,
        }
    }

    /// Decode an AST received as untrusted JSON.
    ///
    /// Rejects anything outside the closed variant set. Every decoded node
    /// receives a fresh identity.
    pub fn from_json(json: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json)
    }

    /// Encode this AST in the tagged-record interchange format.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("AST is always representable as JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clones_share_identity_but_new_nodes_do_not() {
        let node = CalcNode::value(1.0);
        let clone = node.clone();
        assert_eq!(node.id(), clone.id());
        assert_ne!(node.id(), CalcNode::value(1.0).id());
        assert_eq!(node, CalcNode::value(1.0));
    }

    #[test]
    fn interchange_round_trip() {
        let node = CalcNode::infix(
            InfixOp::Add,
            CalcNode::value(1.0),
            CalcNode::infix(InfixOp::Mul, CalcNode::var("x"), CalcNode::value(3.0)),
        );
        let json = node.to_json();
        assert_eq!(json["type"], "infix");
        assert_eq!(json["op"], "+");
        assert_eq!(json["rhs"]["type"], "infix");

        let decoded = CalcNode::from_json(json).unwrap();
        assert_eq!(decoded, node);
        assert_ne!(decoded.id(), node.id());
    }

    #[test]
    fn missing_value_field_decodes_as_undefined() {
        let decoded = CalcNode::from_json(serde_json::json!({ "type": "value" })).unwrap();
        assert_eq!(decoded.as_value(), Some(&Value::Undefined));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(CalcNode::from_json(serde_json::json!({ "type": "loop", "body": [] })).is_err());
        assert!(CalcNode::from_json(serde_json::json!({ "type": "infix", "op": "~" })).is_err());
    }

    #[test]
    fn record_keeps_declaration_order() {
        let node = CalcNode::record(
            vec![
                ("b".to_string(), CalcNode::value(1.0)),
                ("a".to_string(), CalcNode::value(2.0)),
            ],
            vec![],
        );
        match node.kind() {
            NodeKind::Record { raw, .. } => {
                assert_eq!(raw.keys().collect::<Vec<_>>(), vec!["b", "a"]);
            }
            other => panic!("expected record, got {other:?}"),
        }
    }
}
