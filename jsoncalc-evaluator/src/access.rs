//! Member access resolution
//!
//! Access never fails just because something is absent: walking past a
//! missing object key or an out-of-range index yields `undefined`. Hard
//! errors are reserved for structural misuse: indexing into a function or
//! lambda, or a key expression that refuses to become a string or number.

use crate::context::CalcEnv;
use crate::engine::{EvalResult, Evaluated, Evaluator};
use crate::error::RuntimeError;
use jsoncalc_ast::{CalcNode, NodeKind};
use jsoncalc_model::Value;
use std::sync::Arc;

/// An in-range integral index into a collection of `len` elements.
fn array_index(key: &Value, len: usize) -> Option<usize> {
    match key {
        Value::Number(n) if n.fract() == 0.0 && *n >= 0.0 && (*n as usize) < len => {
            Some(*n as usize)
        }
        _ => None,
    }
}

impl Evaluator {
    /// Walk `path` into an already-reduced item.
    ///
    /// Plain values are walked structurally. List and record sub-trees
    /// consume one path step at a time, reducing only the element or entry
    /// the step selects before recursing on the remainder.
    pub(crate) fn resolve_access(
        &mut self,
        item: Evaluated,
        path: &[Arc<CalcNode>],
        env: &CalcEnv,
    ) -> EvalResult {
        match item {
            Evaluated::Value(value) => self.access_value(value, path, env),
            Evaluated::Node(node) => {
                let Some((step, rest)) = path.split_first() else {
                    return Ok(Evaluated::Node(node));
                };
                match node.kind() {
                    NodeKind::List { items } => self.access_list(items, step, rest, env),
                    NodeKind::Record { raw, pairs } => {
                        let key = self.access_key(step, env)?;
                        match &key {
                            Value::String(key) => {
                                self.access_record(raw, pairs, key, rest, env)
                            }
                            _ => Ok(Evaluated::Value(Value::Undefined)),
                        }
                    }
                    _ => Err(RuntimeError::InvalidAccessTarget),
                }
            }
            Evaluated::Fn(_) => Err(RuntimeError::InvalidAccessTarget),
        }
    }

    /// A path step; must reduce to a plain value.
    fn access_key(&mut self, step: &Arc<CalcNode>, env: &CalcEnv) -> Result<Value, RuntimeError> {
        match self.evaluate(step, env)? {
            Evaluated::Value(value) => Ok(value),
            _ => Err(RuntimeError::InvalidAccessKey),
        }
    }

    fn access_value(
        &mut self,
        mut current: Value,
        path: &[Arc<CalcNode>],
        env: &CalcEnv,
    ) -> EvalResult {
        for step in path {
            let key = self.access_key(step, env)?;
            current = match (&key, &current) {
                (Value::String(key), Value::Object(map)) => {
                    map.get(key).cloned().unwrap_or(Value::Undefined)
                }
                (Value::Number(_), Value::Array(items)) => array_index(&key, items.len())
                    .map(|at| items[at].clone())
                    .unwrap_or(Value::Undefined),
                _ => return Ok(Evaluated::Value(Value::Undefined)),
            };
        }
        Ok(Evaluated::Value(current))
    }

    fn access_list(
        &mut self,
        items: &[Arc<CalcNode>],
        step: &Arc<CalcNode>,
        rest: &[Arc<CalcNode>],
        env: &CalcEnv,
    ) -> EvalResult {
        let key = self.access_key(step, env)?;
        match array_index(&key, items.len()) {
            Some(at) => {
                let element = self.evaluate(&items[at], env)?;
                if rest.is_empty() {
                    Ok(element)
                } else {
                    self.resolve_access(element, rest, env)
                }
            }
            None => Ok(Evaluated::Value(Value::Undefined)),
        }
    }

    /// Statically-keyed entries are consulted first; computed keys are then
    /// scanned in order, each reduced to a string, first match winning.
    fn access_record(
        &mut self,
        raw: &jsoncalc_ast::RecordKeys,
        pairs: &[(Arc<CalcNode>, Arc<CalcNode>)],
        key: &str,
        rest: &[Arc<CalcNode>],
        env: &CalcEnv,
    ) -> EvalResult {
        if let Some(entry) = raw.get(key) {
            return self.access_entry(entry, rest, env);
        }
        for (key_node, entry) in pairs {
            match self.evaluate(key_node, env)? {
                Evaluated::Value(Value::String(found)) => {
                    if found == key {
                        return self.access_entry(entry, rest, env);
                    }
                }
                _ => return Err(RuntimeError::InvalidAccessKey),
            }
        }
        Ok(Evaluated::Value(Value::Undefined))
    }

    fn access_entry(
        &mut self,
        entry: &Arc<CalcNode>,
        rest: &[Arc<CalcNode>],
        env: &CalcEnv,
    ) -> EvalResult {
        let entry = self.evaluate(entry, env)?;
        if rest.is_empty() {
            Ok(entry)
        } else {
            self.resolve_access(entry, rest, env)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn array_index_accepts_only_in_range_integers() {
        assert_eq!(array_index(&Value::Number(0.0), 3), Some(0));
        assert_eq!(array_index(&Value::Number(2.0), 3), Some(2));
        assert_eq!(array_index(&Value::Number(3.0), 3), None);
        assert_eq!(array_index(&Value::Number(-1.0), 3), None);
        assert_eq!(array_index(&Value::Number(1.5), 3), None);
        assert_eq!(array_index(&Value::Number(f64::NAN), 3), None);
        assert_eq!(array_index(&Value::String("0".to_string()), 3), None);
    }
}
