//! The coercion table
//!
//! jsoncalc inherits the loose value semantics of its original embedding
//! host: truthiness, numeric conversion and the two equality flavors follow
//! the ECMAScript abstract operations, restricted to the [`Value`] type.
//! They are defined here once, as plain functions, so that every operator
//! and every target port reproduces identical behavior.

use crate::value::Value;

/// Truthiness used by `!`, `&&`, `||` and the ternary condition.
///
/// `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy; everything
/// else, including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Undefined => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric conversion, the `Number(x)` operation.
///
/// Arithmetic and relational operators apply this to both operands. Values
/// with no numeric interpretation become `NaN` rather than failing.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => string_to_number(s),
        // Arrays convert through their display form: [] is 0, [x] is Number(x).
        Value::Array(_) => string_to_number(&to_display_string(value)),
        Value::Object(_) => f64::NAN,
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    if let Some(oct) = trimmed.strip_prefix("0o").or_else(|| trimmed.strip_prefix("0O")) {
        return i64::from_str_radix(oct, 8).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    if let Some(bin) = trimmed.strip_prefix("0b").or_else(|| trimmed.strip_prefix("0B")) {
        return i64::from_str_radix(bin, 2).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Reject forms f64::from_str accepts but Number() does not.
    if trimmed.contains(|c: char| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Display conversion, the `String(x)` operation.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                if item.is_nullish() {
                    String::new()
                } else {
                    to_display_string(item)
                }
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Number formatting without a trailing `.0` for integral values.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == n.trunc() && n.abs() < 9.007_199_254_740_992e15 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

/// Strict equality (`===`): no coercion, types must match.
///
/// `NaN` is unequal to itself. Arrays and objects compare structurally;
/// reference identity does not exist for plain values in this model.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Undefined, Value::Undefined) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| strict_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, l)| y.get(k).is_some_and(|r| strict_eq(l, r)))
        }
        _ => false,
    }
}

/// Loose equality (`==`) with the standard coercion ladder.
///
/// `null == undefined`, numbers and strings compare numerically, booleans
/// coerce to numbers, and composites coerce through their display string
/// when compared with a primitive.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null | Value::Undefined, Value::Null | Value::Undefined) => true,
        (Value::Null | Value::Undefined, _) | (_, Value::Null | Value::Undefined) => false,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(_), _) => loose_eq(&Value::Number(to_number(a)), b),
        (_, Value::Bool(_)) => loose_eq(a, &Value::Number(to_number(b))),
        (Value::Number(x), Value::String(s)) | (Value::String(s), Value::Number(x)) => {
            *x == string_to_number(s)
        }
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => {
            strict_eq(a, b)
        }
        (Value::Array(_) | Value::Object(_), _) => {
            loose_eq(&Value::String(to_display_string(a)), b)
        }
        (_, Value::Array(_) | Value::Object(_)) => {
            loose_eq(a, &Value::String(to_display_string(b)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Undefined, false)]
    #[case(Value::Null, false)]
    #[case(Value::Bool(false), false)]
    #[case(Value::Number(0.0), false)]
    #[case(Value::Number(f64::NAN), false)]
    #[case(Value::String(String::new()), false)]
    #[case(Value::Bool(true), true)]
    #[case(Value::Number(-1.5), true)]
    #[case(Value::String("0".into()), true)]
    #[case(Value::Array(vec![]), true)]
    #[case(Value::Object(Default::default()), true)]
    fn truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[rstest]
    #[case(Value::Null, 0.0)]
    #[case(Value::Bool(true), 1.0)]
    #[case(Value::String("  12.5 ".into()), 12.5)]
    #[case(Value::String("0x10".into()), 16.0)]
    #[case(Value::String("0b101".into()), 5.0)]
    #[case(Value::String("".into()), 0.0)]
    #[case(Value::Array(vec![]), 0.0)]
    #[case(Value::Array(vec![Value::Number(7.0)]), 7.0)]
    fn numeric_coercion(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(to_number(&value), expected);
    }

    #[rstest]
    #[case(Value::Undefined)]
    #[case(Value::String("12px".into()))]
    #[case(Value::Object(Default::default()))]
    #[case(Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]))]
    fn numeric_coercion_nan(#[case] value: Value) {
        assert!(to_number(&value).is_nan());
    }

    #[rstest]
    #[case(Value::Number(1.0), "1")]
    #[case(Value::Number(1.5), "1.5")]
    #[case(Value::Number(f64::NAN), "NaN")]
    #[case(Value::Array(vec![Value::Number(1.0), Value::Null, Value::String("x".into())]), "1,,x")]
    #[case(Value::Object(Default::default()), "[object Object]")]
    fn display_coercion(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(to_display_string(&value), expected);
    }

    #[test]
    fn loose_and_strict_equality() {
        let one = Value::Number(1.0);
        let one_str = Value::String("1".into());
        assert!(loose_eq(&one, &one_str));
        assert!(!strict_eq(&one, &one_str));

        assert!(loose_eq(&Value::Null, &Value::Undefined));
        assert!(!strict_eq(&Value::Null, &Value::Undefined));

        assert!(loose_eq(&Value::Bool(true), &one));
        assert!(!loose_eq(&Value::Bool(true), &Value::Number(2.0)));

        let arr = Value::Array(vec![Value::Number(1.0)]);
        assert!(loose_eq(&arr, &one));
        assert!(strict_eq(&arr, &arr));
        assert!(!loose_eq(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    }
}
