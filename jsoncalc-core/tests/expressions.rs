//! End-to-end tests through the engine facade.

use jsoncalc_core::{
    CalcEngine, CalcEnv, CalcError, CalcNode, Evaluated, ParseError, RuntimeError, Value, VarDef,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

fn eval_value(engine: &CalcEngine, text: &str, env: &CalcEnv) -> Value {
    match engine.evaluate(text, env).unwrap() {
        Evaluated::Value(value) => value,
        other => panic!("expected a plain value, got {other:?}"),
    }
}

#[rstest]
#[case("1 + 2 * 3", Value::Number(7.0))]
#[case("8 - 3 - 2", Value::Number(3.0))]
#[case("1 < 2 ? 'a' : 'b'", Value::String("a".to_string()))]
#[case("'10' * '2'", Value::Number(20.0))]
#[case("2 ** 2 ** 3", Value::Number(64.0))]
fn evaluates_plain_expressions(#[case] text: &str, #[case] expected: Value) {
    assert_eq!(eval_value(&CalcEngine::new(), text, &CalcEnv::new()), expected);
}

#[test]
fn embedded_document_scenario() {
    // The motivating shape: expression strings inside a JSON document,
    // evaluated against variables the host extracted from the same document.
    let doc = serde_json::json!({
        "discount": "@#if($total > 100, $total * 0.1, 0)",
        "label": "$user['name']"
    });
    let env = CalcEnv::new()
        .with("total", 250.0)
        .with("user", Value::from(serde_json::json!({ "name": "ada" })));

    let engine = CalcEngine::new();
    let discount = eval_value(&engine, doc["discount"].as_str().unwrap(), &env);
    let label = eval_value(&engine, doc["label"].as_str().unwrap(), &env);
    assert_eq!(discount, Value::Number(25.0));
    assert_eq!(label, Value::String("ada".to_string()));
}

#[test]
fn repeated_texts_share_one_parse() {
    let engine = CalcEngine::new();
    let first = engine.parse("$a + $b").unwrap();
    let second = engine.parse("$a + $b").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    engine.clear_parse_cache();
    let third = engine.parse("$a + $b").unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn one_evaluator_memoizes_across_calls() {
    let engine = CalcEngine::new();
    let env = CalcEnv::new().with("x", 3.0);
    let mut evaluator = engine.evaluator();
    let first = engine.evaluate_with(&mut evaluator, "$x * $x", &env).unwrap();
    let second = engine.evaluate_with(&mut evaluator, "$x * $x", &env).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Evaluated::Value(Value::Number(9.0)));
}

#[test]
fn parse_errors_carry_through_the_engine() {
    let engine = CalcEngine::new();
    let env = CalcEnv::new();
    match engine.evaluate("1 2", &env).unwrap_err() {
        CalcError::Parse(ParseError::TrailingTokens { tokens }) => assert_eq!(tokens, "2"),
        other => panic!("expected trailing-token error, got {other:?}"),
    }
    assert_eq!(
        engine.evaluate("", &env).unwrap_err(),
        CalcError::Parse(ParseError::Empty)
    );
    assert!(matches!(
        engine.evaluate("1 + ^", &env).unwrap_err(),
        CalcError::Parse(ParseError::Lex(_))
    ));
}

#[test]
fn runtime_errors_carry_through_the_engine() {
    let engine = CalcEngine::new();
    assert_eq!(
        engine.evaluate("$ghost", &CalcEnv::new()).unwrap_err(),
        CalcError::Runtime(RuntimeError::UndefinedVariable { name: "ghost".to_string() })
    );
}

#[test]
fn lists_and_records_reduce_on_demand() {
    let engine = CalcEngine::new();
    let env = CalcEnv::new().with("k", "b");
    assert_eq!(eval_value(&engine, "@[1, 2, [3, 4]][2][1]", &env), Value::Number(4.0));
    assert_eq!(eval_value(&engine, "@{a: 1, [$k]: $missing}['a']", &env), Value::Number(1.0));
    assert_eq!(eval_value(&engine, "@{x: @[10, 20]}['x'][1]", &env), Value::Number(20.0));
}

#[test]
fn lambdas_compose_with_builtins() {
    let engine = CalcEngine::new();
    let env = CalcEnv::new()
        .with("limit", 10.0)
        .with(
            "clamp",
            VarDef::node(
                jsoncalc_parser::parse_uncached("@|#n| => @#if(#n > $limit, $limit, #n)").unwrap(),
            ),
        );
    assert_eq!(eval_value(&engine, "$clamp(3)", &env), Value::Number(3.0));
    assert_eq!(eval_value(&engine, "$clamp(30)", &env), Value::Number(10.0));
}

#[test]
fn ast_survives_the_interchange_format() {
    let engine = CalcEngine::new();
    let node = engine.parse("@#if($flag, 1 + 1, @[1, 2][0])").unwrap();
    let json = node.to_json();
    let decoded = Arc::new(CalcNode::from_json(json).unwrap());
    assert_eq!(*node, *decoded);

    let env = CalcEnv::new().with("flag", false);
    let mut evaluator = engine.evaluator();
    assert_eq!(
        evaluator.evaluate(&decoded, &env).unwrap(),
        Evaluated::Value(Value::Number(1.0))
    );
}

#[test]
fn undefined_results_round_trip_to_json_null() {
    let engine = CalcEngine::new();
    let out = eval_value(&engine, "@[1][5]", &CalcEnv::new());
    assert_eq!(out, Value::Undefined);
    assert_eq!(serde_json::Value::from(out), serde_json::Value::Null);
}
