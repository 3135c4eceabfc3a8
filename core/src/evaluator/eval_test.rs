//! Unit tests for statement evaluation and outcome policy.

use pretty_assertions::assert_eq;

use super::*;
use crate::outcome::Outcome;
use crate::parser::parse_source;
use crate::values::Value;

/// Evaluate every statement of `source` in order against one environment
/// and return the outcomes.
fn run(source: &str) -> (Vec<Outcome>, Environment) {
    let program = parse_source(source).expect("parsing failed");
    let mut env = Environment::new();
    let outcomes = program
        .statements
        .iter()
        .map(|stmt| statement_outcome(&mut env, &stmt.kind))
        .collect();
    (outcomes, env)
}

fn last(source: &str) -> Outcome {
    let (outcomes, _) = run(source);
    outcomes.into_iter().last().expect("no statements")
}

// ============================================================================
// Outcome policy
// ============================================================================

#[test]
fn test_assignment_shows_bound_value() {
    assert_eq!(last("a = 1"), Outcome::Value(Value::Int(1)));
}

#[test]
fn test_tuple_assignment_shows_all_targets() {
    assert_eq!(
        last("a, b = 1, 2"),
        Outcome::Value(Value::Tuple(vec![Value::Int(1), Value::Int(2)]))
    );
}

#[test]
fn test_bare_expression_shows_value() {
    assert_eq!(last("1 + 2"), Outcome::Value(Value::Int(3)));
}

#[test]
fn test_division_by_zero_is_captured() {
    assert_eq!(last("1 / 0"), Outcome::Error(RuntimeError::DivisionByZero));
}

#[test]
fn test_import_shows_module_object() {
    let Outcome::Value(Value::Module(module)) = last("import math") else {
        panic!("expected a module outcome");
    };
    assert_eq!(module.name(), "math");
}

#[test]
fn test_from_import_shows_imported_binding() {
    let Outcome::Value(Value::Function(func)) = last("from math import sqrt") else {
        panic!("expected a function outcome");
    };
    assert_eq!(func.name(), "sqrt");
}

#[test]
fn test_from_import_of_multiple_names_shows_tuple() {
    let Outcome::Value(Value::Tuple(items)) = last("from math import pi, e") else {
        panic!("expected a tuple outcome");
    };
    assert_eq!(items.len(), 2);
}

#[test]
fn test_chained_assignment_shows_nothing() {
    assert_eq!(last("a = b = 1"), Outcome::Nothing);
}

#[test]
fn test_subscript_assignment_shows_nothing() {
    assert_eq!(last("xs = [1, 2]\nxs[0] = 5"), Outcome::Nothing);
}

#[test]
fn test_pass_and_del_show_nothing() {
    assert_eq!(last("pass"), Outcome::Nothing);
    assert_eq!(last("a = 1\ndel a"), Outcome::Nothing);
}

#[test]
fn test_augmented_chain() {
    let (outcomes, _) = run("a = 1\na += 2");
    assert_eq!(
        outcomes,
        vec![
            Outcome::Value(Value::Int(1)),
            Outcome::Value(Value::Int(3)),
        ]
    );
}

#[test]
fn test_error_does_not_halt_later_statements() {
    let (outcomes, env) = run("a = 1\nb = a / 0\nc = a + 1");
    assert_eq!(outcomes[0], Outcome::Value(Value::Int(1)));
    assert!(matches!(outcomes[1], Outcome::Error(_)));
    assert_eq!(outcomes[2], Outcome::Value(Value::Int(2)));
    // The failed statement left no binding behind.
    assert_eq!(env.get("b"), None);
}

#[test]
fn test_missing_name_error_message() {
    assert_eq!(
        last("missing + 1"),
        Outcome::Error(RuntimeError::NameError("missing".into()))
    );
}

// ============================================================================
// Environment behavior
// ============================================================================

#[test]
fn test_environment_is_seeded_with_name() {
    assert_eq!(last("__name__"), Outcome::Value(Value::str("__main__")));
}

#[test]
fn test_bindings_persist_top_to_bottom() {
    let (_, env) = run("a = 1\nb = a + 1\na = b * 10");
    assert_eq!(env.get("a"), Some(&Value::Int(20)));
    assert_eq!(env.get("b"), Some(&Value::Int(2)));
}

#[test]
fn test_delete_removes_binding() {
    let (_, env) = run("a = 1\ndel a");
    assert_eq!(env.get("a"), None);
}

#[test]
fn test_delete_unknown_name_is_captured() {
    assert_eq!(
        last("del ghost"),
        Outcome::Error(RuntimeError::NameError("ghost".into()))
    );
}

#[test]
fn test_unpack_length_mismatch() {
    let Outcome::Error(RuntimeError::ValueError(message)) = last("a, b = 1, 2, 3") else {
        panic!("expected a ValueError outcome");
    };
    assert_eq!(message, "too many values to unpack (expected 2)");
}

#[test]
fn test_nested_subscript_assignment() {
    let (_, env) = run("grid = [[1, 2], [3, 4]]\ngrid[1][0] = 30");
    assert_eq!(
        env.get("grid"),
        Some(&Value::List(vec![
            Value::List(vec![Value::Int(1), Value::Int(2)]),
            Value::List(vec![Value::Int(30), Value::Int(4)]),
        ]))
    );
}

#[test]
fn test_dict_subscript_assignment_inserts() {
    let (_, env) = run("d = {'a': 1}\nd['b'] = 2\nd['a'] = 10");
    assert_eq!(
        env.get("d"),
        Some(&Value::Dict(vec![
            (Value::str("a"), Value::Int(10)),
            (Value::str("b"), Value::Int(2)),
        ]))
    );
}

#[test]
fn test_augmented_subscript() {
    let (_, env) = run("xs = [1, 2]\nxs[1] += 10");
    assert_eq!(
        env.get("xs"),
        Some(&Value::List(vec![Value::Int(1), Value::Int(12)]))
    );
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_true_division_yields_float() {
    assert_eq!(last("3 / 2"), Outcome::Value(Value::Float(1.5)));
}

#[test]
fn test_floor_division_rounds_down() {
    assert_eq!(last("-7 // 2"), Outcome::Value(Value::Int(-4)));
    assert_eq!(last("-7 % 2"), Outcome::Value(Value::Int(1)));
}

#[test]
fn test_string_concat_and_repeat() {
    assert_eq!(last("'ab' + 'c'"), Outcome::Value(Value::str("abc")));
    assert_eq!(last("'ab' * 3"), Outcome::Value(Value::str("ababab")));
}

#[test]
fn test_boolean_operators_return_operands() {
    assert_eq!(last("0 or 'fallback'"), Outcome::Value(Value::str("fallback")));
    assert_eq!(last("1 and 2"), Outcome::Value(Value::Int(2)));
    // The right side must not run when short-circuited.
    assert_eq!(last("0 and missing"), Outcome::Value(Value::Int(0)));
}

#[test]
fn test_comparisons() {
    assert_eq!(last("1 < 2"), Outcome::Value(Value::Bool(true)));
    assert_eq!(last("1 == 1.0"), Outcome::Value(Value::Bool(true)));
    assert_eq!(last("[1, 2] < [1, 3]"), Outcome::Value(Value::Bool(true)));
    assert!(matches!(
        last("1 < 'x'"),
        Outcome::Error(RuntimeError::TypeError(_))
    ));
}

#[test]
fn test_negative_indexing() {
    assert_eq!(last("[1, 2, 3][-1]"), Outcome::Value(Value::Int(3)));
    assert_eq!(
        last("[1, 2, 3][3]"),
        Outcome::Error(RuntimeError::IndexError("list"))
    );
}

#[test]
fn test_dict_lookup_and_key_error() {
    assert_eq!(last("{'a': 1}['a']"), Outcome::Value(Value::Int(1)));
    assert_eq!(
        last("{'a': 1}['b']"),
        Outcome::Error(RuntimeError::KeyError("'b'".to_string()))
    );
}

#[test]
fn test_module_attribute_access() {
    assert_eq!(
        last("import math\nmath.floor(2.5)"),
        Outcome::Value(Value::Int(2))
    );
    assert!(matches!(
        last("import math\nmath.missing"),
        Outcome::Error(RuntimeError::AttributeError(_))
    ));
}

#[test]
fn test_calling_a_non_function() {
    let Outcome::Error(RuntimeError::TypeError(message)) = last("a = 1\na(2)") else {
        panic!("expected a TypeError outcome");
    };
    assert_eq!(message, "'int' object is not callable");
}

#[test]
fn test_unknown_module_import() {
    assert_eq!(
        last("import nope"),
        Outcome::Error(RuntimeError::ModuleNotFound("nope".into()))
    );
}

#[test]
fn test_from_import_of_unknown_name() {
    assert_eq!(
        last("from math import nope"),
        Outcome::Error(RuntimeError::ImportError {
            name: "nope".into(),
            module: "math".into(),
        })
    );
}
