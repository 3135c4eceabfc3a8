//! Unit tests for outcome rendering.

use pretty_assertions::assert_eq;

use marginalia_core::{Outcome, RuntimeError, Value};

use super::{RenderOptions, render_block, render_clipboard, render_inline};

fn narrow(width: usize) -> RenderOptions {
    RenderOptions { width }
}

#[test]
fn test_nothing_renders_nothing() {
    assert_eq!(render_inline(&Outcome::Nothing), None);
    assert_eq!(render_block(&Outcome::Nothing, &RenderOptions::default()), None);
    assert_eq!(render_clipboard(&Outcome::Nothing), None);
}

#[test]
fn test_error_rendering_is_shared() {
    let outcome = Outcome::Error(RuntimeError::DivisionByZero);
    let expected = "! ZeroDivisionError: division by zero";
    assert_eq!(render_inline(&outcome).as_deref(), Some(expected));
    assert_eq!(
        render_block(&outcome, &RenderOptions::default()).as_deref(),
        Some(expected)
    );
    assert_eq!(render_clipboard(&outcome).as_deref(), Some(expected));
}

#[test]
fn test_string_value_quoted_inline_raw_in_block() {
    let outcome = Outcome::Value(Value::str("two\nlines"));
    assert_eq!(render_inline(&outcome).as_deref(), Some("'two\\nlines'"));
    assert_eq!(
        render_block(&outcome, &RenderOptions::default()).as_deref(),
        Some("two\nlines")
    );
    // Clipboard gets the raw string, unquoted.
    assert_eq!(render_clipboard(&outcome).as_deref(), Some("two\nlines"));
}

#[test]
fn test_inline_is_always_single_line() {
    let outcome = Outcome::Value(Value::List(vec![
        Value::str("a\nb"),
        Value::Int(1),
        Value::Int(2),
    ]));
    let rendered = render_inline(&outcome).expect("no rendering");
    assert!(!rendered.contains('\n'));
    assert_eq!(rendered, "['a\\nb', 1, 2]");
}

#[test]
fn test_block_keeps_flat_form_when_it_fits() {
    let outcome = Outcome::Value(Value::List(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(
        render_block(&outcome, &RenderOptions::default()).as_deref(),
        Some("[1, 2]")
    );
}

#[test]
fn test_block_breaks_wide_containers() {
    let outcome = Outcome::Value(Value::List(vec![
        Value::Int(1),
        Value::Int(2),
        Value::Int(3),
    ]));
    assert_eq!(
        render_block(&outcome, &narrow(6)).as_deref(),
        Some("[\n  1,\n  2,\n  3,\n]")
    );
}

#[test]
fn test_block_preserves_dict_order() {
    let outcome = Outcome::Value(Value::Dict(vec![
        (Value::str("zz"), Value::Int(1)),
        (Value::str("aa"), Value::Int(2)),
    ]));
    assert_eq!(
        render_block(&outcome, &narrow(8)).as_deref(),
        Some("{\n  'zz': 1,\n  'aa': 2,\n}")
    );
}

#[test]
fn test_nested_breaking() {
    let inner = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    let outcome = Outcome::Value(Value::List(vec![inner.clone(), inner]));
    let rendered = render_block(&outcome, &narrow(10)).expect("no rendering");
    assert_eq!(
        rendered,
        "[\n  [\n    1,\n    2,\n    3,\n  ],\n  [\n    1,\n    2,\n    3,\n  ],\n]"
    );
}
