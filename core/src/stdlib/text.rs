//! Text module.
//!
//! Functions: upper, lower, strip, split, join, replace

use ecow::EcoString;

use crate::evaluator::RuntimeError;
use crate::values::{ModuleDef, Value};

use super::expect_arity;

pub(crate) fn module() -> ModuleDef {
    ModuleDef::new(
        "text",
        vec![
            ("upper".into(), Value::function("upper", text_upper)),
            ("lower".into(), Value::function("lower", text_lower)),
            ("strip".into(), Value::function("strip", text_strip)),
            ("split".into(), Value::function("split", text_split)),
            ("join".into(), Value::function("join", text_join)),
            ("replace".into(), Value::function("replace", text_replace)),
        ],
    )
}

fn as_str<'a>(name: &str, value: &'a Value) -> Result<&'a EcoString, RuntimeError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(RuntimeError::TypeError(format!(
            "{}() argument must be str, not '{}'",
            name,
            other.type_name()
        ))),
    }
}

fn text_upper(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("upper", args, 1)?;
    Ok(Value::str(as_str("upper", &args[0])?.to_uppercase()))
}

fn text_lower(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("lower", args, 1)?;
    Ok(Value::str(as_str("lower", &args[0])?.to_lowercase()))
}

fn text_strip(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("strip", args, 1)?;
    Ok(Value::str(as_str("strip", &args[0])?.trim().to_string()))
}

fn text_split(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.is_empty() || args.len() > 2 {
        return Err(RuntimeError::TypeError(format!(
            "split() takes 1 or 2 arguments ({} given)",
            args.len()
        )));
    }
    let s = as_str("split", &args[0])?;
    let parts: Vec<Value> = if args.len() == 2 {
        let sep = as_str("split", &args[1])?;
        if sep.is_empty() {
            return Err(RuntimeError::ValueError("empty separator".to_string()));
        }
        s.split(sep.as_str()).map(Value::str).collect()
    } else {
        s.split_whitespace().map(Value::str).collect()
    };
    Ok(Value::List(parts))
}

fn text_join(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("join", args, 2)?;
    let sep = as_str("join", &args[0])?;
    let items = match &args[1] {
        Value::List(items) | Value::Tuple(items) => items,
        other => {
            return Err(RuntimeError::TypeError(format!(
                "join() second argument must be a sequence, not '{}'",
                other.type_name()
            )));
        }
    };
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let Value::Str(s) = item else {
            return Err(RuntimeError::TypeError(format!(
                "sequence item {}: expected str instance, {} found",
                i,
                item.type_name()
            )));
        };
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(s);
    }
    Ok(Value::str(out))
}

fn text_replace(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("replace", args, 3)?;
    let s = as_str("replace", &args[0])?;
    let from = as_str("replace", &args[1])?;
    let to = as_str("replace", &args[2])?;
    if from.is_empty() {
        return Err(RuntimeError::ValueError("empty substring".to_string()));
    }
    Ok(Value::str(s.replace(from.as_str(), to)))
}
