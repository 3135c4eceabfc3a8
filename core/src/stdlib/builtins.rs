//! Always-available builtin functions.

use crate::evaluator::RuntimeError;
use crate::evaluator::operators;
use crate::values::Value;

use super::expect_arity;

pub(crate) fn lookup(name: &str) -> Option<Value> {
    Some(match name {
        "len" => Value::function("len", len),
        "abs" => Value::function("abs", abs),
        "min" => Value::function("min", min),
        "max" => Value::function("max", max),
        "sum" => Value::function("sum", sum),
        "range" => Value::function("range", range),
        "repr" => Value::function("repr", repr),
        "str" => Value::function("str", str_),
        "int" => Value::function("int", int),
        "float" => Value::function("float", float),
        "sorted" => Value::function("sorted", sorted),
        _ => return None,
    })
}

fn len(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("len", args, 1)?;
    let length = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(items) | Value::Tuple(items) => items.len(),
        Value::Dict(items) => items.len(),
        other => {
            return Err(RuntimeError::TypeError(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )));
        }
    };
    Ok(Value::Int(length as i64))
}

fn abs(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("abs", args, 1)?;
    match &args[0] {
        Value::Int(v) => v.checked_abs().map(Value::Int).ok_or(RuntimeError::Overflow),
        Value::Bool(v) => Ok(Value::Int(i64::from(*v))),
        Value::Float(v) => Ok(Value::Float(v.abs())),
        other => Err(RuntimeError::TypeError(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

/// Items iterated by `min`/`max`/`sum`/`sorted`: sequences element-wise,
/// strings character-wise, dicts by key.
fn iterable_items(name: &str, value: &Value) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::List(items) | Value::Tuple(items) => Ok(items.clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
        Value::Dict(items) => Ok(items.iter().map(|(k, _)| k.clone()).collect()),
        other => Err(RuntimeError::TypeError(format!(
            "{}() argument must be iterable, not '{}'",
            name,
            other.type_name()
        ))),
    }
}

fn extremum(name: &str, args: &[Value], keep_left: core::cmp::Ordering) -> Result<Value, RuntimeError> {
    let items = match args.len() {
        0 => {
            return Err(RuntimeError::TypeError(format!(
                "{}() expected at least 1 argument, got 0",
                name
            )));
        }
        1 => iterable_items(name, &args[0])?,
        _ => args.to_vec(),
    };
    let mut best: Option<Value> = None;
    for item in items {
        best = Some(match best {
            None => item,
            Some(current) => {
                if operators::compare(&item, &current)? == keep_left {
                    item
                } else {
                    current
                }
            }
        });
    }
    best.ok_or_else(|| RuntimeError::ValueError(format!("{}() arg is an empty sequence", name)))
}

fn min(args: &[Value]) -> Result<Value, RuntimeError> {
    extremum("min", args, core::cmp::Ordering::Less)
}

fn max(args: &[Value]) -> Result<Value, RuntimeError> {
    extremum("max", args, core::cmp::Ordering::Greater)
}

fn sum(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("sum", args, 1)?;
    let mut total = Value::Int(0);
    for item in iterable_items("sum", &args[0])? {
        total = operators::binary(crate::ast::BinaryOp::Add, &total, &item)?;
    }
    Ok(total)
}

fn range(args: &[Value]) -> Result<Value, RuntimeError> {
    fn int_arg(value: &Value) -> Result<i64, RuntimeError> {
        match value {
            Value::Int(v) => Ok(*v),
            Value::Bool(v) => Ok(i64::from(*v)),
            other => Err(RuntimeError::TypeError(format!(
                "'{}' object cannot be interpreted as an integer",
                other.type_name()
            ))),
        }
    }

    let (start, stop, step) = match args.len() {
        1 => (0, int_arg(&args[0])?, 1),
        2 => (int_arg(&args[0])?, int_arg(&args[1])?, 1),
        3 => (int_arg(&args[0])?, int_arg(&args[1])?, int_arg(&args[2])?),
        n => {
            return Err(RuntimeError::TypeError(format!(
                "range expected 1 to 3 arguments, got {}",
                n
            )));
        }
    };
    if step == 0 {
        return Err(RuntimeError::ValueError(
            "range() arg 3 must not be zero".to_string(),
        ));
    }
    let mut items = Vec::new();
    let mut at = start;
    while (step > 0 && at < stop) || (step < 0 && at > stop) {
        items.push(Value::Int(at));
        at += step;
    }
    Ok(Value::List(items))
}

fn repr(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("repr", args, 1)?;
    Ok(Value::str(args[0].repr()))
}

fn str_(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("str", args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Str(s.clone())),
        other => Ok(Value::str(other.repr())),
    }
}

fn int(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("int", args, 1)?;
    match &args[0] {
        Value::Int(v) => Ok(Value::Int(*v)),
        Value::Bool(v) => Ok(Value::Int(i64::from(*v))),
        Value::Float(v) => {
            if v.is_nan() {
                return Err(RuntimeError::ValueError(
                    "cannot convert float NaN to integer".to_string(),
                ));
            }
            if v.is_infinite() {
                return Err(RuntimeError::Overflow);
            }
            let truncated = v.trunc();
            if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
                return Err(RuntimeError::Overflow);
            }
            Ok(Value::Int(truncated as i64))
        }
        Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            RuntimeError::ValueError(format!(
                "invalid literal for int() with base 10: {}",
                args[0].repr()
            ))
        }),
        other => Err(RuntimeError::TypeError(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn float(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("float", args, 1)?;
    match &args[0] {
        Value::Int(v) => Ok(Value::Float(*v as f64)),
        Value::Bool(v) => Ok(Value::Float(f64::from(u8::from(*v)))),
        Value::Float(v) => Ok(Value::Float(*v)),
        Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            RuntimeError::ValueError(format!("could not convert string to float: {}", args[0].repr()))
        }),
        other => Err(RuntimeError::TypeError(format!(
            "float() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn sorted(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("sorted", args, 1)?;
    let mut items = iterable_items("sorted", &args[0])?;
    let mut error = None;
    items.sort_by(|a, b| match operators::compare(a, b) {
        Ok(ordering) => ordering,
        Err(e) => {
            error.get_or_insert(e);
            core::cmp::Ordering::Equal
        }
    });
    match error {
        Some(error) => Err(error),
        None => Ok(Value::List(items)),
    }
}
