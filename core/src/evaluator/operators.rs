//! Binary operators, comparisons, equality and indexing over values.

use core::cmp::Ordering;

use crate::ast::BinaryOp;
use crate::values::Value;

use super::RuntimeError;

enum Number {
    Int(i64),
    Float(f64),
}

/// Numeric view of a value; `bool` counts as an integer.
fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Int(v) => Some(Number::Int(*v)),
        Value::Bool(v) => Some(Number::Int(i64::from(*v))),
        Value::Float(v) => Some(Number::Float(*v)),
        _ => None,
    }
}

/// Apply a binary operator.
///
/// `And`/`Or` are short-circuited by the evaluator before reaching this
/// point; the arms here only serve direct callers with both operands
/// already evaluated.
pub(crate) fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::And => Ok(if left.is_truthy() {
            right.clone()
        } else {
            left.clone()
        }),
        BinaryOp::Or => Ok(if left.is_truthy() {
            left.clone()
        } else {
            right.clone()
        }),
        BinaryOp::Eq => Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::Ne => Ok(Value::Bool(!values_equal(left, right))),
        BinaryOp::Lt => comparison(op, left, right, |o| o == Ordering::Less),
        BinaryOp::Le => comparison(op, left, right, |o| o != Ordering::Greater),
        BinaryOp::Gt => comparison(op, left, right, |o| o == Ordering::Greater),
        BinaryOp::Ge => comparison(op, left, right, |o| o != Ordering::Less),
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic(op, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => mul(left, right),
        BinaryOp::Div => div(left, right),
        BinaryOp::FloorDiv => floor_div(left, right),
        BinaryOp::Mod => modulo(left, right),
        BinaryOp::Pow => pow(left, right),
    }
}

fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::TypeError(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

fn comparison(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    accept: impl Fn(Ordering) -> bool,
) -> Result<Value, RuntimeError> {
    // An unordered result (NaN somewhere) fails every strict comparison.
    Ok(Value::Bool(match partial_compare(op, left, right)? {
        Some(ordering) => accept(ordering),
        None => false,
    }))
}

fn partial_compare(
    op: BinaryOp,
    left: &Value,
    right: &Value,
) -> Result<Option<Ordering>, RuntimeError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                if !values_equal(x, y) {
                    return partial_compare(op, x, y);
                }
            }
            Ok(Some(a.len().cmp(&b.len())))
        }
        _ => match (as_number(left), as_number(right)) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => Ok(Some(a.cmp(&b))),
            (Some(a), Some(b)) => Ok(to_float(a).partial_cmp(&to_float(b))),
            _ => Err(RuntimeError::TypeError(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                op.symbol(),
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

/// Total ordering used by `sorted`/`min`/`max`; unordered pairs (NaN)
/// collapse to `Equal`.
pub(crate) fn compare(left: &Value, right: &Value) -> Result<Ordering, RuntimeError> {
    Ok(partial_compare(BinaryOp::Lt, left, right)?.unwrap_or(Ordering::Equal))
}

fn to_float(n: Number) -> f64 {
    match n {
        Number::Int(v) => v as f64,
        Number::Float(v) => v,
    }
}

/// Structural equality with numeric cross-type comparison (`1 == 1.0`,
/// `True == 1`). Dicts compare order-insensitively.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Value::Dict(a), Value::Dict(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, value)| {
                    b.iter()
                        .any(|(k, v)| values_equal(key, k) && values_equal(value, v))
                })
        }
        (Value::Module(a), Value::Module(b)) => a.name() == b.name(),
        (Value::Function(a), Value::Function(b)) => a == b,
        _ => match (as_number(left), as_number(right)) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
            (Some(a), Some(b)) => to_float(a) == to_float(b),
            _ => false,
        },
    }
}

fn arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match (as_number(left), as_number(right)) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => {
            int_op(a, b).map(Value::Int).ok_or(RuntimeError::Overflow)
        }
        (Some(a), Some(b)) => Ok(Value::Float(float_op(to_float(a), to_float(b)))),
        _ => Err(unsupported(op, left, right)),
    }
}

fn add(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => {
            let mut out = String::with_capacity(a.len() + b.len());
            out.push_str(a);
            out.push_str(b);
            Ok(Value::str(out))
        }
        (Value::List(a), Value::List(b)) => {
            Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
        }
        (Value::Tuple(a), Value::Tuple(b)) => {
            Ok(Value::Tuple(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => arithmetic(BinaryOp::Add, left, right, i64::checked_add, |a, b| a + b),
    }
}

fn mul(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    fn repeat_count(value: &Value) -> Option<usize> {
        match value {
            Value::Int(n) => Some((*n).max(0) as usize),
            Value::Bool(b) => Some(usize::from(*b)),
            _ => None,
        }
    }

    match (left, right) {
        (Value::Str(s), n) | (n, Value::Str(s)) if repeat_count(n).is_some() => {
            let count = repeat_count(n).unwrap_or(0);
            Ok(Value::str(s.repeat(count)))
        }
        (Value::List(items), n) | (n, Value::List(items)) if repeat_count(n).is_some() => {
            let count = repeat_count(n).unwrap_or(0);
            let mut out = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                out.extend(items.iter().cloned());
            }
            Ok(Value::List(out))
        }
        (Value::Tuple(items), n) | (n, Value::Tuple(items)) if repeat_count(n).is_some() => {
            let count = repeat_count(n).unwrap_or(0);
            let mut out = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                out.extend(items.iter().cloned());
            }
            Ok(Value::Tuple(out))
        }
        _ => arithmetic(BinaryOp::Mul, left, right, i64::checked_mul, |a, b| a * b),
    }
}

fn div(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (as_number(left), as_number(right)) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => {
            if b == 0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                // True division always yields a float.
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        (Some(a), Some(b)) => {
            let b = to_float(b);
            if b == 0.0 {
                Err(RuntimeError::FloatDivisionByZero)
            } else {
                Ok(Value::Float(to_float(a) / b))
            }
        }
        _ => Err(unsupported(BinaryOp::Div, left, right)),
    }
}

fn floor_div(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (as_number(left), as_number(right)) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => {
            if b == 0 {
                return Err(RuntimeError::IntegerDivisionByZero);
            }
            let quotient = a / b;
            let remainder = a % b;
            // Round toward negative infinity, not toward zero.
            if remainder != 0 && (remainder < 0) != (b < 0) {
                Ok(Value::Int(quotient - 1))
            } else {
                Ok(Value::Int(quotient))
            }
        }
        (Some(a), Some(b)) => {
            let b = to_float(b);
            if b == 0.0 {
                Err(RuntimeError::FloatDivisionByZero)
            } else {
                Ok(Value::Float((to_float(a) / b).floor()))
            }
        }
        _ => Err(unsupported(BinaryOp::FloorDiv, left, right)),
    }
}

fn modulo(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (as_number(left), as_number(right)) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => {
            if b == 0 {
                return Err(RuntimeError::IntegerDivisionByZero);
            }
            let remainder = a % b;
            // The result takes the sign of the divisor.
            if remainder != 0 && (remainder < 0) != (b < 0) {
                Ok(Value::Int(remainder + b))
            } else {
                Ok(Value::Int(remainder))
            }
        }
        (Some(a), Some(b)) => {
            let b = to_float(b);
            if b == 0.0 {
                return Err(RuntimeError::FloatDivisionByZero);
            }
            let remainder = to_float(a) % b;
            if remainder != 0.0 && (remainder < 0.0) != (b < 0.0) {
                Ok(Value::Float(remainder + b))
            } else {
                Ok(Value::Float(remainder))
            }
        }
        _ => Err(unsupported(BinaryOp::Mod, left, right)),
    }
}

fn pow(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (as_number(left), as_number(right)) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => {
            if b >= 0 {
                let exp = u32::try_from(b).map_err(|_| RuntimeError::Overflow)?;
                a.checked_pow(exp).map(Value::Int).ok_or(RuntimeError::Overflow)
            } else if a == 0 {
                Err(RuntimeError::ZeroToNegativePower)
            } else {
                Ok(Value::Float((a as f64).powf(b as f64)))
            }
        }
        (Some(a), Some(b)) => {
            let (base, exp) = (to_float(a), to_float(b));
            if base == 0.0 && exp < 0.0 {
                Err(RuntimeError::ZeroToNegativePower)
            } else {
                Ok(Value::Float(base.powf(exp)))
            }
        }
        _ => Err(unsupported(BinaryOp::Pow, left, right)),
    }
}

/// Subscript read: `container[index]`.
pub(crate) fn index(container: &Value, index: &Value) -> Result<Value, RuntimeError> {
    match container {
        Value::List(items) => sequence_index(items, index, "list").cloned(),
        Value::Tuple(items) => sequence_index(items, index, "tuple").cloned(),
        Value::Str(s) => {
            let position = int_index(index)
                .ok_or_else(|| sequence_index_type_error("str", index))?;
            let chars: Vec<char> = s.chars().collect();
            let at = normalize_index(position, chars.len())
                .ok_or(RuntimeError::IndexError("string"))?;
            Ok(Value::str(chars[at].to_string()))
        }
        Value::Dict(items) => items
            .iter()
            .find(|(key, _)| values_equal(key, index))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| RuntimeError::KeyError(index.repr())),
        _ => Err(RuntimeError::TypeError(format!(
            "'{}' object is not subscriptable",
            container.type_name()
        ))),
    }
}

fn sequence_index<'a>(
    items: &'a [Value],
    index: &Value,
    kind: &'static str,
) -> Result<&'a Value, RuntimeError> {
    let position = int_index(index).ok_or_else(|| sequence_index_type_error(kind, index))?;
    let at = normalize_index(position, items.len()).ok_or(RuntimeError::IndexError(kind))?;
    Ok(&items[at])
}

fn sequence_index_type_error(kind: &'static str, index: &Value) -> RuntimeError {
    RuntimeError::TypeError(format!(
        "{} indices must be integers, not {}",
        kind,
        index.type_name()
    ))
}

fn int_index(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        Value::Bool(v) => Some(i64::from(*v)),
        _ => None,
    }
}

/// Map a possibly negative index onto `0..len`.
pub(crate) fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let at = if index < 0 { index + len } else { index };
    if (0..len).contains(&at) {
        Some(at as usize)
    } else {
        None
    }
}
