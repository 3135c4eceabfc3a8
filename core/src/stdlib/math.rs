//! Math module.
//!
//! Constants: pi, e, tau, inf, nan
//! Functions: sqrt, floor, ceil, round, pow, log, exp, sin, cos, tan

use crate::evaluator::RuntimeError;
use crate::values::{ModuleDef, Value};

use super::expect_arity;

pub(crate) fn module() -> ModuleDef {
    ModuleDef::new(
        "math",
        vec![
            ("pi".into(), Value::Float(core::f64::consts::PI)),
            ("e".into(), Value::Float(core::f64::consts::E)),
            ("tau".into(), Value::Float(core::f64::consts::TAU)),
            ("inf".into(), Value::Float(f64::INFINITY)),
            ("nan".into(), Value::Float(f64::NAN)),
            ("sqrt".into(), Value::function("sqrt", math_sqrt)),
            ("floor".into(), Value::function("floor", math_floor)),
            ("ceil".into(), Value::function("ceil", math_ceil)),
            ("round".into(), Value::function("round", math_round)),
            ("pow".into(), Value::function("pow", math_pow)),
            ("log".into(), Value::function("log", math_log)),
            ("exp".into(), Value::function("exp", math_exp)),
            ("sin".into(), Value::function("sin", math_sin)),
            ("cos".into(), Value::function("cos", math_cos)),
            ("tan".into(), Value::function("tan", math_tan)),
        ],
    )
}

fn as_float(value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Int(v) => Ok(*v as f64),
        Value::Bool(v) => Ok(f64::from(u8::from(*v))),
        Value::Float(v) => Ok(*v),
        other => Err(RuntimeError::TypeError(format!(
            "must be real number, not {}",
            other.type_name()
        ))),
    }
}

fn as_int_result(value: f64) -> Result<Value, RuntimeError> {
    if !value.is_finite() || value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(RuntimeError::Overflow);
    }
    Ok(Value::Int(value as i64))
}

fn math_sqrt(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("sqrt", args, 1)?;
    let value = as_float(&args[0])?;
    if value < 0.0 {
        return Err(RuntimeError::ValueError("math domain error".to_string()));
    }
    Ok(Value::Float(value.sqrt()))
}

fn math_floor(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("floor", args, 1)?;
    as_int_result(as_float(&args[0])?.floor())
}

fn math_ceil(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("ceil", args, 1)?;
    as_int_result(as_float(&args[0])?.ceil())
}

/// Rounds half to even, matching the conventional behavior.
fn math_round(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("round", args, 1)?;
    as_int_result(as_float(&args[0])?.round_ties_even())
}

fn math_pow(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("pow", args, 2)?;
    let base = as_float(&args[0])?;
    let exp = as_float(&args[1])?;
    Ok(Value::Float(base.powf(exp)))
}

fn math_log(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.is_empty() || args.len() > 2 {
        return Err(RuntimeError::TypeError(format!(
            "log() takes 1 or 2 arguments ({} given)",
            args.len()
        )));
    }
    let value = as_float(&args[0])?;
    if value <= 0.0 {
        return Err(RuntimeError::ValueError("math domain error".to_string()));
    }
    if args.len() == 2 {
        let base = as_float(&args[1])?;
        if base <= 0.0 || base == 1.0 {
            return Err(RuntimeError::ValueError("math domain error".to_string()));
        }
        Ok(Value::Float(value.log(base)))
    } else {
        Ok(Value::Float(value.ln()))
    }
}

fn math_exp(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("exp", args, 1)?;
    Ok(Value::Float(as_float(&args[0])?.exp()))
}

fn math_sin(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("sin", args, 1)?;
    Ok(Value::Float(as_float(&args[0])?.sin()))
}

fn math_cos(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("cos", args, 1)?;
    Ok(Value::Float(as_float(&args[0])?.cos()))
}

fn math_tan(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("tan", args, 1)?;
    Ok(Value::Float(as_float(&args[0])?.tan()))
}
