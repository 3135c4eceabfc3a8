//! Native builtins and importable modules.
//!
//! Builtins are resolved as a fallback after the environment, so they are
//! always reachable but never pollute the namespace. Modules enter the
//! environment only through import statements.

mod builtins;
mod math;
mod text;


use std::sync::Arc;

use lazy_static::lazy_static;

use crate::evaluator::RuntimeError;
use crate::values::{ModuleDef, Value};

lazy_static! {
    static ref MATH: Arc<ModuleDef> = Arc::new(math::module());
    static ref TEXT: Arc<ModuleDef> = Arc::new(text::module());
}

/// Resolve an importable module by name.
pub fn module(name: &str) -> Option<Value> {
    match name {
        "math" => Some(Value::Module(Arc::clone(&MATH))),
        "text" => Some(Value::Module(Arc::clone(&TEXT))),
        _ => None,
    }
}

/// Resolve an always-available builtin by name.
pub fn builtin(name: &str) -> Option<Value> {
    builtins::lookup(name)
}

/// Shared arity check for native functions.
pub(crate) fn expect_arity(
    name: &str,
    args: &[Value],
    expected: usize,
) -> Result<(), RuntimeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::TypeError(format!(
            "{}() takes exactly {} argument{} ({} given)",
            name,
            expected,
            if expected == 1 { "" } else { "s" },
            args.len()
        )))
    }
}
