//! The display result of evaluating one statement.

use crate::evaluator::RuntimeError;
use crate::values::Value;

/// Tagged result of one statement: a value to show, a captured error, or
/// nothing worth showing (compound targets, effect-only statements, missing
/// post-execution bindings).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Error(RuntimeError),
    Nothing,
}

impl Outcome {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Outcome::Nothing)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RuntimeError> {
        match self {
            Outcome::Error(error) => Some(error),
            _ => None,
        }
    }
}
