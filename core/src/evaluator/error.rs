//! Runtime errors raised by evaluated statements.
//!
//! These are captured per statement and stored as that statement's outcome;
//! they never unwind an evaluation pass. Messages follow the conventional
//! phrasing of the script language so annotations read naturally.

use ecow::EcoString;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("name '{0}' is not defined")]
    NameError(EcoString),

    #[error("{0}")]
    TypeError(String),

    #[error("{0}")]
    ValueError(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer division or modulo by zero")]
    IntegerDivisionByZero,

    #[error("float division by zero")]
    FloatDivisionByZero,

    #[error("0.0 cannot be raised to a negative power")]
    ZeroToNegativePower,

    #[error("{0} index out of range")]
    IndexError(&'static str),

    /// Holds the repr of the missing key.
    #[error("{0}")]
    KeyError(String),

    #[error("{0}")]
    AttributeError(String),

    #[error("no module named '{0}'")]
    ModuleNotFound(EcoString),

    #[error("cannot import name '{name}' from '{module}'")]
    ImportError { name: EcoString, module: EcoString },

    #[error("integer overflow")]
    Overflow,
}

impl RuntimeError {
    /// The conventional error class name, used by renderers.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::NameError(_) => "NameError",
            RuntimeError::TypeError(_) => "TypeError",
            RuntimeError::ValueError(_) => "ValueError",
            RuntimeError::DivisionByZero
            | RuntimeError::IntegerDivisionByZero
            | RuntimeError::FloatDivisionByZero
            | RuntimeError::ZeroToNegativePower => "ZeroDivisionError",
            RuntimeError::IndexError(_) => "IndexError",
            RuntimeError::KeyError(_) => "KeyError",
            RuntimeError::AttributeError(_) => "AttributeError",
            RuntimeError::ModuleNotFound(_) => "ModuleNotFoundError",
            RuntimeError::ImportError { .. } => "ImportError",
            RuntimeError::Overflow => "OverflowError",
        }
    }
}
