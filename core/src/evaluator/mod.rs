//! Tree-walking evaluation of top-level statements.
//!
//! ## Design principles
//!
//! - **Never panic**: evaluated code is arbitrary user input; every failure
//!   is a returned [`RuntimeError`].
//! - **Captured, not propagated**: [`statement_outcome`] turns errors into
//!   outcomes so one failing statement never aborts an evaluation pass.
//! - **Persistent state**: all execution goes through one [`Environment`]
//!   owned by the document session.

mod env;
mod error;
mod eval;
pub(crate) mod operators;

#[cfg(test)]
mod eval_test;

pub use env::Environment;
pub use error::RuntimeError;
pub use eval::{Evaluator, statement_outcome};
