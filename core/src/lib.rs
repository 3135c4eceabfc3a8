//! Marginalia core — the language and evaluation engine behind live
//! document annotation.
//!
//! The flow, bottom to top: a document snapshot is patched line-wise until
//! it parses ([`patch`]), parsed into top-level statements with physical
//! line spans ([`parser`]), and evaluated statement by statement against a
//! persistent environment with per-statement memoization ([`engine`]). The
//! result is a set of (line, outcome) pairs for the presentation layer to
//! render.
//!
//! This crate knows nothing about editors, timers or rendering; those live
//! in the `marginalia` session crate and `marginalia-fmt`.

pub mod ast;
pub mod cache;
pub mod engine;
pub mod evaluator;
pub mod fingerprint;
pub mod marker;
pub mod outcome;
pub mod parser;
pub mod patch;
pub mod stdlib;
pub mod values;


pub use engine::{Annotation, Engine};
pub use evaluator::{Environment, RuntimeError};
pub use marker::MarkerConfig;
pub use outcome::Outcome;
pub use parser::ParseError;
pub use values::Value;
