//! The per-document evaluation engine.
//!
//! Owns the persistent environment, the result cache and the parse memo of
//! one document session, and turns snapshots into (line, outcome)
//! annotations.

use core::ops::Range;
use std::sync::Arc;

use crate::ast::{Program, Stmt};
use crate::cache::ResultCache;
use crate::evaluator::{Environment, statement_outcome};
use crate::fingerprint;
use crate::marker::MarkerConfig;
use crate::outcome::Outcome;
use crate::patch;

/// One annotation: a marked line and the outcome attributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub line: usize,
    pub outcome: Outcome,
}

/// Patch-and-parse memo of the most recent snapshot.
///
/// One slot is enough: consecutive passes and cursor operations between
/// edits keep asking for the same snapshot, and any edit invalidates it.
struct ParseMemo {
    lines: Vec<String>,
    program: Arc<Program>,
}

/// Evaluation engine of one document session.
///
/// Exactly one engine exists per open document. The environment and cache
/// persist across passes and are replaced only by [`Engine::reset`].
#[derive(Default)]
pub struct Engine {
    env: Environment,
    cache: ResultCache,
    memo: Option<ParseMemo>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all evaluation state. The parse memo survives; parsing does not
    /// depend on the environment.
    pub fn reset(&mut self) {
        self.env = Environment::new();
        self.cache.clear();
    }

    /// Read access to the environment, mainly for tests and inspection.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Run one evaluation pass over a snapshot.
    ///
    /// Produces one annotation per marked line whose attributed outcome is
    /// not [`Outcome::Nothing`]. A statement owns the marked lines from its
    /// own first line up to the next statement's first line (or the end of
    /// the document for the last statement), so dangling marks directly
    /// below a statement belong to it.
    pub fn evaluate(&mut self, lines: &[String], markers: &MarkerConfig) -> Vec<Annotation> {
        let program = self.program_for(lines);
        let marked: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| markers.is_marked(line))
            .map(|(index, _)| index)
            .collect();

        tracing::debug!(
            statements = program.statements.len(),
            marked = marked.len(),
            "evaluation pass"
        );

        let mut annotations = Vec::new();
        for (index, stmt) in program.statements.iter().enumerate() {
            let outcome = self.evaluate_statement(index, stmt);
            if outcome.is_nothing() {
                continue;
            }
            let end = program
                .statements
                .get(index + 1)
                .map(|next| next.span.start)
                .unwrap_or(lines.len());
            for &line in marked.iter() {
                if line >= stmt.span.start && line < end {
                    annotations.push(Annotation {
                        line,
                        outcome: outcome.clone(),
                    });
                }
            }
        }
        annotations
    }

    /// Outcome and span of the statement covering `cursor_line`, if any.
    ///
    /// Statements are evaluated in order up to the hit, so the cache stays
    /// warm exactly as in a full pass.
    pub fn statement_at(
        &mut self,
        lines: &[String],
        cursor_line: usize,
    ) -> Option<(Outcome, Range<usize>)> {
        let program = self.program_for(lines);
        for (index, stmt) in program.statements.iter().enumerate() {
            let outcome = self.evaluate_statement(index, stmt);
            if stmt.span.contains(&cursor_line) {
                return Some((outcome, stmt.span.clone()));
            }
        }
        None
    }

    fn program_for(&mut self, lines: &[String]) -> Arc<Program> {
        if let Some(memo) = &self.memo {
            if memo.lines == lines {
                return Arc::clone(&memo.program);
            }
        }
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let program = Arc::new(patch::parse_tolerant(&line_refs));
        self.memo = Some(ParseMemo {
            lines: lines.to_vec(),
            program: Arc::clone(&program),
        });
        program
    }

    /// Evaluate one statement at its position, consulting the cache.
    fn evaluate_statement(&mut self, index: usize, stmt: &Stmt) -> Outcome {
        let fingerprint = fingerprint::statement(&stmt.kind);
        if let Some(hit) = self.cache.lookup(index, &fingerprint) {
            tracing::trace!(index, "cache hit");
            return hit.clone();
        }
        let outcome = statement_outcome(&mut self.env, &stmt.kind);
        self.cache.record(index, fingerprint, outcome.clone());
        outcome
    }
}
