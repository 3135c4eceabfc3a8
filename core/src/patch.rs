//! Tolerant line patching.
//!
//! A mid-edit snapshot usually fails to parse somewhere. Instead of giving
//! up, the minimum-effort recovery here replaces whole lines with empty
//! ones until the rest parses, keeping every surviving line at its
//! original line number so annotations stay attached to the right places.

use crate::ast::Program;
use crate::parser;

/// Replace as few lines as possible with empty ones so the result parses.
///
/// Greedy strategy: find the longest parsable prefix by shrinking one line
/// at a time from the end; keep it verbatim and recurse on the remainder.
/// When not even a single line parses, blank the first line and recurse on
/// the rest. The output always has the same line count as the input and is
/// guaranteed to parse.
///
/// This is a heuristic: it is greedy per prefix search, not globally
/// minimal in the number of blanked lines.
pub fn patch_lines(lines: &[&str]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    patch_into(lines, &mut out);
    debug_assert_eq!(out.len(), lines.len());
    out
}

fn patch_into(lines: &[&str], out: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }

    let mut end = lines.len();
    while end > 0 {
        if parser::parse_lines(&lines[..end]).is_ok() {
            out.extend(lines[..end].iter().map(|line| line.to_string()));
            return patch_into(&lines[end..], out);
        }
        end -= 1;
    }

    // Not even the first line alone parses; blank it and move on.
    tracing::debug!(line = out.len(), "blanked unparseable line");
    out.push(String::new());
    patch_into(&lines[1..], out);
}

/// Patch and parse a snapshot. Cannot fail: blanked lines are
/// syntactically empty, so the patched document always parses.
pub fn parse_tolerant(lines: &[&str]) -> Program {
    let patched = patch_lines(lines);
    let patched_refs: Vec<&str> = patched.iter().map(String::as_str).collect();
    match parser::parse_lines(&patched_refs) {
        Ok(program) => program,
        Err(error) => {
            // By construction unreachable; degrade to an empty program
            // rather than poisoning the evaluation pass.
            debug_assert!(false, "patched document failed to parse: {error}");
            tracing::error!(%error, "patched document failed to parse");
            Program::default()
        }
    }
}
