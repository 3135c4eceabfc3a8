//! Outcome rendering for Marginalia.
//!
//! One formatting rule shared by all three presentation consumers — inline
//! annotation, result injection and clipboard copy:
//!
//! - an error renders as `! ` followed by its conventional representation;
//! - a string value renders as the literal text in block mode and as its
//!   quoted repr in inline mode;
//! - every other value goes through a deterministic, insertion-order
//!   preserving structural pretty-printer.
//!
//! Inline rendering is always single-line safe; block rendering may span
//! multiple lines once a container's flat form exceeds the configured
//! width.

use marginalia_core::{Outcome, Value};

#[cfg(test)]
mod render_test;

/// Rendering configuration.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Column limit above which block rendering breaks containers open.
    pub width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { width: 80 }
    }
}

const INDENT: &str = "  ";

/// Single-line rendering for inline annotations. `None` when there is
/// nothing to show.
pub fn render_inline(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Nothing => None,
        Outcome::Error(error) => Some(format!("! {}: {}", error.kind(), error)),
        Outcome::Value(value) => Some(value.repr()),
    }
}

/// Multi-line rendering for injection, hover popups and other roomy
/// surfaces. `None` when there is nothing to show.
pub fn render_block(outcome: &Outcome, options: &RenderOptions) -> Option<String> {
    match outcome {
        Outcome::Nothing => None,
        Outcome::Error(error) => Some(format!("! {}: {}", error.kind(), error)),
        Outcome::Value(Value::Str(s)) => Some(s.to_string()),
        Outcome::Value(value) => Some(pretty(value, options.width, 0)),
    }
}

/// Clipboard rendering: a plain string value is copied raw, everything
/// else uses the inline form.
pub fn render_clipboard(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Value(Value::Str(s)) => Some(s.to_string()),
        other => render_inline(other),
    }
}

/// Structural pretty-printer: the flat repr when it fits, otherwise the
/// container is broken open one element per line.
fn pretty(value: &Value, width: usize, depth: usize) -> String {
    let flat = value.repr();
    if flat.len() + depth * INDENT.len() <= width {
        return flat;
    }

    let pad = INDENT.repeat(depth + 1);
    let close_pad = INDENT.repeat(depth);
    match value {
        Value::List(items) => wrap_seq("[", "]", items, width, depth, &pad, &close_pad),
        Value::Tuple(items) => wrap_seq("(", ")", items, width, depth, &pad, &close_pad),
        Value::Dict(items) => {
            let mut out = String::from("{\n");
            for (key, val) in items {
                out.push_str(&pad);
                out.push_str(&key.repr());
                out.push_str(": ");
                out.push_str(&pretty(val, width, depth + 1));
                out.push_str(",\n");
            }
            out.push_str(&close_pad);
            out.push('}');
            out
        }
        // Scalars have no structure to break open.
        _ => flat,
    }
}

fn wrap_seq(
    open: &str,
    close: &str,
    items: &[Value],
    width: usize,
    depth: usize,
    pad: &str,
    close_pad: &str,
) -> String {
    let mut out = String::from(open);
    out.push('\n');
    for item in items {
        out.push_str(pad);
        out.push_str(&pretty(item, width, depth + 1));
        out.push_str(",\n");
    }
    out.push_str(close_pad);
    out.push_str(close);
    out
}
