//! Structural fingerprints for statements.
//!
//! A fingerprint is a canonical textual dump of a statement's syntax tree.
//! It contains no spans and nothing from the source formatting, so two
//! statements that differ only in whitespace, comments or position in the
//! document produce the same fingerprint. The result cache is keyed on it.

use core::fmt::Write;

use crate::ast::{Expr, Literal, StmtKind, Target, UnaryOp};

/// Render the canonical dump of one statement.
pub fn statement(kind: &StmtKind) -> String {
    let mut out = String::new();
    write_stmt(&mut out, kind);
    out
}

fn write_stmt(out: &mut String, kind: &StmtKind) {
    match kind {
        StmtKind::Expr(expr) => {
            out.push_str("Expr(");
            write_expr(out, expr);
            out.push(')');
        }
        StmtKind::Assign { targets, value } => {
            out.push_str("Assign(targets=[");
            for (i, target) in targets.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_target(out, target);
            }
            out.push_str("],value=");
            write_expr(out, value);
            out.push(')');
        }
        StmtKind::AugAssign { target, op, value } => {
            let _ = write!(out, "AugAssign(op={:?},target=", op);
            write_target(out, target);
            out.push_str(",value=");
            write_expr(out, value);
            out.push(')');
        }
        StmtKind::Import { names } => {
            out.push_str("Import(");
            write_import_names(out, names);
            out.push(')');
        }
        StmtKind::FromImport { module, names } => {
            let _ = write!(out, "FromImport(module={},names=", module);
            write_import_names(out, names);
            out.push(')');
        }
        StmtKind::Delete { names } => {
            out.push_str("Delete(");
            for (i, name) in names.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(name);
            }
            out.push(')');
        }
        StmtKind::Pass => out.push_str("Pass"),
    }
}

fn write_import_names(out: &mut String, names: &[crate::ast::ImportName]) {
    out.push('[');
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&name.name);
        if let Some(alias) = &name.alias {
            let _ = write!(out, " as {}", alias);
        }
    }
    out.push(']');
}

fn write_target(out: &mut String, target: &Target) {
    match target {
        Target::Name(name) => {
            let _ = write!(out, "Name({})", name);
        }
        Target::Tuple(elts) => {
            out.push_str("TupleTarget(");
            for (i, elt) in elts.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_target(out, elt);
            }
            out.push(')');
        }
        Target::Attribute { object, field } => {
            out.push_str("AttrTarget(");
            write_expr(out, object);
            let _ = write!(out, ",{})", field);
        }
        Target::Subscript { object, index } => {
            out.push_str("SubscriptTarget(");
            write_expr(out, object);
            out.push(',');
            write_expr(out, index);
            out.push(')');
        }
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal(lit) => write_literal(out, lit),
        Expr::Ident(name) => {
            let _ = write!(out, "Name({})", name);
        }
        Expr::Unary { op, expr } => {
            let tag = match op {
                UnaryOp::Neg => "Neg",
                UnaryOp::Not => "Not",
            };
            let _ = write!(out, "Unary({},", tag);
            write_expr(out, expr);
            out.push(')');
        }
        Expr::Binary { op, left, right } => {
            let _ = write!(out, "Binary({:?},", op);
            write_expr(out, left);
            out.push(',');
            write_expr(out, right);
            out.push(')');
        }
        Expr::Tuple(elts) => write_seq(out, "Tuple", elts),
        Expr::List(elts) => write_seq(out, "List", elts),
        Expr::Dict(items) => {
            out.push_str("Dict(");
            for (i, (key, value)) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_expr(out, key);
                out.push(':');
                write_expr(out, value);
            }
            out.push(')');
        }
        Expr::Index { object, index } => {
            out.push_str("Index(");
            write_expr(out, object);
            out.push(',');
            write_expr(out, index);
            out.push(')');
        }
        Expr::Attr { object, field } => {
            out.push_str("Attr(");
            write_expr(out, object);
            let _ = write!(out, ",{})", field);
        }
        Expr::Call { func, args } => {
            out.push_str("Call(");
            write_expr(out, func);
            out.push_str(",[");
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_expr(out, arg);
            }
            out.push_str("])");
        }
    }
}

fn write_seq(out: &mut String, tag: &str, elts: &[Expr]) {
    out.push_str(tag);
    out.push('(');
    for (i, elt) in elts.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_expr(out, elt);
    }
    out.push(')');
}

fn write_literal(out: &mut String, lit: &Literal) {
    match lit {
        // `{:?}` keeps float fingerprints canonical (1.0 vs 1 stay distinct).
        Literal::Int(v) => {
            let _ = write!(out, "Int({})", v);
        }
        Literal::Float(v) => {
            let _ = write!(out, "Float({:?})", v);
        }
        Literal::Str(v) => {
            let _ = write!(out, "Str({:?})", v.as_str());
        }
        Literal::Bool(v) => {
            let _ = write!(out, "Bool({})", v);
        }
        Literal::None => out.push_str("None"),
    }
}
