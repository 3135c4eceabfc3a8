//! Unit tests for parsing and lowering.

use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::ast::{BinaryOp, Expr, Literal, StmtKind, Target, UnaryOp};
use crate::parser::{ParseError, parse_lines, parse_source};

fn only_statement(source: &str) -> StmtKind {
    let program = parse_source(source).expect("parsing failed");
    assert_eq!(program.statements.len(), 1, "expected one statement");
    program.statements[0].kind.clone()
}

fn int(value: i64) -> Expr {
    Expr::Literal(Literal::Int(value))
}

fn ident(name: &str) -> Expr {
    Expr::Ident(name.into())
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_simple_assignment() {
    assert_eq!(
        only_statement("a = 1"),
        StmtKind::Assign {
            targets: vec![Target::Name("a".into())],
            value: int(1),
        }
    );
}

#[test]
fn test_tuple_assignment() {
    assert_eq!(
        only_statement("a, b = 1, 2"),
        StmtKind::Assign {
            targets: vec![Target::Tuple(vec![
                Target::Name("a".into()),
                Target::Name("b".into()),
            ])],
            value: Expr::Tuple(vec![int(1), int(2)]),
        }
    );
}

#[test]
fn test_chained_assignment() {
    assert_eq!(
        only_statement("a = b = 1"),
        StmtKind::Assign {
            targets: vec![Target::Name("a".into()), Target::Name("b".into())],
            value: int(1),
        }
    );
}

#[test]
fn test_subscript_assignment_target() {
    assert_eq!(
        only_statement("xs[0] = 5"),
        StmtKind::Assign {
            targets: vec![Target::Subscript {
                object: Box::new(ident("xs")),
                index: Box::new(int(0)),
            }],
            value: int(5),
        }
    );
}

#[test]
fn test_attribute_assignment_target() {
    assert_eq!(
        only_statement("obj.field = 1"),
        StmtKind::Assign {
            targets: vec![Target::Attribute {
                object: Box::new(ident("obj")),
                field: "field".into(),
            }],
            value: int(1),
        }
    );
}

#[test]
fn test_augmented_assignment() {
    assert_eq!(
        only_statement("a += 2"),
        StmtKind::AugAssign {
            target: Target::Name("a".into()),
            op: BinaryOp::Add,
            value: int(2),
        }
    );
    assert_eq!(
        only_statement("a //= 2"),
        StmtKind::AugAssign {
            target: Target::Name("a".into()),
            op: BinaryOp::FloorDiv,
            value: int(2),
        }
    );
    assert_eq!(
        only_statement("a **= 2"),
        StmtKind::AugAssign {
            target: Target::Name("a".into()),
            op: BinaryOp::Pow,
            value: int(2),
        }
    );
}

#[test]
fn test_import() {
    let StmtKind::Import { names } = only_statement("import math") else {
        panic!("expected import");
    };
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].name, "math");
    assert_eq!(names[0].alias, None);
}

#[test]
fn test_import_with_alias_list() {
    let StmtKind::Import { names } = only_statement("import math as m, text") else {
        panic!("expected import");
    };
    assert_eq!(names.len(), 2);
    assert_eq!(names[0].binding(), "m");
    assert_eq!(names[1].binding(), "text");
}

#[test]
fn test_from_import() {
    let StmtKind::FromImport { module, names } = only_statement("from math import sqrt, pi as p")
    else {
        panic!("expected from-import");
    };
    assert_eq!(module, "math");
    assert_eq!(names[0].binding(), "sqrt");
    assert_eq!(names[1].name, "pi");
    assert_eq!(names[1].binding(), "p");
}

#[test]
fn test_del_and_pass() {
    assert_eq!(
        only_statement("del a, b"),
        StmtKind::Delete {
            names: vec!["a".into(), "b".into()],
        }
    );
    assert_eq!(only_statement("pass"), StmtKind::Pass);
}

#[test]
fn test_bare_tuple_expression() {
    assert_eq!(
        only_statement("1, 2"),
        StmtKind::Expr(Expr::Tuple(vec![int(1), int(2)]))
    );
    assert_eq!(
        only_statement("1,"),
        StmtKind::Expr(Expr::Tuple(vec![int(1)]))
    );
}

#[test]
fn test_keyword_prefixed_names_are_not_keywords() {
    assert_eq!(
        only_statement("imports = 1"),
        StmtKind::Assign {
            targets: vec![Target::Name("imports".into())],
            value: int(1),
        }
    );
    // `important` must not parse as `import ant`.
    assert!(matches!(only_statement("important"), StmtKind::Expr(_)));
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_precedence_mul_over_add() {
    assert_eq!(
        only_statement("1 + 2 * 3"),
        StmtKind::Expr(Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(int(1)),
            right: Box::new(Expr::Binary {
                op: BinaryOp::Mul,
                left: Box::new(int(2)),
                right: Box::new(int(3)),
            }),
        })
    );
}

#[test]
fn test_precedence_pow_over_neg() {
    // -2 ** 2 parses as -(2 ** 2).
    assert_eq!(
        only_statement("-2 ** 2"),
        StmtKind::Expr(Expr::Unary {
            op: UnaryOp::Neg,
            expr: Box::new(Expr::Binary {
                op: BinaryOp::Pow,
                left: Box::new(int(2)),
                right: Box::new(int(2)),
            }),
        })
    );
}

#[test]
fn test_not_binds_looser_than_comparison() {
    assert_eq!(
        only_statement("not 1 == 2"),
        StmtKind::Expr(Expr::Unary {
            op: UnaryOp::Not,
            expr: Box::new(Expr::Binary {
                op: BinaryOp::Eq,
                left: Box::new(int(1)),
                right: Box::new(int(2)),
            }),
        })
    );
}

#[test]
fn test_postfix_chain() {
    assert_eq!(
        only_statement("m.f(1)[0]"),
        StmtKind::Expr(Expr::Index {
            object: Box::new(Expr::Call {
                func: Box::new(Expr::Attr {
                    object: Box::new(ident("m")),
                    field: "f".into(),
                }),
                args: vec![int(1)],
            }),
            index: Box::new(int(0)),
        })
    );
}

#[test]
fn test_paren_grouping_is_not_a_tuple() {
    assert_eq!(only_statement("(1)"), StmtKind::Expr(int(1)));
    assert_eq!(
        only_statement("(1,)"),
        StmtKind::Expr(Expr::Tuple(vec![int(1)]))
    );
    assert_eq!(only_statement("()"), StmtKind::Expr(Expr::Tuple(vec![])));
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        only_statement(r#""a\nb""#),
        StmtKind::Expr(Expr::Literal(Literal::Str("a\nb".into())))
    );
    assert_eq!(
        only_statement(r#"'it\'s'"#),
        StmtKind::Expr(Expr::Literal(Literal::Str("it's".into())))
    );
}

#[test]
fn test_float_forms() {
    assert!(matches!(
        only_statement("1.5"),
        StmtKind::Expr(Expr::Literal(Literal::Float(_)))
    ));
    assert!(matches!(
        only_statement("1e3"),
        StmtKind::Expr(Expr::Literal(Literal::Float(_)))
    ));
    assert!(matches!(
        only_statement("1"),
        StmtKind::Expr(Expr::Literal(Literal::Int(1)))
    ));
}

#[test]
fn test_dict_display() {
    assert_eq!(
        only_statement("{'a': 1, 'b': 2}"),
        StmtKind::Expr(Expr::Dict(vec![
            (Expr::Literal(Literal::Str("a".into())), int(1)),
            (Expr::Literal(Literal::Str("b".into())), int(2)),
        ]))
    );
}

// ============================================================================
// Lines and spans
// ============================================================================

#[test]
fn test_spans_are_physical_lines() {
    let program = parse_source("a = 1\n\nb = 2").expect("parsing failed");
    assert_eq!(program.statements.len(), 2);
    assert_eq!(program.statements[0].span, 0..1);
    assert_eq!(program.statements[1].span, 2..3);
}

#[test]
fn test_bracket_continuation_span() {
    let source = indoc! {"
        xs = [
            1,
            2,
        ]
        y = 5"};
    let program = parse_source(source).expect("parsing failed");
    assert_eq!(program.statements.len(), 2);
    assert_eq!(program.statements[0].span, 0..4);
    assert_eq!(program.statements[1].span, 4..5);
}

#[test]
fn test_comment_only_lines_hold_no_statement() {
    let program = parse_source("# heading\na = 1  # trailing").expect("parsing failed");
    assert_eq!(program.statements.len(), 1);
    assert_eq!(program.statements[0].span, 1..2);
}

#[test]
fn test_syntax_error_carries_line() {
    let error = parse_lines(&["a = 1", "this is not code"]).unwrap_err();
    assert!(matches!(error, ParseError::Syntax { line: 1, .. }), "{error:?}");
}

#[test]
fn test_unterminated_string() {
    let error = parse_lines(&["a = 'oops"]).unwrap_err();
    assert_eq!(error, ParseError::UnterminatedString { line: 0 });
}

#[test]
fn test_unclosed_bracket() {
    let error = parse_lines(&["xs = [", "    1,"]).unwrap_err();
    assert_eq!(error, ParseError::UnclosedBracket { line: 0 });
}

#[test]
fn test_empty_input() {
    let program = parse_lines(&[]).expect("parsing failed");
    assert!(program.statements.is_empty());
}
