//! Pest-based lowering of one logical line into the AST.

use ecow::EcoString;
use lazy_static::lazy_static;
use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

use crate::ast::{BinaryOp, Expr, ImportName, Literal, StmtKind, Target, UnaryOp};

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or_op, Assoc::Left))
        .op(Op::infix(Rule::and_op, Assoc::Left))
        .op(Op::prefix(Rule::not_op))
        .op(
            Op::infix(Rule::eq, Assoc::Left)
            | Op::infix(Rule::ne, Assoc::Left)
            | Op::infix(Rule::le, Assoc::Left)
            | Op::infix(Rule::ge, Assoc::Left)
            | Op::infix(Rule::lt, Assoc::Left)
            | Op::infix(Rule::gt, Assoc::Left)
        )
        .op(
            Op::infix(Rule::add, Assoc::Left)
            | Op::infix(Rule::sub, Assoc::Left)
        )
        .op(
            Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::floordiv, Assoc::Left)
            | Op::infix(Rule::mod_op, Assoc::Left)
        )
        .op(Op::prefix(Rule::neg))
        .op(Op::infix(Rule::pow, Assoc::Right))
        .op(Op::postfix(Rule::call_op))
        .op(Op::postfix(Rule::index_op))
        .op(Op::postfix(Rule::attr_op))
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/script.pest"]
pub struct ScriptParser;

/// Error from parsing one logical line, before line numbers are made
/// absolute by the caller.
pub(crate) enum LogicalError {
    /// Grammar rejection; `line` is 1-based relative to the logical text.
    Pest { line: usize, message: String },
    /// Lowering rejection (e.g. an out-of-range integer literal).
    Lower(String),
}

type Lowered<T> = Result<T, String>;

/// Parse one logical line. `Ok(None)` means the line holds no statement
/// (blank or comment-only).
pub(crate) fn parse_logical(text: &str) -> Result<Option<StmtKind>, LogicalError> {
    let mut pairs = ScriptParser::parse(Rule::logical, text).map_err(|e| {
        let line = match e.line_col {
            LineColLocation::Pos((line, _)) => line,
            LineColLocation::Span((line, _), _) => line,
        };
        LogicalError::Pest {
            line,
            message: e.variant.message().into_owned(),
        }
    })?;

    let logical = pairs
        .next()
        .ok_or_else(|| LogicalError::Lower("empty parse result".into()))?;
    for pair in logical.into_inner() {
        if pair.as_rule() == Rule::statement {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| LogicalError::Lower("statement with no body".into()))?;
            return lower_statement(inner)
                .map(Some)
                .map_err(LogicalError::Lower);
        }
    }
    Ok(None)
}

fn lower_statement(pair: Pair<Rule>) -> Lowered<StmtKind> {
    match pair.as_rule() {
        Rule::expr_stmt => {
            let list = first_inner(pair)?;
            Ok(StmtKind::Expr(lower_expr_list(list)?))
        }
        Rule::assign_stmt => lower_assign(pair),
        Rule::aug_stmt => lower_aug(pair),
        Rule::import_stmt => {
            let names = pair
                .into_inner()
                .filter(|p| p.as_rule() == Rule::import_item)
                .map(lower_import_item)
                .collect::<Lowered<Vec<_>>>()?;
            Ok(StmtKind::Import { names })
        }
        Rule::from_stmt => {
            let mut module = None;
            let mut names = Vec::new();
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::dotted_name => module = Some(EcoString::from(inner.as_str())),
                    Rule::from_item => names.push(lower_import_item(inner)?),
                    _ => {}
                }
            }
            let module = module.ok_or("from-import without a module")?;
            Ok(StmtKind::FromImport { module, names })
        }
        Rule::del_stmt => {
            let names = pair
                .into_inner()
                .filter(|p| p.as_rule() == Rule::name)
                .map(|p| EcoString::from(p.as_str()))
                .collect();
            Ok(StmtKind::Delete { names })
        }
        Rule::pass_stmt => Ok(StmtKind::Pass),
        rule => Err(format!("unexpected statement rule {:?}", rule)),
    }
}

/// Works for both `import_item` (dotted name) and `from_item` (plain name).
fn lower_import_item(pair: Pair<Rule>) -> Lowered<ImportName> {
    let mut name = None;
    let mut alias = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::dotted_name | Rule::name => name = Some(EcoString::from(inner.as_str())),
            Rule::alias => {
                alias = inner
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::name)
                    .map(|p| EcoString::from(p.as_str()));
            }
            _ => {}
        }
    }
    Ok(ImportName {
        name: name.ok_or("import item without a name")?,
        alias,
    })
}

fn lower_assign(pair: Pair<Rule>) -> Lowered<StmtKind> {
    let mut targets = Vec::new();
    let mut current = pair;
    loop {
        let mut inner = current.into_inner();
        let target_list = inner
            .next()
            .ok_or("assignment without a target")?;
        targets.push(lower_target_list(target_list)?);

        let rhs = inner
            .find(|p| p.as_rule() != Rule::assign_op)
            .ok_or("assignment without a value")?;
        match rhs.as_rule() {
            Rule::assign_stmt => current = rhs,
            Rule::expr_list => {
                return Ok(StmtKind::Assign {
                    targets,
                    value: lower_expr_list(rhs)?,
                });
            }
            rule => return Err(format!("unexpected assignment value rule {:?}", rule)),
        }
    }
}

fn lower_aug(pair: Pair<Rule>) -> Lowered<StmtKind> {
    let mut target = None;
    let mut op = None;
    let mut value = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::target => target = Some(lower_target(inner)?),
            Rule::aug_op => {
                let symbol = inner.as_str().trim_end_matches('=');
                op = Some(match symbol {
                    "+" => BinaryOp::Add,
                    "-" => BinaryOp::Sub,
                    "*" => BinaryOp::Mul,
                    "/" => BinaryOp::Div,
                    "//" => BinaryOp::FloorDiv,
                    "%" => BinaryOp::Mod,
                    "**" => BinaryOp::Pow,
                    other => return Err(format!("unknown augmented operator {:?}", other)),
                });
            }
            Rule::expr_list => value = Some(lower_expr_list(inner)?),
            _ => {}
        }
    }
    Ok(StmtKind::AugAssign {
        target: target.ok_or("augmented assignment without a target")?,
        op: op.ok_or("augmented assignment without an operator")?,
        value: value.ok_or("augmented assignment without a value")?,
    })
}

fn lower_target_list(pair: Pair<Rule>) -> Lowered<Target> {
    let mut atoms = Vec::new();
    let mut trailing = false;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::target_atom => atoms.push(lower_target_atom(inner)?),
            Rule::trailing_comma => trailing = true,
            _ => {}
        }
    }
    if atoms.len() == 1 && !trailing {
        Ok(atoms.pop().ok_or("empty target list")?)
    } else {
        Ok(Target::Tuple(atoms))
    }
}

fn lower_target_atom(pair: Pair<Rule>) -> Lowered<Target> {
    let inner = first_inner(pair)?;
    match inner.as_rule() {
        Rule::target => lower_target(inner),
        Rule::target_list => lower_target_list(inner),
        rule => Err(format!("unexpected target rule {:?}", rule)),
    }
}

fn lower_target(pair: Pair<Rule>) -> Lowered<Target> {
    let mut inner = pair.into_inner();
    let name = inner.next().ok_or("target without a name")?;
    let trailers: Vec<_> = inner.collect();

    if trailers.is_empty() {
        return Ok(Target::Name(EcoString::from(name.as_str())));
    }

    // All but the last trailer form the object expression; the last one
    // decides the target shape.
    let mut object = Expr::Ident(EcoString::from(name.as_str()));
    for trailer in &trailers[..trailers.len() - 1] {
        object = apply_trailer(object, trailer.clone())?;
    }
    let last = first_inner(trailers[trailers.len() - 1].clone())?;
    match last.as_rule() {
        Rule::t_index => {
            let index = lower_expr(first_inner(last)?)?;
            Ok(Target::Subscript {
                object: Box::new(object),
                index: Box::new(index),
            })
        }
        Rule::t_attr => {
            let field = first_inner(last)?;
            Ok(Target::Attribute {
                object: Box::new(object),
                field: EcoString::from(field.as_str()),
            })
        }
        rule => Err(format!("unexpected target trailer rule {:?}", rule)),
    }
}

fn apply_trailer(object: Expr, trailer: Pair<Rule>) -> Lowered<Expr> {
    let inner = first_inner(trailer)?;
    match inner.as_rule() {
        Rule::t_index => Ok(Expr::Index {
            object: Box::new(object),
            index: Box::new(lower_expr(first_inner(inner)?)?),
        }),
        Rule::t_attr => {
            let field = first_inner(inner)?;
            Ok(Expr::Attr {
                object: Box::new(object),
                field: EcoString::from(field.as_str()),
            })
        }
        rule => Err(format!("unexpected trailer rule {:?}", rule)),
    }
}

fn lower_expr_list(pair: Pair<Rule>) -> Lowered<Expr> {
    let mut exprs = Vec::new();
    let mut trailing = false;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::expression => exprs.push(lower_expr(inner)?),
            Rule::trailing_comma => trailing = true,
            _ => {}
        }
    }
    if exprs.len() == 1 && !trailing {
        exprs.pop().ok_or_else(|| "empty expression list".into())
    } else {
        Ok(Expr::Tuple(exprs))
    }
}

pub(crate) fn lower_expr(pair: Pair<Rule>) -> Lowered<Expr> {
    PRATT_PARSER
        .map_primary(lower_primary)
        .map_prefix(|op, rhs| {
            let op = match op.as_rule() {
                Rule::neg => UnaryOp::Neg,
                Rule::not_op => UnaryOp::Not,
                rule => return Err(format!("unknown prefix operator {:?}", rule)),
            };
            Ok(Expr::Unary {
                op,
                expr: Box::new(rhs?),
            })
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::add => BinaryOp::Add,
                Rule::sub => BinaryOp::Sub,
                Rule::mul => BinaryOp::Mul,
                Rule::div => BinaryOp::Div,
                Rule::floordiv => BinaryOp::FloorDiv,
                Rule::mod_op => BinaryOp::Mod,
                Rule::pow => BinaryOp::Pow,
                Rule::eq => BinaryOp::Eq,
                Rule::ne => BinaryOp::Ne,
                Rule::lt => BinaryOp::Lt,
                Rule::le => BinaryOp::Le,
                Rule::gt => BinaryOp::Gt,
                Rule::ge => BinaryOp::Ge,
                Rule::and_op => BinaryOp::And,
                Rule::or_op => BinaryOp::Or,
                rule => return Err(format!("unknown infix operator {:?}", rule)),
            };
            Ok(Expr::Binary {
                op,
                left: Box::new(lhs?),
                right: Box::new(rhs?),
            })
        })
        .map_postfix(|lhs, op| match op.as_rule() {
            Rule::call_op => {
                let args = op
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::expression)
                    .map(lower_expr)
                    .collect::<Lowered<Vec<_>>>()?;
                Ok(Expr::Call {
                    func: Box::new(lhs?),
                    args,
                })
            }
            Rule::index_op => Ok(Expr::Index {
                object: Box::new(lhs?),
                index: Box::new(lower_expr(first_inner(op)?)?),
            }),
            Rule::attr_op => {
                let field = first_inner(op)?;
                Ok(Expr::Attr {
                    object: Box::new(lhs?),
                    field: EcoString::from(field.as_str()),
                })
            }
            rule => Err(format!("unknown postfix operator {:?}", rule)),
        })
        .parse(pair.into_inner())
}

fn lower_primary(pair: Pair<Rule>) -> Lowered<Expr> {
    match pair.as_rule() {
        Rule::int => pair
            .as_str()
            .parse::<i64>()
            .map(|v| Expr::Literal(Literal::Int(v)))
            .map_err(|_| "integer literal too large".to_string()),
        Rule::float => pair
            .as_str()
            .parse::<f64>()
            .map(|v| Expr::Literal(Literal::Float(v)))
            .map_err(|_| "malformed float literal".to_string()),
        Rule::string => Ok(Expr::Literal(Literal::Str(unescape(pair.as_str())))),
        Rule::bool_lit => Ok(Expr::Literal(Literal::Bool(pair.as_str() == "True"))),
        Rule::none_lit => Ok(Expr::Literal(Literal::None)),
        Rule::name => Ok(Expr::Ident(EcoString::from(pair.as_str()))),
        Rule::paren => {
            let mut exprs = Vec::new();
            let mut trailing = false;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::expression => exprs.push(lower_expr(inner)?),
                    Rule::trailing_comma => trailing = true,
                    _ => {}
                }
            }
            if exprs.len() == 1 && !trailing {
                exprs.pop().ok_or_else(|| "empty parenthesized group".into())
            } else {
                Ok(Expr::Tuple(exprs))
            }
        }
        Rule::list => {
            let elts = pair
                .into_inner()
                .filter(|p| p.as_rule() == Rule::expression)
                .map(lower_expr)
                .collect::<Lowered<Vec<_>>>()?;
            Ok(Expr::List(elts))
        }
        Rule::dict => {
            let mut items = Vec::new();
            for item in pair.into_inner() {
                if item.as_rule() != Rule::dict_item {
                    continue;
                }
                let mut kv = item.into_inner().filter(|p| p.as_rule() == Rule::expression);
                let key = lower_expr(kv.next().ok_or("dict item without a key")?)?;
                let value = lower_expr(kv.next().ok_or("dict item without a value")?)?;
                items.push((key, value));
            }
            Ok(Expr::Dict(items))
        }
        Rule::expression => lower_expr(pair),
        rule => Err(format!("unexpected primary rule {:?}", rule)),
    }
}

fn first_inner(pair: Pair<Rule>) -> Lowered<Pair<Rule>> {
    let rule = pair.as_rule();
    pair.into_inner()
        .next()
        .ok_or_else(|| format!("rule {:?} has no inner pair", rule))
}

/// Strip quotes and process escape sequences. Unknown escapes are kept
/// verbatim, backslash included.
fn unescape(raw: &str) -> EcoString {
    let inner = &raw[1..raw.len() - 1];
    if !inner.contains('\\') {
        return inner.into();
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out.into()
}
