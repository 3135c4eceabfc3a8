//! Syntax tree for top-level script statements.
//!
//! Statements carry their physical line span so the annotation layer can
//! attribute results back to buffer positions. Everything else (operator
//! shapes, literals) is deliberately flat; the evaluator walks these nodes
//! directly.

use core::ops::Range;

use ecow::EcoString;

/// A parsed document: the ordered sequence of top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// One top-level statement with its physical line span.
///
/// `span` is half-open and zero-based: `start` is the first physical line of
/// the statement, `end` is one past the last. Spans index the original
/// document snapshot, not any patched intermediate.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub span: Range<usize>,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// A bare expression statement.
    Expr(Expr),
    /// `a = expr`, `a, b = expr`, `a = b = expr`, `a[k] = expr`, ...
    ///
    /// `targets` holds one entry per `=`-chain element; each entry may be a
    /// tuple of sub-targets.
    Assign { targets: Vec<Target>, value: Expr },
    /// `name += expr` and friends. `op` is restricted to arithmetic ops.
    AugAssign {
        target: Target,
        op: BinaryOp,
        value: Expr,
    },
    /// `import a, b as c`
    Import { names: Vec<ImportName> },
    /// `from m import a, b as c`
    FromImport {
        module: EcoString,
        names: Vec<ImportName>,
    },
    /// `del a, b`
    Delete { names: Vec<EcoString> },
    /// `pass`
    Pass,
}

/// One imported name with its optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportName {
    pub name: EcoString,
    pub alias: Option<EcoString>,
}

impl ImportName {
    /// The identifier this import binds in the environment.
    pub fn binding(&self) -> &EcoString {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

/// An assignment target.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Name(EcoString),
    Tuple(Vec<Target>),
    Attribute { object: Box<Expr>, field: EcoString },
    Subscript { object: Box<Expr>, index: Box<Expr> },
}

impl Target {
    /// True when every leaf of a tuple target is a plain name.
    pub fn is_all_names(&self) -> bool {
        match self {
            Target::Name(_) => true,
            Target::Tuple(elts) => elts.iter().all(|t| matches!(t, Target::Name(_))),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Ident(EcoString),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Attr {
        object: Box<Expr>,
        field: EcoString,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(EcoString),
    Bool(bool),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// Source-level operator symbol, used in error messages.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}
