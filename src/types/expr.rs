use std::fmt;

use super::Value;

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Right-hand side of a `=~` match.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// A `/.../` regex literal, stored as its pattern source.
    Literal(String),
    /// Any other expression; it must evaluate to a string pattern.
    Dynamic(Box<Expr>),
}

/// Parsed rule expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// A variable, optionally followed by a dotted field path (`user.name`).
    Var(String),
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    Match {
        subject: Box<Expr>,
        pattern: Pattern,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Call {
        function: String,
        args: Vec<Expr>,
    },
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(source) => write!(f, "/{source}/"),
            Pattern::Dynamic(expr) => write!(f, "{expr}"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Value::String(s)) => write!(f, "{s:?}"),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Var(path) => write!(f, "{path}"),
            Expr::Compare { left, op, right } => write!(f, "({left} {op} {right})"),
            Expr::Match { subject, pattern } => write!(f, "({subject} =~ {pattern})"),
            Expr::And(a, b) => write!(f, "({a} && {b})"),
            Expr::Or(a, b) => write!(f, "({a} || {b})"),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::Call { function, args } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
