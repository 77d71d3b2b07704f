use thiserror::Error;

use crate::parse::ParseError;

/// Errors raised while evaluating a rule expression.
///
/// Any of these means the rule itself is broken for the given call, not
/// that the caller's input is bad.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("undefined variable '{name}'")]
    UnboundVariable { name: String },

    #[error("unknown field '{field}' in '{path}'")]
    MissingField { path: String, field: String },

    #[error("cannot access a field of {found} value in '{path}'")]
    NotAnObject { path: String, found: &'static str },

    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("expected a bool, found {found}")]
    NotBoolean { found: &'static str },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("function '{function}' expects {expected} arguments, got {found}")]
    Arity {
        function: String,
        expected: &'static str,
        found: usize,
    },

    #[error("invalid argument to '{function}': {reason}")]
    InvalidArgument { function: String, reason: String },

    #[error("invalid regex '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("expression nesting exceeds the limit of {limit}")]
    TooDeep { limit: usize },
}

/// Errors raised while registering call sites.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate call site '{name}'")]
    DuplicateSite { name: String },

    #[error("duplicate parameter '{parameter}' in call site '{site}'")]
    DuplicateParameter { site: String, parameter: String },
}
