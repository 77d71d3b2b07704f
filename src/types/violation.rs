use std::fmt;

use thiserror::Error;

use super::error::EvalError;

/// Machine-readable classification carried by failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    #[default]
    ParamError,
    DbError,
    UserNoLogin,
    ServerError,
}

impl ErrorCode {
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            ErrorCode::ParamError => 1,
            ErrorCode::DbError => 2,
            ErrorCode::UserNoLogin => 3,
            ErrorCode::ServerError => 4,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::ParamError => "invalid parameter",
            ErrorCode::DbError => "database operation failed",
            ErrorCode::UserNoLogin => "user not logged in",
            ErrorCode::ServerError => "server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

/// A rule evaluated to `false`. Expected traffic: the caller fixes the
/// input and retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
#[must_use]
pub struct RuleViolation {
    message: String,
    code: ErrorCode,
    rule_index: Option<usize>,
}

impl RuleViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: ErrorCode::ParamError,
            rule_index: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    pub(crate) fn at_rule(mut self, index: usize) -> Self {
        self.rule_index = Some(index);
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Position of the violated rule in its rule set, when the violation
    /// came from a declared rule rather than [`ensure`](crate::ensure).
    #[must_use]
    pub fn rule_index(&self) -> Option<usize> {
        self.rule_index
    }
}

/// A rule could not be evaluated. This is a misconfigured rule, not bad
/// input, and carries enough context to find it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("rule {rule_index} of '{site}' failed to evaluate `{expression}`: {source}")]
pub struct EvaluatorFault {
    site: String,
    rule_index: usize,
    expression: String,
    source: EvalError,
}

impl EvaluatorFault {
    pub(crate) fn new(
        site: impl Into<String>,
        rule_index: usize,
        expression: impl Into<String>,
        source: EvalError,
    ) -> Self {
        Self {
            site: site.into(),
            rule_index,
            expression: expression.into(),
            source,
        }
    }

    #[must_use]
    pub fn site(&self) -> &str {
        &self.site
    }

    #[must_use]
    pub fn rule_index(&self) -> usize {
        self.rule_index
    }

    /// The normalized expression text that was evaluated.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn eval_error(&self) -> &EvalError {
        &self.source
    }
}
