use thiserror::Error;

use crate::parse::ParseError;
use crate::{ErrorCode, EvaluatorFault, RegistryError, RuleViolation};

/// Why a guarded call was refused.
///
/// The two variants are disjoint: a [`RuleViolation`] is the caller's
/// problem and maps to a client-fault response, an [`EvaluatorFault`] is a
/// broken rule and maps to a server-fault response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error(transparent)]
    Violation(#[from] RuleViolation),

    #[error(transparent)]
    Fault(#[from] EvaluatorFault),
}

impl CheckError {
    #[must_use]
    pub fn is_client_fault(&self) -> bool {
        matches!(self, CheckError::Violation(_))
    }

    /// The violation's user-facing message, or the fault's diagnostic text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            CheckError::Violation(v) => v.message().to_owned(),
            CheckError::Fault(f) => f.to_string(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            CheckError::Violation(v) => v.code(),
            CheckError::Fault(_) => ErrorCode::ServerError,
        }
    }

    #[must_use]
    pub fn as_violation(&self) -> Option<&RuleViolation> {
        match self {
            CheckError::Violation(v) => Some(v),
            CheckError::Fault(_) => None,
        }
    }

    #[must_use]
    pub fn as_fault(&self) -> Option<&EvaluatorFault> {
        match self {
            CheckError::Fault(f) => Some(f),
            CheckError::Violation(_) => None,
        }
    }
}

/// Unified error type for loading call-site declarations.
///
/// Returned by [`Registry::from_dsl()`](crate::Registry::from_dsl)
/// and [`Registry::from_file()`](crate::Registry::from_file).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fail with a [`RuleViolation`] unless `condition` holds.
///
/// For checks that are easier to write in Rust than as a rule expression;
/// the caller sees the same kind of failure either way.
///
/// # Errors
///
/// Returns a violation carrying `message` when `condition` is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), RuleViolation> {
    ensure_with_code(condition, message, ErrorCode::ParamError)
}

/// Like [`ensure`], with an explicit [`ErrorCode`].
///
/// # Errors
///
/// Returns a violation carrying `message` and `code` when `condition` is false.
pub fn ensure_with_code(
    condition: bool,
    message: impl Into<String>,
    code: ErrorCode,
) -> Result<(), RuleViolation> {
    if condition {
        Ok(())
    } else {
        Err(RuleViolation::new(message).with_code(code))
    }
}
