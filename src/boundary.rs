//! Turning check failures into caller-facing responses.

use std::fmt;

use tracing::{error, info};

use crate::ErrorCode;
use crate::error::CheckError;

/// The body a request boundary returns for a refused call.
///
/// Violations carry the rule's message and code. Faults carry only the
/// generic server-error text so rule internals stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ErrorResponse {
    pub code: u32,
    pub message: String,
    #[cfg_attr(feature = "serde", serde(rename = "isClientFault"))]
    pub client_fault: bool,
}

impl From<&CheckError> for ErrorResponse {
    fn from(err: &CheckError) -> Self {
        match err {
            CheckError::Violation(v) => Self {
                code: v.code().code(),
                message: v.message().to_owned(),
                client_fault: true,
            },
            CheckError::Fault(_) => Self {
                code: ErrorCode::ServerError.code(),
                message: ErrorCode::ServerError.description().to_owned(),
                client_fault: false,
            },
        }
    }
}

impl From<CheckError> for ErrorResponse {
    fn from(err: CheckError) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Log `err` at the level its kind calls for and build the response.
///
/// Violations are routine and logged at `info` with the message only.
/// Faults are logged at `error` with the call site, rule index and
/// expression. The interceptor only traces faults at `debug`, so this is
/// the one `error` event per fault.
pub fn report(err: &CheckError) -> ErrorResponse {
    match err {
        CheckError::Violation(v) => {
            info!(message = v.message(), code = v.code().code(), "call rejected");
        }
        CheckError::Fault(f) => {
            error!(
                site = f.site(),
                rule = f.rule_index(),
                expression = f.expression(),
                error = %f.eval_error(),
                "rule evaluation failed"
            );
        }
    }
    ErrorResponse::from(err)
}
