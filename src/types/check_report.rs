use std::fmt;
use std::time::Duration;

use crate::error::CheckError;

/// Detailed result returned by
/// [`Interceptor::check_detailed()`](crate::Interceptor::check_detailed).
///
/// Records which rules were evaluated (in order), how the check ended,
/// and the wall-clock duration of the pass.
#[derive(Debug, Clone)]
#[must_use]
pub struct CheckReport {
    site: String,
    error: Option<CheckError>,
    evaluated: Vec<usize>,
    duration: Duration,
}

impl CheckReport {
    pub(crate) fn new(
        site: impl Into<String>,
        error: Option<CheckError>,
        evaluated: Vec<usize>,
        duration: Duration,
    ) -> Self {
        Self {
            site: site.into(),
            error,
            evaluated,
            duration,
        }
    }

    #[must_use]
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Whether every rule evaluated to `true`.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }

    /// The violation or fault that stopped the check, if any.
    #[must_use]
    pub fn error(&self) -> Option<&CheckError> {
        self.error.as_ref()
    }

    /// Indices of the rules that were evaluated, in evaluation order.
    #[must_use]
    pub fn evaluated(&self) -> &[usize] {
        &self.evaluated
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Convert into the same result [`Interceptor::check()`](crate::Interceptor::check) returns.
    ///
    /// # Errors
    ///
    /// Returns the recorded [`CheckError`] when the check did not pass.
    pub fn into_result(self) -> Result<(), CheckError> {
        self.error.map_or(Ok(()), Err)
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.site)?;
        match &self.error {
            None => write!(f, "passed")?,
            Some(CheckError::Violation(v)) => write!(f, "violated ({v})")?,
            Some(CheckError::Fault(_)) => write!(f, "faulted")?,
        }
        let evaluated: Vec<String> = self.evaluated.iter().map(ToString::to_string).collect();
        write!(f, ", evaluated: [{}]", evaluated.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
