use std::fmt;

/// Errors produced when parsing a rule expression or a declaration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    offset: Option<usize>,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: None,
        }
    }

    pub(crate) fn at(offset: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: Some(offset),
        }
    }

    /// Byte offset into the input where parsing stopped, when known.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::new("unexpected token");
        assert_eq!(err.to_string(), "parse error: unexpected token");
        assert_eq!(err.offset(), None);
    }

    #[test]
    fn error_offset() {
        let err = ParseError::at(4, "expected expression");
        assert_eq!(err.offset(), Some(4));
    }
}
