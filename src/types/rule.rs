/// One precondition: an expression that must evaluate to `true`, and the
/// message shown to the caller when it does not.
///
/// The expression is kept as text. It is normalized and parsed each time it
/// is evaluated, so a malformed expression only surfaces when a call reaches
/// it. An empty message is valid; the interceptor substitutes the configured
/// default when such a rule is violated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    expression: String,
    #[cfg_attr(feature = "serde", serde(default))]
    message: String,
}

impl Rule {
    pub fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<E: Into<String>, M: Into<String>> From<(E, M)> for Rule {
    fn from((expression, message): (E, M)) -> Self {
        Rule::new(expression, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_kept_verbatim() {
        let rule = Rule::new("id != null", "");
        assert_eq!(rule.expression(), "id != null");
        assert_eq!(rule.message(), "");
    }

    #[test]
    fn from_tuple() {
        let rule = Rule::from(("age > 18", "too young"));
        assert_eq!(rule, Rule::new("age > 18", "too young"));
    }
}
