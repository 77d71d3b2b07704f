/// What a rule sees when it names a variable or field that is not bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Unbound {
    /// Evaluation fails with an unbound-variable error.
    #[default]
    Fault,
    /// The reference evaluates to `nil`.
    Nil,
}

/// Interceptor and evaluator settings.
///
/// ```
/// use precheck::{Config, Unbound};
///
/// let config = Config::default()
///     .with_default_message("invalid request")
///     .with_unbound(Unbound::Nil);
/// assert_eq!(config.default_message(), "invalid request");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Config {
    default_message: String,
    unbound: Unbound,
    max_depth: usize,
}

/// Message used for a violated rule that declares none.
pub const DEFAULT_MESSAGE: &str = "server error";

/// Default limit on expression nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

impl Default for Config {
    fn default() -> Self {
        Self {
            default_message: DEFAULT_MESSAGE.to_owned(),
            unbound: Unbound::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = message.into();
        self
    }

    #[must_use]
    pub fn with_unbound(mut self, unbound: Unbound) -> Self {
        self.unbound = unbound;
        self
    }

    /// Limit on expression nesting. Deeper expressions fault with
    /// [`EvalError::TooDeep`](crate::EvalError::TooDeep) before they are
    /// parsed, so this also bounds stack use per rule.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn default_message(&self) -> &str {
        &self.default_message
    }

    #[must_use]
    pub fn unbound(&self) -> Unbound {
        self.unbound
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.default_message(), "server error");
        assert_eq!(config.unbound(), Unbound::Fault);
        assert_eq!(config.max_depth(), 64);
    }

    #[test]
    fn builders_override() {
        let config = Config::new()
            .with_default_message("bad")
            .with_unbound(Unbound::Nil)
            .with_max_depth(8);
        assert_eq!(config.default_message(), "bad");
        assert_eq!(config.unbound(), Unbound::Nil);
        assert_eq!(config.max_depth(), 8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"unbound":"nil"}"#).unwrap();
        assert_eq!(config.unbound(), Unbound::Nil);
        assert_eq!(config.default_message(), "server error");
    }
}
