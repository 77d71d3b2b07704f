use super::rule::Rule;
use super::ruleset::RuleSet;

/// A guarded operation: its name, its ordered parameter names, and the rules
/// checked before every call.
///
/// Rules can be attached one at a time with [`check`](CallSite::check) or
/// as a group with [`with_rules`](CallSite::with_rules); both keep
/// declaration order and evaluate identically.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallSite {
    name: String,
    params: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    rules: RuleSet,
}

impl CallSite {
    #[must_use]
    pub fn new<P: Into<String>>(
        name: impl Into<String>,
        params: impl IntoIterator<Item = P>,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            rules: RuleSet::new(),
        }
    }

    /// Append a single rule.
    #[must_use]
    pub fn check(mut self, expression: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(Rule::new(expression, message));
        self
    }

    /// Append a group of rules, keeping their order.
    #[must_use]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names in declaration order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
