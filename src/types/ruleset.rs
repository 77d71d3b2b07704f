use std::fmt;
use std::slice;

use super::rule::Rule;

/// The ordered rules attached to one call site.
///
/// Order is declaration order and decides which message a caller sees when
/// several rules would fail. Built once and shared read-only by every call.
///
/// # Example
///
/// ```
/// use precheck::{Rule, RuleSet};
///
/// let one_by_one = RuleSet::builder()
///     .check("age != null", "age is required")
///     .check("age > 18", "must be older than 18")
///     .build();
///
/// let container = RuleSet::from(vec![
///     Rule::new("age != null", "age is required"),
///     Rule::new("age > 18", "must be older than 18"),
/// ]);
///
/// assert_eq!(one_by_one, container);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

/// Builder for a [`RuleSet`], one `check` per declared rule.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    #[must_use]
    pub fn check(mut self, expression: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push(Rule::new(expression, message));
        self
    }

    /// Append every rule of a multi-rule declaration, keeping its order.
    #[must_use]
    pub fn checks(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    #[must_use]
    pub fn build(self) -> RuleSet {
        RuleSet { rules: self.rules }
    }
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// A rule set holding exactly one rule.
    #[must_use]
    pub fn single(rule: Rule) -> Self {
        Self { rules: vec![rule] }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in declaration order.
    pub fn iter(&self) -> slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl From<Rule> for RuleSet {
    fn from(rule: Rule) -> Self {
        Self::single(rule)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({} rules)", self.rules.len())
    }
}
