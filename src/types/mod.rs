mod call_site;
mod check_report;
mod environment;
mod error;
mod expr;
mod rule;
mod ruleset;
mod value;
mod violation;

pub use call_site::CallSite;
pub use check_report::CheckReport;
pub use environment::Environment;
pub use error::{EvalError, RegistryError};
pub use expr::{CompareOp, Expr, Pattern};
pub use rule::Rule;
pub use ruleset::{RuleSet, RuleSetBuilder};
pub use value::Value;
pub use violation::{ErrorCode, EvaluatorFault, RuleViolation};
