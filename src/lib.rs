//! Declarative precondition checks for method calls.
//!
//! A [`CallSite`] names an operation, its parameters, and the ordered
//! [`Rule`]s every call must satisfy. The [`Interceptor`] binds a call's
//! arguments to the parameter names, evaluates each rule expression, and
//! lets the call proceed only when all of them hold.
//!
//! ```
//! use precheck::{CallSite, Interceptor, Value};
//!
//! let site = CallSite::new("user.simple", ["name", "age"])
//!     .check("name != null", "name is required")
//!     .check("age > 18", "must be older than 18");
//!
//! let interceptor = Interceptor::default();
//! let err = interceptor
//!     .check(&site, &[Value::from("ann"), Value::from(16)])
//!     .unwrap_err();
//! assert!(err.is_client_fault());
//! assert_eq!(err.message(), "must be older than 18");
//! ```

pub mod boundary;
mod bind;
mod config;
mod error;
mod evaluate;
mod functions;
mod intercept;
mod normalize;
pub mod parse;
pub mod patterns;
mod types;

pub use bind::{bind, bind_pairs};
pub use config::{Config, DEFAULT_MAX_DEPTH, DEFAULT_MESSAGE, Unbound};
pub use error::{CheckError, LoadError, ensure, ensure_with_code};
pub use evaluate::{Evaluator, ExpressionEvaluator};
pub use functions::{Builtin, FunctionRegistry};
pub use intercept::{Arguments, Guarded, Interceptor, Registry};
pub use normalize::{EVALUATOR_NULL, HOST_NULL, normalize};
pub use types::{
    CallSite, CheckReport, CompareOp, Environment, ErrorCode, EvalError, EvaluatorFault, Expr,
    Pattern, RegistryError, Rule, RuleSet, RuleSetBuilder, RuleViolation, Value,
};
