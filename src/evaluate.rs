use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use regex::Regex;

use crate::parse::{nesting_depth, parse_unchecked};
use crate::{Config, Environment, EvalError, Expr, FunctionRegistry, Pattern, Unbound, Value};

/// Decides whether one rule expression holds for a call's variables.
///
/// The interceptor hands over the expression text after null-token
/// normalization. Implementations must be shareable across threads because
/// one interceptor serves every concurrent call.
pub trait Evaluator: Send + Sync {
    /// Evaluate `expression` against `env`.
    ///
    /// # Errors
    ///
    /// Any [`EvalError`]: the expression does not parse, references
    /// something the environment cannot supply, mixes incompatible types,
    /// or does not produce a bool.
    fn evaluate(&self, expression: &str, env: &Environment) -> Result<bool, EvalError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, expression: &str, env: &Environment) -> Result<bool, EvalError> {
        (**self).evaluate(expression, env)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&self, expression: &str, env: &Environment) -> Result<bool, EvalError> {
        (**self).evaluate(expression, env)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Arc<E> {
    fn evaluate(&self, expression: &str, env: &Environment) -> Result<bool, EvalError> {
        (**self).evaluate(expression, env)
    }
}

/// The built-in tree-walking evaluator.
///
/// Parses the expression on every call. Compiled `=~` patterns are cached,
/// and clones share the cache.
#[derive(Debug, Clone)]
pub struct ExpressionEvaluator {
    unbound: Unbound,
    max_depth: usize,
    functions: FunctionRegistry,
    regexes: Arc<RegexCache>,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ExpressionEvaluator {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            unbound: config.unbound(),
            max_depth: config.max_depth(),
            functions: FunctionRegistry::standard(),
            regexes: Arc::default(),
        }
    }

    /// Replace the function table.
    #[must_use]
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    #[must_use]
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Evaluate an already parsed expression to a value of any type.
    ///
    /// # Errors
    ///
    /// Same as [`Evaluator::evaluate`], except that a non-bool result is
    /// returned as is.
    pub fn evaluate_expr(&self, expr: &Expr, env: &Environment) -> Result<Value, EvalError> {
        self.eval(expr, env, 0).map(Cow::into_owned)
    }

    fn eval<'a>(
        &self,
        expr: &'a Expr,
        env: &'a Environment,
        depth: usize,
    ) -> Result<Cow<'a, Value>, EvalError> {
        if depth > self.max_depth {
            return Err(EvalError::TooDeep {
                limit: self.max_depth,
            });
        }
        let depth = depth + 1;

        match expr {
            Expr::Literal(value) => Ok(Cow::Borrowed(value)),
            Expr::Var(path) => self.lookup(env, path),
            Expr::Compare { left, op, right } => {
                let l = self.eval(left, env, depth)?;
                let r = self.eval(right, env, depth)?;
                l.compare(*op, &r)
                    .map(|b| Cow::Owned(Value::Bool(b)))
                    .ok_or_else(|| EvalError::TypeMismatch {
                        op: op.to_string(),
                        left: l.type_name(),
                        right: r.type_name(),
                    })
            }
            Expr::Match { subject, pattern } => {
                let subject = self.eval(subject, env, depth)?;
                let Value::String(text) = &*subject else {
                    return Err(EvalError::TypeMismatch {
                        op: "=~".to_owned(),
                        left: subject.type_name(),
                        right: "regex",
                    });
                };
                let matched = match pattern {
                    Pattern::Literal(source) => self.regexes.full_match(source, text)?,
                    Pattern::Dynamic(inner) => {
                        let source = self.eval(inner, env, depth)?;
                        match &*source {
                            Value::String(source) => self.regexes.full_match(source, text)?,
                            other => {
                                return Err(EvalError::TypeMismatch {
                                    op: "=~".to_owned(),
                                    left: "string",
                                    right: other.type_name(),
                                });
                            }
                        }
                    }
                };
                Ok(Cow::Owned(Value::Bool(matched)))
            }
            Expr::And(a, b) => {
                let result = self.eval_bool(a, env, depth)? && self.eval_bool(b, env, depth)?;
                Ok(Cow::Owned(Value::Bool(result)))
            }
            Expr::Or(a, b) => {
                let result = self.eval_bool(a, env, depth)? || self.eval_bool(b, env, depth)?;
                Ok(Cow::Owned(Value::Bool(result)))
            }
            Expr::Not(inner) => {
                let result = !self.eval_bool(inner, env, depth)?;
                Ok(Cow::Owned(Value::Bool(result)))
            }
            Expr::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, env, depth).map(Cow::into_owned))
                    .collect::<Result<Vec<_>, _>>()?;
                self.functions.call(function, &args).map(Cow::Owned)
            }
        }
    }

    fn eval_bool(&self, expr: &Expr, env: &Environment, depth: usize) -> Result<bool, EvalError> {
        let value = self.eval(expr, env, depth)?;
        value.as_bool().ok_or(EvalError::NotBoolean {
            found: value.type_name(),
        })
    }

    fn lookup<'a>(&self, env: &'a Environment, path: &str) -> Result<Cow<'a, Value>, EvalError> {
        match env.lookup(path) {
            Ok(value) => Ok(Cow::Borrowed(value)),
            Err(EvalError::UnboundVariable { .. } | EvalError::MissingField { .. })
                if self.unbound == Unbound::Nil =>
            {
                Ok(Cow::Owned(Value::Nil))
            }
            Err(e) => Err(e),
        }
    }
}

impl Evaluator for ExpressionEvaluator {
    fn evaluate(&self, expression: &str, env: &Environment) -> Result<bool, EvalError> {
        if nesting_depth(expression) > self.max_depth {
            return Err(EvalError::TooDeep {
                limit: self.max_depth,
            });
        }
        let expr = parse_unchecked(expression)?;
        self.eval_bool(&expr, env, 0)
    }
}

/// Compiled patterns kept per evaluator; the map is cleared when full.
const REGEX_CACHE_CAPACITY: usize = 256;

/// Compiled full-match patterns keyed by their source.
#[derive(Debug, Default)]
struct RegexCache {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl RegexCache {
    /// Whether the whole of `text` matches `source`.
    fn full_match(&self, source: &str, text: &str) -> Result<bool, EvalError> {
        let cached = self.lock().get(source).cloned();
        let re = match cached {
            Some(re) => re,
            None => {
                let re = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
                    EvalError::InvalidRegex {
                        pattern: source.to_owned(),
                        reason: e.to_string(),
                    }
                })?;
                let mut compiled = self.lock();
                if compiled.len() >= REGEX_CACHE_CAPACITY {
                    compiled.clear();
                }
                compiled.insert(source.to_owned(), re.clone());
                re
            }
        };
        Ok(re.is_match(text))
    }

    // A panic while holding the lock cannot leave the map inconsistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Regex>> {
        self.compiled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }
}
