//! Rule checking around guarded calls.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::error::{CheckError, LoadError};
use crate::{
    CallSite, CheckReport, Config, Evaluator, EvaluatorFault, ExpressionEvaluator, RegistryError,
    RuleViolation, Value, bind, normalize,
};

/// Runs a call site's rules against a call's arguments before the call
/// proceeds.
///
/// Holds no per-call state; share one instance (behind an [`Arc`] if
/// needed) across every thread.
#[derive(Debug, Clone)]
pub struct Interceptor<E = ExpressionEvaluator> {
    evaluator: E,
    config: Config,
}

impl Interceptor<ExpressionEvaluator> {
    /// An interceptor using the built-in evaluator configured from `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            evaluator: ExpressionEvaluator::new(&config),
            config,
        }
    }
}

impl Default for Interceptor<ExpressionEvaluator> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<E: Evaluator> Interceptor<E> {
    /// An interceptor delegating evaluation to `evaluator`.
    pub fn with_evaluator(evaluator: E, config: Config) -> Self {
        Self { evaluator, config }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check every rule of `site` against `values`, in declaration order.
    ///
    /// `values` are positional and paired with the site's parameter names.
    ///
    /// # Errors
    ///
    /// [`CheckError::Violation`] for the first rule that evaluates to
    /// `false`, [`CheckError::Fault`] for the first rule that cannot be
    /// evaluated. Rules after the failing one are not evaluated.
    pub fn check(&self, site: &CallSite, values: &[Value]) -> Result<(), CheckError> {
        self.run(site, values, |_| {})
    }

    /// Like [`check`](Self::check), recording which rules ran and how long
    /// the pass took.
    pub fn check_detailed(&self, site: &CallSite, values: &[Value]) -> CheckReport {
        let start = Instant::now();
        let mut evaluated = Vec::with_capacity(site.rules().len());
        let result = self.run(site, values, |index| evaluated.push(index));
        CheckReport::new(site.name(), result.err(), evaluated, start.elapsed())
    }

    /// Check `site`, then run `body` exactly once if every rule passed.
    ///
    /// # Errors
    ///
    /// Same as [`check`](Self::check); `body` is not run on error.
    pub fn invoke<R>(
        &self,
        site: &CallSite,
        values: &[Value],
        body: impl FnOnce() -> R,
    ) -> Result<R, CheckError> {
        self.check(site, values)?;
        Ok(body())
    }

    fn run(
        &self,
        site: &CallSite,
        values: &[Value],
        mut on_rule: impl FnMut(usize),
    ) -> Result<(), CheckError> {
        if site.rules().is_empty() {
            trace!(site = site.name(), "no rules, passing through");
            return Ok(());
        }

        let env = bind(site.params(), values);

        for (index, rule) in site.rules().iter().enumerate() {
            on_rule(index);
            let expression = normalize(rule.expression());
            match self.evaluator.evaluate(&expression, &env) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(
                        site = site.name(),
                        rule = index,
                        expression = rule.expression(),
                        "rule violated"
                    );
                    let message = if rule.message().is_empty() {
                        self.config.default_message()
                    } else {
                        rule.message()
                    };
                    return Err(RuleViolation::new(message).at_rule(index).into());
                }
                Err(error) => {
                    debug!(
                        site = site.name(),
                        rule = index,
                        expression = %expression,
                        %error,
                        "rule failed to evaluate"
                    );
                    return Err(
                        EvaluatorFault::new(site.name(), index, expression, error).into(),
                    );
                }
            }
        }

        trace!(site = site.name(), rules = site.rules().len(), "all rules passed");
        Ok(())
    }
}

/// Argument lists that can be shown to rules as positional values.
///
/// Implemented for `()`, tuples of up to eight elements whose members
/// convert into [`Value`], and `Vec<Value>`.
pub trait Arguments {
    fn to_values(&self) -> Vec<Value>;
}

impl Arguments for () {
    fn to_values(&self) -> Vec<Value> {
        Vec::new()
    }
}

impl Arguments for Vec<Value> {
    fn to_values(&self) -> Vec<Value> {
        self.clone()
    }
}

macro_rules! impl_arguments {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Clone + Into<Value>),+> Arguments for ($($name,)+) {
            fn to_values(&self) -> Vec<Value> {
                vec![$(self.$idx.clone().into()),+]
            }
        }
    };
}

impl_arguments!(A: 0);
impl_arguments!(A: 0, B: 1);
impl_arguments!(A: 0, B: 1, C: 2);
impl_arguments!(A: 0, B: 1, C: 2, D: 3);
impl_arguments!(A: 0, B: 1, C: 2, D: 3, F: 4);
impl_arguments!(A: 0, B: 1, C: 2, D: 3, F: 4, G: 5);
impl_arguments!(A: 0, B: 1, C: 2, D: 3, F: 4, G: 5, H: 6);
impl_arguments!(A: 0, B: 1, C: 2, D: 3, F: 4, G: 5, H: 6, I: 7);

/// A function wrapped so that every call is checked against a call site
/// first.
///
/// ```
/// use std::sync::Arc;
/// use precheck::{CallSite, Guarded, Interceptor};
///
/// let site = CallSite::new("user.simple", ["name", "age"])
///     .check("name != null", "name is required")
///     .check("age > 18", "must be older than 18");
/// let register = Guarded::new(
///     Arc::new(Interceptor::default()),
///     site,
///     |(name, age): (&str, i64)| format!("{name}:{age}"),
/// );
///
/// assert_eq!(register.call(("ann", 30)).unwrap(), "ann:30");
/// assert_eq!(
///     register.call(("ann", 16)).unwrap_err().message(),
///     "must be older than 18"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Guarded<F, E = ExpressionEvaluator> {
    interceptor: Arc<Interceptor<E>>,
    site: Arc<CallSite>,
    function: F,
}

impl<F, E: Evaluator> Guarded<F, E> {
    pub fn new(interceptor: Arc<Interceptor<E>>, site: impl Into<Arc<CallSite>>, function: F) -> Self {
        Self {
            interceptor,
            site: site.into(),
            function,
        }
    }

    pub fn site(&self) -> &CallSite {
        &self.site
    }

    /// Check the rules against `args`, then call the function with them.
    ///
    /// # Errors
    ///
    /// The [`CheckError`] that stopped the call; the function is not run.
    pub fn call<A, R>(&self, args: A) -> Result<R, CheckError>
    where
        A: Arguments,
        F: Fn(A) -> R,
    {
        self.interceptor.check(&self.site, &args.to_values())?;
        Ok((self.function)(args))
    }
}

/// Call sites by name, sharing one interceptor.
#[derive(Debug)]
pub struct Registry<E = ExpressionEvaluator> {
    interceptor: Arc<Interceptor<E>>,
    sites: HashMap<String, Arc<CallSite>>,
}

impl<E: Evaluator> Registry<E> {
    pub fn new(interceptor: Interceptor<E>) -> Self {
        Self::with_shared(Arc::new(interceptor))
    }

    pub fn with_shared(interceptor: Arc<Interceptor<E>>) -> Self {
        Self {
            interceptor,
            sites: HashMap::new(),
        }
    }

    /// Load every call site declared in `input`.
    ///
    /// # Errors
    ///
    /// [`LoadError::Parse`] for malformed declarations,
    /// [`LoadError::Registry`] for duplicate sites or parameters.
    pub fn from_dsl(input: &str, interceptor: Interceptor<E>) -> Result<Self, LoadError> {
        let parsed = crate::parse::parse(input)?;
        let mut registry = Self::new(interceptor);
        for site in parsed.sites {
            registry.register(site)?;
        }
        Ok(registry)
    }

    /// Read a declaration file and load it with [`from_dsl`](Self::from_dsl).
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] if the file cannot be read, otherwise as
    /// [`from_dsl`](Self::from_dsl).
    pub fn from_file(path: impl AsRef<Path>, interceptor: Interceptor<E>) -> Result<Self, LoadError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input, interceptor)
    }

    /// Add a call site.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateSite`] if the name is taken,
    /// [`RegistryError::DuplicateParameter`] if a parameter name repeats.
    pub fn register(&mut self, site: CallSite) -> Result<(), RegistryError> {
        check_duplicate_params(&site)?;
        if self.sites.contains_key(site.name()) {
            return Err(RegistryError::DuplicateSite {
                name: site.name().to_owned(),
            });
        }
        self.sites.insert(site.name().to_owned(), Arc::new(site));
        Ok(())
    }

    #[must_use]
    pub fn site(&self, name: &str) -> Option<&CallSite> {
        self.sites.get(name).map(AsRef::as_ref)
    }

    pub fn interceptor(&self) -> &Interceptor<E> {
        &self.interceptor
    }

    /// Check the rules registered under `name`. Unregistered names have no
    /// rules and always pass.
    ///
    /// # Errors
    ///
    /// See [`Interceptor::check`].
    pub fn check(&self, name: &str, values: &[Value]) -> Result<(), CheckError> {
        match self.sites.get(name) {
            Some(site) => self.interceptor.check(site, values),
            None => {
                trace!(site = name, "unregistered call site, passing through");
                Ok(())
            }
        }
    }

    /// Check `name`, then run `body` exactly once if every rule passed.
    ///
    /// # Errors
    ///
    /// See [`Interceptor::check`].
    pub fn call<R>(
        &self,
        name: &str,
        values: &[Value],
        body: impl FnOnce() -> R,
    ) -> Result<R, CheckError> {
        self.check(name, values)?;
        Ok(body())
    }

    /// Wrap `function` with the rules registered under `name`.
    pub fn guard<F>(&self, name: &str, function: F) -> Guarded<F, E> {
        let site = self
            .sites
            .get(name)
            .cloned()
            .unwrap_or_else(|| Arc::new(CallSite::new(name, Vec::<String>::new())));
        Guarded::new(Arc::clone(&self.interceptor), site, function)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }
}

impl Default for Registry<ExpressionEvaluator> {
    fn default() -> Self {
        Self::new(Interceptor::default())
    }
}

fn check_duplicate_params(site: &CallSite) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for param in site.params() {
        if !seen.insert(param.as_str()) {
            return Err(RegistryError::DuplicateParameter {
                site: site.name().to_owned(),
                parameter: param.clone(),
            });
        }
    }
    Ok(())
}
