use tracing::debug;

use crate::{Environment, Value};

/// Pair parameter names with argument values positionally.
///
/// Binding stops at the shorter of the two slices. A name without a value
/// stays unbound, so a rule that mentions it is handled by the evaluator's
/// unbound-variable policy; a value without a name is never visible to rules.
/// A repeated name keeps its last value.
#[must_use]
pub fn bind<N: AsRef<str>>(names: &[N], values: &[Value]) -> Environment {
    if names.len() != values.len() {
        debug!(
            names = names.len(),
            values = values.len(),
            "parameter and argument counts differ, binding the common prefix"
        );
    }
    bind_pairs(names.iter().map(AsRef::as_ref).zip(values.iter().cloned()))
}

/// Build an environment from explicit `(name, value)` pairs.
#[must_use]
pub fn bind_pairs<'n>(pairs: impl IntoIterator<Item = (&'n str, Value)>) -> Environment {
    let mut env = Environment::new();
    for (name, value) in pairs {
        env.insert(name, value);
    }
    env
}
