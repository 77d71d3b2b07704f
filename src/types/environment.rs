use std::collections::HashMap;

use super::Value;
use super::error::EvalError;

static NIL: Value = Value::Nil;

/// Per-call variables: parameter name to argument value.
///
/// Lookups accept dotted paths like `"user.profile.age"`; the first segment
/// names a bound variable and the rest dereference object fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: HashMap<String, Value>,
}

impl Environment {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable, replacing any previous binding of the same name.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Bind a variable (mutable reference version).
    pub fn insert(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_owned(), value);
    }

    /// The value bound to `name`, without any path traversal.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Resolve a dotted path.
    ///
    /// Dereferencing through a `nil` yields `nil`. A field missing from an
    /// object, or a field taken on a scalar or list, is an error.
    ///
    /// # Errors
    ///
    /// [`EvalError::UnboundVariable`] when the root is not bound,
    /// [`EvalError::MissingField`] when an object lacks a field, and
    /// [`EvalError::NotAnObject`] when a segment is applied to a non-object.
    pub fn lookup(&self, path: &str) -> Result<&Value, EvalError> {
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or(path);
        let mut current = self
            .vars
            .get(root)
            .ok_or_else(|| EvalError::UnboundVariable {
                name: root.to_owned(),
            })?;

        for field in segments {
            current = match current {
                Value::Nil => &NIL,
                Value::Object(fields) => {
                    fields.get(field).ok_or_else(|| EvalError::MissingField {
                        path: path.to_owned(),
                        field: field.to_owned(),
                    })?
                }
                other => {
                    return Err(EvalError::NotAnObject {
                        path: path.to_owned(),
                        found: other.type_name(),
                    });
                }
            };
        }
        Ok(current)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
