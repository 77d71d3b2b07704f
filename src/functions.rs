//! Built-in functions callable from rule expressions.

use std::collections::HashMap;
use std::fmt;

use crate::{EvalError, Value};

/// Signature of a built-in: the name it was called under, and its
/// evaluated arguments.
pub type Builtin = fn(&str, &[Value]) -> Result<Value, EvalError>;

/// Name to implementation table consulted for every call expression.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Builtin>,
}

impl FunctionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// The `string.*` functions.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("string.startsWith", starts_with);
        registry.register("string.endsWith", ends_with);
        registry.register("string.contains", contains);
        registry.register("string.length", length);
        registry.register("string.indexOf", index_of);
        registry.register("string.substring", substring);
        registry
    }

    /// Add or replace a function.
    pub fn register(&mut self, name: impl Into<String>, function: Builtin) {
        self.functions.insert(name.into(), function);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.functions.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Look up `name` and apply it.
    ///
    /// # Errors
    ///
    /// [`EvalError::UnknownFunction`] when nothing is registered under
    /// `name`, otherwise whatever the function itself returns.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let function = self.get(name).ok_or_else(|| EvalError::UnknownFunction {
            name: name.to_owned(),
        })?;
        function(name, args)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

// -- Argument helpers -------------------------------------------------------

const ARITY_LABELS: [&str; 4] = ["0", "1", "2", "3"];

fn check_arg_count(function: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::Arity {
            function: function.to_owned(),
            expected: ARITY_LABELS.get(expected).copied().unwrap_or("more"),
            found: args.len(),
        })
    }
}

fn string_arg<'a>(function: &str, args: &'a [Value], index: usize) -> Result<&'a str, EvalError> {
    match &args[index] {
        Value::String(s) => Ok(s),
        other => Err(EvalError::InvalidArgument {
            function: function.to_owned(),
            reason: format!(
                "argument {} must be a string, found {}",
                index + 1,
                other.type_name()
            ),
        }),
    }
}

fn index_arg(function: &str, args: &[Value], index: usize) -> Result<usize, EvalError> {
    match &args[index] {
        Value::Int(i) => usize::try_from(*i).map_err(|_| EvalError::InvalidArgument {
            function: function.to_owned(),
            reason: format!("argument {} must not be negative, found {i}", index + 1),
        }),
        other => Err(EvalError::InvalidArgument {
            function: function.to_owned(),
            reason: format!(
                "argument {} must be an int, found {}",
                index + 1,
                other.type_name()
            ),
        }),
    }
}

fn char_count_value(count: usize) -> Value {
    Value::Int(i64::try_from(count).unwrap_or(i64::MAX))
}

// -- string.* ---------------------------------------------------------------

fn starts_with(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    check_arg_count(name, args, 2)?;
    let s = string_arg(name, args, 0)?;
    let prefix = string_arg(name, args, 1)?;
    Ok(Value::Bool(s.starts_with(prefix)))
}

fn ends_with(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    check_arg_count(name, args, 2)?;
    let s = string_arg(name, args, 0)?;
    let suffix = string_arg(name, args, 1)?;
    Ok(Value::Bool(s.ends_with(suffix)))
}

fn contains(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    check_arg_count(name, args, 2)?;
    let s = string_arg(name, args, 0)?;
    let needle = string_arg(name, args, 1)?;
    Ok(Value::Bool(s.contains(needle)))
}

/// Length in characters.
fn length(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    check_arg_count(name, args, 1)?;
    let s = string_arg(name, args, 0)?;
    Ok(char_count_value(s.chars().count()))
}

/// Character index of the first occurrence, or -1.
fn index_of(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    check_arg_count(name, args, 2)?;
    let s = string_arg(name, args, 0)?;
    let needle = string_arg(name, args, 1)?;
    Ok(match s.find(needle) {
        Some(byte_pos) => char_count_value(s[..byte_pos].chars().count()),
        None => Value::Int(-1),
    })
}

/// `substring(s, begin)` or `substring(s, begin, end)`, in characters,
/// `end` exclusive.
fn substring(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    if !(2..=3).contains(&args.len()) {
        return Err(EvalError::Arity {
            function: name.to_owned(),
            expected: "2 or 3",
            found: args.len(),
        });
    }
    let s = string_arg(name, args, 0)?;
    let len = s.chars().count();
    let begin = index_arg(name, args, 1)?;
    let end = if args.len() == 3 {
        index_arg(name, args, 2)?
    } else {
        len
    };
    if begin > end || end > len {
        return Err(EvalError::InvalidArgument {
            function: name.to_owned(),
            reason: format!("range {begin}..{end} out of bounds for length {len}"),
        });
    }
    Ok(Value::String(s.chars().skip(begin).take(end - begin).collect()))
}
