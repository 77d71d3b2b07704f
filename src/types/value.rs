use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::expr::CompareOp;

/// Dynamic values bound to call parameters and produced by rule expressions.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Value {
    /// The absence of a value. Spelled `nil` in expressions.
    #[default]
    Nil,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A structured object whose fields expressions can dereference.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Build an object value from `(field, value)` pairs.
    #[must_use]
    pub fn object<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Name of the value's type, as used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Look up a field on an object value. Returns `None` for non-objects.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Compare this value to another using the given operator.
    ///
    /// Returns `None` when the two types cannot be compared with `op`:
    /// lists and objects only support `==` and `!=`, and unrelated scalar
    /// types (a bool against a number, say) never compare.
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &Value) -> Option<bool> {
        if self.is_nan() || other.is_nan() {
            return Some(op == CompareOp::Neq);
        }
        if let (Value::List(_), Value::List(_)) | (Value::Object(_), Value::Object(_)) =
            (self, other)
        {
            return match op {
                CompareOp::Eq => Some(self == other),
                CompareOp::Neq => Some(self != other),
                _ => None,
            };
        }
        let ord = self.partial_cmp_value(other)?;
        Some(match op {
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Neq => ord != Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
        })
    }

    fn is_nan(&self) -> bool {
        matches!(self, Value::Float(f) if f.is_nan())
    }

    fn partial_cmp_value(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            // nil sorts below everything else
            (Value::Nil, Value::Nil) => Some(Ordering::Equal),
            (Value::Nil, _) => Some(Ordering::Less),
            (_, Value::Nil) => Some(Ordering::Greater),
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
            (Value::String(a), Value::Int(_) | Value::Float(_)) => {
                Some(a.as_str().cmp(other.to_string().as_str()))
            }
            (Value::Int(_) | Value::Float(_), Value::String(b)) => {
                Some(self.to_string().as_str().cmp(b.as_str()))
            }
            _ => None,
        }
    }
}

/// Compare an int with a float without rounding the int.
///
/// Whole floats inside the `i64` range are compared as integers; anything
/// else has a fractional part or lies beyond every `i64`, where the float
/// comparison is exact enough to order them.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn cmp_int_float(a: i64, b: f64) -> Option<Ordering> {
    // 2^63, the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if b.fract() == 0.0 && (-LIMIT..LIMIT).contains(&b) {
        Some(a.cmp(&(b as i64)))
    } else {
        (a as f64).partial_cmp(&b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Object(v)
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Value {
    fn from(v: HashMap<String, V>) -> Self {
        Value::object(v)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "serde")]
impl Value {
    /// Convert any serializable type into a [`Value`], typically a request
    /// body struct that rules dereference as `user.name`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `value` cannot be serialized.
    pub fn from_serialize<T: serde::Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Value::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_int_against_float_is_exact() {
        let int = Value::Int(9_007_199_254_740_993);
        let float = Value::Float(9_007_199_254_740_992.0);
        assert_eq!(int.compare(CompareOp::Eq, &float), Some(false));
        assert_eq!(float.compare(CompareOp::Eq, &int), Some(false));
        assert_eq!(int.compare(CompareOp::Gt, &float), Some(true));
        assert_eq!(float.compare(CompareOp::Lt, &int), Some(true));
        assert_eq!(
            Value::Int(i64::MAX).compare(CompareOp::Lt, &Value::Float(9.3e18)),
            Some(true)
        );
        assert_eq!(
            Value::Int(3).compare(CompareOp::Lt, &Value::Float(3.5)),
            Some(true)
        );
        assert_eq!(
            Value::Int(3).compare(CompareOp::Eq, &Value::Float(f64::NAN)),
            Some(false)
        );
    }

    #[test]
    fn from_integers() {
        assert_eq!(Value::from(42_i64), Value::Int(42));
        assert_eq!(Value::from(42_i32), Value::Int(42));
        assert_eq!(Value::from(42_u32), Value::Int(42));
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Nil);
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
    }

    #[test]
    fn from_vec() {
        assert_eq!(
            Value::from(vec![1_i64, 2]),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn object_field_lookup() {
        let user = Value::object([("name", Value::from("alice")), ("age", Value::from(30_i64))]);
        assert_eq!(user.field("name"), Some(&Value::String("alice".into())));
        assert_eq!(user.field("gender"), None);
        assert_eq!(Value::Int(1).field("name"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::String("hello".into()).to_string(), "hello");
        assert_eq!(Value::from(vec![1_i64, 2]).to_string(), "[1, 2]");
        assert_eq!(
            Value::object([("a", 1_i64)]).to_string(),
            "{a: 1}"
        );
    }

    #[test]
    fn compare_int() {
        let a = Value::Int(10);
        let b = Value::Int(20);
        assert_eq!(a.compare(CompareOp::Eq, &b), Some(false));
        assert_eq!(a.compare(CompareOp::Neq, &b), Some(true));
        assert_eq!(a.compare(CompareOp::Lt, &b), Some(true));
        assert_eq!(a.compare(CompareOp::Lte, &b), Some(true));
        assert_eq!(a.compare(CompareOp::Gt, &b), Some(false));
        assert_eq!(a.compare(CompareOp::Gte, &b), Some(false));
        assert_eq!(a.compare(CompareOp::Gte, &a), Some(true));
    }

    #[test]
    fn compare_int_float_cross_type() {
        let i = Value::Int(10);
        let f = Value::Float(10.0);
        assert_eq!(i.compare(CompareOp::Eq, &f), Some(true));
        assert_eq!(f.compare(CompareOp::Eq, &i), Some(true));
        assert_eq!(i.compare(CompareOp::Lt, &Value::Float(10.5)), Some(true));
    }

    #[test]
    fn compare_nil() {
        assert_eq!(Value::Nil.compare(CompareOp::Eq, &Value::Nil), Some(true));
        assert_eq!(Value::Int(16).compare(CompareOp::Neq, &Value::Nil), Some(true));
        assert_eq!(Value::Nil.compare(CompareOp::Eq, &Value::Int(0)), Some(false));
        assert_eq!(Value::Nil.compare(CompareOp::Gt, &Value::Int(18)), Some(false));
        assert_eq!(Value::Nil.compare(CompareOp::Lt, &Value::from("")), Some(true));
    }

    #[test]
    fn compare_string_lexicographic() {
        let a = Value::from("2019-12-21");
        let b = Value::from("2019-12-20");
        assert_eq!(a.compare(CompareOp::Gt, &b), Some(true));
        assert_eq!(a.compare(CompareOp::Eq, &a), Some(true));
    }

    #[test]
    fn compare_string_with_number_uses_text() {
        // "9" > "18" lexicographically
        assert_eq!(Value::from("9").compare(CompareOp::Gt, &Value::Int(18)), Some(true));
        assert_eq!(Value::Int(18).compare(CompareOp::Eq, &Value::from("18")), Some(true));
    }

    #[test]
    fn compare_bool() {
        let t = Value::Bool(true);
        let f = Value::Bool(false);
        assert_eq!(t.compare(CompareOp::Eq, &t), Some(true));
        assert_eq!(t.compare(CompareOp::Neq, &f), Some(true));
        assert_eq!(f.compare(CompareOp::Lt, &t), Some(true));
    }

    #[test]
    fn compare_nan_is_never_equal() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan.compare(CompareOp::Eq, &nan), Some(false));
        assert_eq!(nan.compare(CompareOp::Neq, &nan), Some(true));
        assert_eq!(nan.compare(CompareOp::Lt, &Value::Int(1)), Some(false));
    }

    #[test]
    fn compare_structured_equality_only() {
        let a = Value::from(vec![1_i64]);
        assert_eq!(a.compare(CompareOp::Eq, &a.clone()), Some(true));
        assert_eq!(a.compare(CompareOp::Gt, &a.clone()), None);
        let o = Value::object([("x", 1_i64)]);
        assert_eq!(o.compare(CompareOp::Neq, &Value::object([("x", 2_i64)])), Some(true));
    }

    #[test]
    fn compare_type_mismatch_returns_none() {
        let i = Value::Int(1);
        let b = Value::Bool(true);
        assert_eq!(i.compare(CompareOp::Eq, &b), None);
        assert_eq!(Value::from("x").compare(CompareOp::Eq, &b), None);
        assert_eq!(i.compare(CompareOp::Eq, &Value::from(vec![1_i64])), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn from_serialize_struct() {
        #[derive(serde::Serialize)]
        struct User {
            name: Option<String>,
            age: u32,
        }
        let v = Value::from_serialize(&User { name: None, age: 20 }).unwrap();
        assert_eq!(v.field("name"), Some(&Value::Nil));
        assert_eq!(v.field("age"), Some(&Value::Int(20)));
    }
}
