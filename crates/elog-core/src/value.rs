//! Loggable values
//!
//! Everything passed to `debug`/`error` is converted into a [`LogValue`]
//! and rendered to text before it reaches the formatter. Containers render in
//! their structural form: mappings as `{k: v, ...}`, sequences as
//! `[v0, v1, ...]`. Text renders without quotes, including inside containers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A value that can be rendered into a log line
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Ordered list of values
    Sequence(Vec<LogValue>),
    /// Key-value pairs, rendered in the order given
    Mapping(Vec<(LogValue, LogValue)>),
    /// Arbitrary object, already rendered through its own text form
    Object(String),
}

impl LogValue {
    /// Wrap anything with a `Display` form as an opaque object
    pub fn display(value: &impl fmt::Display) -> Self {
        Self::Object(value.to_string())
    }

    /// Render an error together with its `source()` chain
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut text = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            text.push_str(&format!(" (caused by: {})", cause));
            source = cause.source();
        }
        Self::Object(text)
    }

    /// Build a mapping preserving iteration order
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<LogValue>,
        V: Into<LogValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Build a sequence
    pub fn sequence<T, I>(items: I) -> Self
    where
        T: Into<LogValue>,
        I: IntoIterator<Item = T>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Render to text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Null => write!(f, "null"),
            LogValue::Bool(b) => write!(f, "{}", b),
            LogValue::Int(i) => write!(f, "{}", i),
            // Debug keeps the fractional part: 1.0 stays "1.0"
            LogValue::Float(x) => write!(f, "{:?}", x),
            LogValue::Text(s) | LogValue::Object(s) => f.write_str(s),
            LogValue::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            LogValue::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for LogValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<()> for LogValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for LogValue {
                fn from(v: $t) -> Self {
                    Self::Int(v as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for LogValue {
                fn from(v: $t) -> Self {
                    match i64::try_from(v) {
                        Ok(i) => Self::Int(i),
                        Err(_) => Self::Object(v.to_string()),
                    }
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, isize, i128, u128);

impl From<f32> for LogValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for LogValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(LogValue::Null)
    }
}

impl<T: Into<LogValue>> From<Vec<T>> for LogValue {
    fn from(items: Vec<T>) -> Self {
        Self::sequence(items)
    }
}

impl<T: Into<LogValue> + Clone> From<&[T]> for LogValue {
    fn from(items: &[T]) -> Self {
        Self::sequence(items.iter().cloned())
    }
}

impl<T: Into<LogValue>, const N: usize> From<[T; N]> for LogValue {
    fn from(items: [T; N]) -> Self {
        Self::sequence(items)
    }
}

impl<K: Into<LogValue>, V: Into<LogValue>> From<BTreeMap<K, V>> for LogValue {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::mapping(map)
    }
}

impl<K: Into<LogValue>, V: Into<LogValue>, S> From<HashMap<K, V, S>> for LogValue {
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::mapping(map)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => match n.as_f64() {
                    Some(x) if n.is_f64() => Self::Float(x),
                    _ => Self::Object(n.to_string()),
                },
            },
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::sequence(items),
            Value::Object(map) => Self::mapping(map),
        }
    }
}
