//! Log records and the loosely-typed values they carry.

use std::collections::BTreeMap;
use std::fmt;

use time::OffsetDateTime;

use crate::level::Level;

/// A value carried by a record: a positional argument or an
/// extender-added field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// A point in time.
    Time(OffsetDateTime),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            // Default rendering; renderers apply a format description instead.
            Value::Time(t) => write!(f, "{t}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(t: OffsetDateTime) -> Self {
        Value::Time(t)
    }
}

/// Build a `Vec<Value>` from heterogeneous argument literals.
///
/// ```ignore
/// logger.info("start {0} attempt {1}", args!["job-42", 3]);
/// ```
#[macro_export]
macro_rules! args {
    ($($v:expr),* $(,)?) => {
        vec![$($crate::Value::from($v)),*]
    };
}

/// One structured log event.
///
/// Created once per `log()` call, enriched by the extender chain, then
/// dispatched read-only to every handler on the ancestor chain and
/// dropped. Built-in fields live as plain struct members; extender-added
/// fields go into the extension map. Handlers must treat unknown
/// extension keys as opaque passthrough.
#[derive(Debug, Clone)]
pub struct Record {
    /// Severity of the event.
    pub level: Level,
    /// Name of the logger the event was logged on.
    pub name: String,
    /// Message template, positional fields unresolved.
    pub msg: String,
    /// Ordered positional arguments for the template.
    pub args: Vec<Value>,
    /// When the record was created.
    pub time: OffsetDateTime,
    /// Section nesting depth at the time of the call.
    pub nesting: usize,
    extra: BTreeMap<String, Value>,
}

impl Record {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(level: Level, name: &str, msg: &str, args: Vec<Value>, nesting: usize) -> Self {
        Self {
            level,
            name: name.to_string(),
            msg: msg.to_string(),
            args,
            time: OffsetDateTime::now_utc(),
            nesting,
            extra: BTreeMap::new(),
        }
    }

    /// Insert or overwrite an extension field.
    ///
    /// There is deliberately no removal: an extender may not drop fields
    /// written by an earlier one, only overwrite its own keys.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// Look up an extension field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// The extension map, in key order.
    pub fn extra(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.extra.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a field by name the way renderers see the record: the
    /// built-in fields first, then the extension map.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "level" => Some(Value::Str(self.level.as_str().to_string())),
            "name" => Some(Value::Str(self.name.clone())),
            "msg" => Some(Value::Str(self.msg.clone())),
            "time" => Some(Value::Time(self.time)),
            "nesting" => Some(Value::Int(self.nesting as i64)),
            _ => self.extra.get(name).cloned(),
        }
    }
}
