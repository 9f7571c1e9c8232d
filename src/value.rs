use crate::buffer::TypedArray;
use crate::key::Key;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

/// Any value that can live inside, or be, a container
///
/// Containers are [`Value::Array`], [`Value::Map`], [`Value::Set`],
/// [`Value::Buffer`] and [`Value::Record`]; everything else is a leaf.
/// `Undefined` marks an empty slot and reads as absent.
///
/// Numbers compare with SameValueZero semantics (`NaN` equals `NaN`, `0`
/// equals `-0`), and maps, sets and records compare regardless of order, so
/// any `Value` can be an element of a [`Value::Set`].
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Map(IndexMap<Key, Value>),
    Set(IndexSet<Value>),
    Buffer(TypedArray),
    Record(IndexMap<String, Value>),
}

/// The kind of a [`Value`], used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Number,
    String,
    Array,
    Map,
    Set,
    Buffer,
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
            ValueKind::Set => "set",
            ValueKind::Buffer => "typed array",
            ValueKind::Record => "object",
        };
        write!(f, "{}", name)
    }
}

impl Value {
    /// Creates an empty record
    pub fn record() -> Self {
        Value::Record(IndexMap::new())
    }

    /// Creates an empty map
    pub fn map() -> Self {
        Value::Map(IndexMap::new())
    }

    /// Creates a set from the given elements, keeping the first of any duplicates
    pub fn set_of<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Set(elements.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
            Value::Set(_) => ValueKind::Set,
            Value::Buffer(_) => ValueKind::Buffer,
            Value::Record(_) => ValueKind::Record,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&IndexSet<Value>> {
        match self {
            Value::Set(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_buffer(&self) -> Option<&TypedArray> {
        match self {
            Value::Buffer(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Converts to a number the way a typed array element assignment does
    ///
    /// Strings follow the numeric literal grammar of `Number()`: surrounding
    /// whitespace is ignored, empty means 0, `0x`/`0o`/`0b` prefixes select a
    /// radix, `Infinity` is spelled exactly, and anything else that is not a
    /// decimal literal is `NaN`. Booleans become 0 or 1 and `Null` is 0. An
    /// array converts through its joined string form, so an empty array is
    /// 0, `[7]` is 7, `[null]` is 0, and `[true]` is `NaN`. Everything else is
    /// `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
            Value::Array(items) => match items.as_slice() {
                [] => 0.0,
                [only] => match only {
                    // These join to an empty string
                    Value::Undefined | Value::Null => 0.0,
                    Value::Number(n) => *n,
                    Value::String(s) => parse_number(s),
                    Value::Array(_) => only.to_number(),
                    _ => f64::NAN,
                },
                _ => f64::NAN,
            },
            _ => f64::NAN,
        }
    }
}

/// Parses a string with the grammar `Number()` accepts
fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return 0.0;
    }
    for (prefixes, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        if let Some(digits) = prefixes.iter().find_map(|p| trimmed.strip_prefix(*p)) {
            return parse_radix(digits, radix);
        }
    }
    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if is_decimal_literal(unsigned) {
        trimmed.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0, |acc, c| {
            c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
        })
        .unwrap_or(f64::NAN)
}

/// `digits[.digits][e[+-]digits]`, where either side of the point may be empty
fn is_decimal_literal(unsigned: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => {
            (all_digits(int) || int.is_empty())
                && (all_digits(frac) || frac.is_empty())
                && !(int.is_empty() && frac.is_empty())
        }
        None => all_digits(mantissa),
    };
    let exponent_ok = exponent.map_or(true, |exp| {
        let exp = exp
            .strip_prefix('+')
            .or_else(|| exp.strip_prefix('-'))
            .unwrap_or(exp);
        all_digits(exp)
    });
    mantissa_ok && exponent_ok
}

/// SameValueZero comparison of two numbers
pub(crate) fn same_value_zero(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Hashable bits of a number, consistent with [`same_value_zero`]
pub(crate) fn number_bits(n: f64) -> u64 {
    if n == 0.0 {
        0
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => same_value_zero(*a, *b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Buffer(a), Value::Buffer(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Value::Undefined | Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => number_bits(*n).hash(state),
            Value::String(s) => s.hash(state),
            Value::Array(items) => items.hash(state),
            // Equality ignores order for these, so only the size is hashed
            Value::Map(entries) => entries.len().hash(state),
            Value::Set(elements) => elements.len().hash(state),
            Value::Record(fields) => fields.len().hash(state),
            Value::Buffer(buffer) => buffer.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<Key, Value>> for Value {
    fn from(entries: IndexMap<Key, Value>) -> Self {
        Value::Map(entries)
    }
}

impl From<IndexSet<Value>> for Value {
    fn from(elements: IndexSet<Value>) -> Self {
        Value::Set(elements)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Value::Record(fields)
    }
}

impl From<TypedArray> for Value {
    fn from(buffer: TypedArray) -> Self {
        Value::Buffer(buffer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => json_number(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => items.iter().map(serde_json::Value::from).collect(),
            Value::Set(elements) => elements.iter().map(serde_json::Value::from).collect(),
            Value::Buffer(buffer) => buffer.iter().map(json_number).collect(),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| {
                        (key.to_name().into_owned(), serde_json::Value::from(value))
                    })
                    .collect(),
            ),
            Value::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

fn json_number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}
