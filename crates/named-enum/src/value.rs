use std::{
    fmt::{self, Write},
    hash::{Hash, Hasher},
};

use crate::{
    exception::{EnumError, EnumResult, ErrorKind},
    record::Record,
};

/// A literal value that an enumeration member can carry.
///
/// This is the owned value type for everything assigned in a namespace: raw literals
/// before materialization, and the field contents of records afterwards. It can be freely
/// cloned, compared and hashed, so member values can be exported into sets and maps.
///
/// # Equality and hashing
///
/// Equality is structural and follows Python's rules for the supported types:
/// - `Tuple` and `Record` compare by their items (a record equals a plain tuple with the
///   same items)
/// - `Bool`, `Int` and `Float` compare numerically across variants (`1 == 1.0 == True`)
/// - `List` only equals `List`
///
/// `Hash` agrees with equality: numerically equal values hash the same, and records hash
/// like tuples. `NaN` is treated as equal to itself so that `Eq` stays reflexive.
///
/// # Sequences
///
/// `Tuple`, `List` and `Record` are sequences and are unpacked positionally when a member
/// is materialized into a multi-field record. `String` is iterable in Python but is always
/// treated as a single atomic value here.
#[derive(Debug, Clone)]
pub enum Value {
    /// Python's `None` singleton.
    None,
    /// Boolean (`True` or `False`).
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit IEEE 754 float.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Mutable-style sequence, rendered with brackets.
    List(Vec<Self>),
    /// Immutable sequence, rendered with parentheses.
    Tuple(Vec<Self>),
    /// Instance of a generated record type.
    Record(Record),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            _ => self.repr_fmt(f),
        }
    }
}

impl Value {
    /// Returns the Python `repr()` string for this value.
    #[must_use]
    pub fn py_repr(&self) -> String {
        let mut s = String::new();
        // writing into a String cannot fail
        let _ = self.repr_fmt(&mut s);
        s
    }

    /// Writes the `repr()` form of this value.
    pub(crate) fn repr_fmt(&self, f: &mut impl Write) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&float_repr(*v)),
            Self::String(s) => string_repr_fmt(s, f),
            Self::List(items) => {
                f.write_char('[')?;
                write_items(items, f)?;
                f.write_char(']')
            }
            Self::Tuple(items) => {
                f.write_char('(')?;
                write_items(items, f)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Self::Record(record) => record.repr_fmt(f),
        }
    }

    /// Returns the Python type name of this value, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "str",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Record(record) => record.record_type().name(),
        }
    }

    /// Returns the items of a sequence value, or `None` for scalars and strings.
    #[must_use]
    pub fn sequence_items(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) | Self::Tuple(items) => Some(items),
            Self::Record(record) => Some(record.items()),
            _ => None,
        }
    }

    /// Returns the record if this value is one.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the string content if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a JSON value into a `Value`.
    ///
    /// - `null` → `None`
    /// - `true`/`false` → `Bool`
    /// - integer → `Int`, any other number → `Float`
    /// - string → `String`
    /// - array → `List`
    /// - `{"$tuple": [...]}` → `Tuple`
    ///
    /// Any other JSON object is a conversion error.
    pub fn from_json(value: serde_json::Value) -> EnumResult<Self> {
        use serde_json::Value as JV;
        Ok(match value {
            JV::Null => Self::None,
            JV::Bool(b) => Self::Bool(b),
            JV::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    return Err(EnumError::new_msg(
                        ErrorKind::Conversion,
                        format_args!("number {n} does not fit a 64-bit value"),
                    ));
                }
            }
            JV::String(s) => Self::String(s),
            JV::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect::<EnumResult<_>>()?),
            JV::Object(mut map) => match map.remove("$tuple") {
                Some(JV::Array(items)) if map.is_empty() => {
                    Self::Tuple(items.into_iter().map(Self::from_json).collect::<EnumResult<_>>()?)
                }
                _ => {
                    return Err(EnumError::new_msg(
                        ErrorKind::Conversion,
                        "JSON objects cannot be used as values, except {\"$tuple\": [...]}",
                    ));
                }
            },
        })
    }

    /// Returns the numeric view of `Bool`, `Int` and `Float` values.
    fn numeric(&self) -> Option<Numeric> {
        match self {
            Self::Bool(b) => Some(Numeric::Int(i64::from(*b))),
            Self::Int(i) => Some(Numeric::Int(*i)),
            Self::Float(f) => Some(Numeric::Float(*f)),
            _ => None,
        }
    }
}

/// Numeric view used for cross-variant equality and hashing.
#[derive(Clone, Copy)]
enum Numeric {
    Int(i64),
    Float(f64),
}

/// Float bounds within which `f as i64` is exact for integral floats.
const I64_FLOAT_MIN: f64 = -9_223_372_036_854_775_808.0;
const I64_FLOAT_END: f64 = 9_223_372_036_854_775_808.0;

impl Numeric {
    /// Returns the integer this number is equal to, if any.
    fn as_exact_int(self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i),
            Self::Float(f) if f.fract() == 0.0 && (I64_FLOAT_MIN..I64_FLOAT_END).contains(&f) => {
                #[expect(clippy::cast_possible_truncation, reason = "range and integrality checked above")]
                let exact = f as i64;
                Some(exact)
            }
            Self::Float(_) => None,
        }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Int(_), Self::Float(_)) | (Self::Float(_), Self::Int(_)) => {
                match (self.as_exact_int(), other.as_exact_int()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
        }
    }
}

impl Hash for Numeric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(i) = self.as_exact_int() {
            i.hash(state);
        } else if let Self::Float(f) = self {
            if f.is_nan() {
                u64::MAX.hash(state);
            } else {
                f.to_bits().hash(state);
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) | (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a.items() == b.items(),
            // records compare with tuples by items only, matching Python semantics
            (Self::Record(r), Self::Tuple(t)) | (Self::Tuple(t), Self::Record(r)) => r.items() == t.as_slice(),
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::None => 0u8.hash(state),
            Self::String(s) => {
                1u8.hash(state);
                s.hash(state);
            }
            Self::List(items) => {
                2u8.hash(state);
                items.hash(state);
            }
            // tuples and records share a tag so that equal values hash equally
            Self::Tuple(items) => {
                3u8.hash(state);
                items.as_slice().hash(state);
            }
            Self::Record(record) => {
                3u8.hash(state);
                record.items().hash(state);
            }
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => {
                4u8.hash(state);
                if let Some(n) = self.numeric() {
                    n.hash(state);
                }
            }
        }
    }
}

fn write_items(items: &[Value], f: &mut impl Write) -> fmt::Result {
    let mut iter = items.iter();
    if let Some(first) = iter.next() {
        first.repr_fmt(f)?;
        for item in iter {
            f.write_str(", ")?;
            item.repr_fmt(f)?;
        }
    }
    Ok(())
}

/// Formats a float the way Python's `repr()` does: the shortest round-tripping digits,
/// positional when the decimal exponent is in `-4..16`, scientific otherwise.
fn float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    let sci = format!("{v:e}");
    if let Some((mantissa, exp)) = sci.split_once('e')
        && let Ok(exp) = exp.parse::<i32>()
        && !(-4..16).contains(&exp)
    {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.unsigned_abs());
    }
    let mut s = v.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

/// Writes a Python string literal: single quotes unless the text contains a single quote
/// and no double quote.
pub(crate) fn string_repr_fmt(s: &str, f: &mut impl Write) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if c.is_control() => write!(f, "\\x{:02x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for Value {
    fn from(value: [T; N]) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_from_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> From<($($name,)+)> for Value {
            #[expect(non_snake_case, reason = "tuple elements are bound by their type names")]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Self::Tuple(vec![$($name.into()),+])
            }
        }
    };
}

impl_from_tuple!(A);
impl_from_tuple!(A, B);
impl_from_tuple!(A, B, C);
impl_from_tuple!(A, B, C, D);
impl_from_tuple!(A, B, C, D, E);
impl_from_tuple!(A, B, C, D, E, F);

fn conversion_error(expected: &str, value: &Value) -> EnumError {
    EnumError::new_msg(
        ErrorKind::Conversion,
        format_args!("expected {expected}, got {}", value.type_name()),
    )
}

/// Attempts to convert a `Value` to an i64 integer.
/// Booleans are not accepted.
impl TryFrom<&Value> for i64 {
    type Error = EnumError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(i) => Ok(*i),
            _ => Err(conversion_error("int", value)),
        }
    }
}

/// Attempts to convert a `Value` to an f64; integers are widened.
impl TryFrom<&Value> for f64 {
    type Error = EnumError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(f) => Ok(*f),
            #[expect(clippy::cast_precision_loss, reason = "same widening Python applies")]
            Value::Int(i) => Ok(*i as f64),
            _ => Err(conversion_error("float", value)),
        }
    }
}

impl TryFrom<&Value> for bool {
    type Error = EnumError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(*b),
            _ => Err(conversion_error("bool", value)),
        }
    }
}

impl TryFrom<&Value> for String {
    type Error = EnumError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(conversion_error("str", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::hash::BuildHasher;

    use super::*;

    fn hash_of(value: &Value) -> u64 {
        ahash::RandomState::with_seeds(1, 2, 3, 4).hash_one(value)
    }

    #[test]
    fn string_repr_picks_quotes() {
        assert_eq!(Value::from("Jordan").py_repr(), "'Jordan'");
        assert_eq!(Value::from("it's").py_repr(), "\"it's\"");
        assert_eq!(Value::from("a'b\"c").py_repr(), "'a\\'b\"c'");
        assert_eq!(Value::from("tab\there").py_repr(), "'tab\\there'");
    }

    #[test]
    fn tuple_repr_marks_single_items() {
        assert_eq!(Value::from((1,)).py_repr(), "(1,)");
        assert_eq!(Value::from(("FRANK", "MONICA")).py_repr(), "('FRANK', 'MONICA')");
        assert_eq!(Value::Tuple(vec![]).py_repr(), "()");
        assert_eq!(Value::from(vec![1, 2]).py_repr(), "[1, 2]");
    }

    #[test]
    fn float_repr_keeps_fraction() {
        assert_eq!(Value::Float(1.0).py_repr(), "1.0");
        assert_eq!(Value::Float(2.5).py_repr(), "2.5");
        assert_eq!(Value::Float(f64::INFINITY).py_repr(), "inf");
        assert_eq!(Value::Float(f64::NAN).py_repr(), "nan");
        assert_eq!(Value::Float(-0.0).py_repr(), "-0.0");
    }

    #[test]
    fn float_repr_switches_to_exponent() {
        assert_eq!(Value::Float(1e16).py_repr(), "1e+16");
        assert_eq!(Value::Float(1e15).py_repr(), "1000000000000000.0");
        assert_eq!(Value::Float(1e-5).py_repr(), "1e-05");
        assert_eq!(Value::Float(1e-7).py_repr(), "1e-07");
        assert_eq!(Value::Float(0.0001).py_repr(), "0.0001");
        assert_eq!(Value::Float(1.5e300).py_repr(), "1.5e+300");
        assert_eq!(Value::Float(-2.5e-10).py_repr(), "-2.5e-10");
        assert_eq!(Value::Float(1.234_567_890_123_456_8e17).py_repr(), "1.2345678901234568e+17");
    }

    #[test]
    fn numbers_compare_across_variants() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Float(1.5));
        assert_eq!(hash_of(&Value::Int(1)), hash_of(&Value::Float(1.0)));
        assert_eq!(hash_of(&Value::Float(0.0)), hash_of(&Value::Float(-0.0)));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    }

    #[test]
    fn lists_and_tuples_differ() {
        assert_ne!(Value::from(vec![1, 2]), Value::from((1, 2)));
        assert_eq!(Value::from((1, 2)), Value::from((1, 2)));
    }

    #[test]
    fn json_arrays_become_lists() {
        let json = serde_json::json!([1, "a", null, 2.5, {"$tuple": [true]}]);
        let value = Value::from_json(json).unwrap();
        assert_eq!(value.py_repr(), "[1, 'a', None, 2.5, (True,)]");
        assert!(Value::from_json(serde_json::json!({"a": 1})).is_err());
    }
}
