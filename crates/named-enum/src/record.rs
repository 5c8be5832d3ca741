//! Generated fixed-arity record types, the value shape of named-enum members.
//!
//! A [`RecordType`] is built once per enumeration class from its field specification and
//! shared by every member through an `Arc`. Records are like tuples with field names:
//! - By index: `record.get_index(0)`
//! - By name: `record.get("key")`
//!
//! Records are immutable, and compare and hash by their items only, so a record equals a
//! plain tuple holding the same values.

use std::{
    fmt::{self, Write},
    hash::{Hash, Hasher},
    sync::Arc,
};

use ahash::AHashSet;

use crate::{
    exception::{EnumError, EnumResult, ErrorKind},
    value::Value,
};

/// Type name given to every record type generated for an enumeration class.
pub const RECORD_TYPE_NAME: &str = "NamedTuple";

/// A generated record type: a name plus an ordered list of unique field names.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RecordType {
    /// Type name for repr (e.g., "NamedTuple").
    name: String,
    /// Field names in order.
    field_names: Box<[String]>,
}

impl RecordType {
    /// Creates a record type after validating its field names.
    ///
    /// Every name must be a non-empty identifier that does not start with an underscore,
    /// and no name may appear twice.
    pub fn new(name: impl Into<String>, field_names: Vec<String>) -> EnumResult<Arc<Self>> {
        let mut seen = AHashSet::with_capacity(field_names.len());
        for field in &field_names {
            if !is_identifier(field) {
                return Err(EnumError::new_msg(
                    ErrorKind::Configuration,
                    format_args!("Type names and field names must be valid identifiers: '{field}'"),
                ));
            }
            if field.starts_with('_') {
                return Err(EnumError::new_msg(
                    ErrorKind::Configuration,
                    format_args!("Field names cannot start with an underscore: '{field}'"),
                ));
            }
            if !seen.insert(field.as_str()) {
                return Err(EnumError::new_msg(
                    ErrorKind::Configuration,
                    format_args!("Encountered duplicate field name: '{field}'"),
                ));
            }
        }
        Ok(Arc::new(Self {
            name: name.into(),
            field_names: field_names.into_boxed_slice(),
        }))
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.field_names.len()
    }

    /// Returns the position of `field`, if it is declared.
    #[must_use]
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.field_names.iter().position(|name| name == field)
    }

    /// Creates an instance from positional items.
    ///
    /// Fails with a conversion error when the number of items differs from the arity.
    pub fn instantiate(self: &Arc<Self>, items: impl IntoIterator<Item = Value>) -> EnumResult<Record> {
        let items: Vec<Value> = items.into_iter().collect();
        if items.len() != self.arity() {
            return Err(EnumError::new_msg(
                ErrorKind::Conversion,
                format_args!("{}() takes {} values but {} were given", self.name, self.arity(), items.len()),
            ));
        }
        Ok(Record {
            record_type: Arc::clone(self),
            items,
        })
    }
}

/// Parses a raw field specification into field names.
///
/// Accepts a string of names separated by commas and/or whitespace (`"key, label"`), or a
/// tuple/list of strings. Anything else is a configuration error.
pub fn parse_field_names(spec: &Value) -> EnumResult<Vec<String>> {
    match spec {
        Value::String(s) => Ok(s.replace(',', " ").split_whitespace().map(str::to_owned).collect()),
        Value::Tuple(items) | Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(EnumError::new_msg(
                    ErrorKind::Configuration,
                    format_args!("field names must be strings, got {}", other.type_name()),
                )),
            })
            .collect(),
        other => Err(EnumError::new_msg(
            ErrorKind::Configuration,
            format_args!(
                "field names must be a string or a sequence of strings, got {}",
                other.type_name()
            ),
        )),
    }
}

/// Returns whether `s` is a valid identifier: a letter or underscore followed by letters,
/// digits or underscores.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// An immutable instance of a [`RecordType`].
#[derive(Debug, Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    /// Values in order (same length as the type's field names).
    items: Vec<Value>,
}

impl Record {
    /// Returns the record type this instance belongs to.
    #[must_use]
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    /// Returns the items in field order.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets a field value by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record_type.field_index(field).map(|idx| &self.items[idx])
    }

    /// Gets a field value by position.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Iterates `(field name, value)` pairs in field order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.record_type.field_names.iter().map(String::as_str).zip(self.items.iter())
    }

    /// Writes `TypeName(field1=value1, field2=value2, ...)`.
    pub(crate) fn repr_fmt(&self, f: &mut impl Write) -> fmt::Result {
        f.write_str(&self.record_type.name)?;
        f.write_char('(')?;
        let mut first = true;
        for (name, value) in self.fields() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            f.write_str(name)?;
            f.write_char('=')?;
            value.repr_fmt(f)?;
        }
        f.write_char(')')
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.repr_fmt(f)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items().hash(state);
    }
}

/// The tuple class handed to namespace materialization.
///
/// Only generated record types are valid targets; the plain tuple type is rejected.
#[derive(Debug, Clone)]
pub enum TupleClass {
    /// The bare, unnamed tuple type.
    Plain,
    /// A generated record type.
    Named(Arc<RecordType>),
}

impl From<Arc<RecordType>> for TupleClass {
    fn from(record_type: Arc<RecordType>) -> Self {
        Self::Named(record_type)
    }
}
