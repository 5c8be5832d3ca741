//! The namespace collector used while an enumeration class body is being declared.
//!
//! Every key assigned in the body flows through [`EnumNamespace::set`], which decides
//! whether the key is a member, a configuration entry, or a plain class attribute. The
//! `_field_names_` key is intercepted before any enum-specific rule applies, so it can be
//! stored without tripping the `_sunder_` check.
//!
//! Once the class constructor knows the record type it calls
//! [`EnumNamespace::materialize`], which converts every raw member literal into a record
//! and re-registers the members in their original order.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    exception::{EnumError, EnumResult, ErrorKind},
    generate::{GenerateNextValue, auto_increment},
    record::{RecordType, TupleClass},
    value::Value,
};

/// Namespace key holding the field specification.
pub const FIELD_NAMES_KEY: &str = "_field_names_";
/// Namespace key holding the expected member order.
pub const ORDER_KEY: &str = "_order_";
/// Namespace key listing names that are never members.
pub const IGNORE_KEY: &str = "_ignore_";

/// Ordered key/value store populated while an enumeration class body is evaluated.
#[derive(Debug, Clone)]
pub struct EnumNamespace {
    class_name: String,
    /// Every assigned key in insertion order, members and attributes alike.
    entries: IndexMap<String, Value>,
    /// Member names in declaration order.
    member_names: Vec<String>,
    /// Raw values of the members, parallel to `member_names`.
    last_values: Vec<Value>,
    /// Names listed in `_ignore_`.
    ignore: Vec<String>,
    generate_next_value: GenerateNextValue,
}

impl EnumNamespace {
    /// Creates an empty namespace using the default `auto` hook.
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self::with_generator(class_name, auto_increment)
    }

    /// Creates an empty namespace whose `auto` values come from `generate_next_value`.
    ///
    /// Subclasses pass the hook they inherit from their parent.
    #[must_use]
    pub fn with_generator(class_name: impl Into<String>, generate_next_value: GenerateNextValue) -> Self {
        Self {
            class_name: class_name.into(),
            entries: IndexMap::new(),
            member_names: Vec::new(),
            last_values: Vec::new(),
            ignore: Vec::new(),
            generate_next_value,
        }
    }

    /// Assigns `key`, classifying it as configuration, attribute or member.
    ///
    /// Returns whether the key became a member.
    ///
    /// # Errors
    /// - `ReservedName` for an unrecognised `_sunder_` key
    /// - `DuplicateKey` when a member key is assigned twice, or a member reuses an
    ///   attribute name
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> EnumResult<bool> {
        let key = key.into();
        let value = value.into();
        if key == FIELD_NAMES_KEY {
            self.entries.insert(key, value);
            return Ok(false);
        }
        self.set_item(key, value)
    }

    /// Assigns `key` the value computed by the generation hook.
    pub fn set_auto(&mut self, key: impl Into<String>) -> EnumResult<bool> {
        let key = key.into();
        let value = (self.generate_next_value)(&key, 1, self.member_names.len(), &self.last_values);
        self.set(key, value)
    }

    /// Replaces the generation hook.
    ///
    /// # Errors
    /// Fails with a configuration error once any member has been assigned.
    pub fn set_generator(&mut self, generate_next_value: GenerateNextValue) -> EnumResult<()> {
        if !self.member_names.is_empty() {
            return Err(EnumError::new_msg(
                ErrorKind::Configuration,
                "_generate_next_value_ must be defined before members",
            ));
        }
        self.generate_next_value = generate_next_value;
        Ok(())
    }

    /// Drops every member entry, keeping configuration and attribute entries.
    pub fn reset(&mut self) {
        for name in self.member_names.drain(..) {
            self.entries.shift_remove(&name);
        }
        self.last_values.clear();
    }

    /// Converts every raw member value into an instance of `tuple_class`.
    ///
    /// A single-field record wraps the raw value verbatim. With several fields, strings
    /// are atomic and sequences are unpacked positionally. Members are re-registered in
    /// their original order once every conversion has succeeded.
    ///
    /// # Errors
    /// - `Conversion` when `tuple_class` is not a generated record type
    /// - `Conversion` with "Unable to unpack the value '<v>' as <Type> for the fields."
    ///   when a raw value cannot fill the record
    pub fn materialize(&mut self, tuple_class: &TupleClass) -> EnumResult<()> {
        let TupleClass::Named(record_type) = tuple_class else {
            return Err(EnumError::new_msg(
                ErrorKind::Conversion,
                "materialization requires a generated record type, not the plain tuple type",
            ));
        };
        let converted = self
            .last_values
            .iter()
            .map(|value| convert(record_type, value))
            .collect::<EnumResult<Vec<_>>>()?;
        let names = self.member_names.clone();
        self.reset();
        for (name, value) in names.into_iter().zip(converted) {
            self.set(name, value)?;
        }
        Ok(())
    }

    /// Returns the class name this namespace belongs to.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the value assigned to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns whether `key` has been assigned.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the raw field specification, if `_field_names_` was assigned.
    #[must_use]
    pub fn field_names(&self) -> Option<&Value> {
        self.entries.get(FIELD_NAMES_KEY)
    }

    /// Returns member names in declaration order.
    #[must_use]
    pub fn member_names(&self) -> &[String] {
        &self.member_names
    }

    /// Returns member values in declaration order.
    #[must_use]
    pub fn last_values(&self) -> &[Value] {
        &self.last_values
    }

    /// Returns the `auto` hook in effect.
    #[must_use]
    pub fn generator(&self) -> GenerateNextValue {
        self.generate_next_value
    }

    /// Iterates members as `(name, value)` in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.member_names.iter().map(String::as_str).zip(self.last_values.iter())
    }

    /// Iterates the entries that are not members, in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter(|(key, _)| !self.member_names.contains(key))
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of entries, members and attributes alike.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set_item(&mut self, key: String, value: Value) -> EnumResult<bool> {
        if is_private(&self.class_name, &key) || is_dunder(&key) {
            self.entries.insert(key, value);
            return Ok(false);
        }
        if is_sunder(&key) {
            match key.as_str() {
                ORDER_KEY => {}
                IGNORE_KEY => {
                    let ignore = parse_name_list(&value, IGNORE_KEY)?;
                    if let Some(already) = ignore.iter().find(|name| self.member_names.contains(name)) {
                        return Err(EnumError::new_msg(
                            ErrorKind::Configuration,
                            format_args!("_ignore_ cannot specify already set names: '{already}'"),
                        ));
                    }
                    self.ignore = ignore;
                }
                _ => return Err(EnumError::reserved_name(&key)),
            }
            self.entries.insert(key, value);
            return Ok(false);
        }
        if self.ignore.contains(&key) {
            self.entries.insert(key, value);
            return Ok(false);
        }
        if let Some(existing) = self.entries.get(&key) {
            return Err(EnumError::new_msg(
                ErrorKind::DuplicateKey,
                format_args!("'{key}' already defined as {}", existing.py_repr()),
            ));
        }
        self.member_names.push(key.clone());
        self.last_values.push(value.clone());
        self.entries.insert(key, value);
        Ok(true)
    }
}

fn convert(record_type: &Arc<RecordType>, value: &Value) -> EnumResult<Value> {
    let record = if record_type.arity() == 1 {
        record_type.instantiate([value.clone()])
    } else {
        match value.sequence_items() {
            Some(items) => record_type.instantiate(items.iter().cloned()),
            None => return Err(EnumError::unpack(value, record_type.name())),
        }
    };
    record
        .map(Value::Record)
        .map_err(|_| EnumError::unpack(value, record_type.name()))
}

/// Parses `_order_`/`_ignore_` style name lists: a comma/space separated string or a
/// sequence of strings.
pub(crate) fn parse_name_list(value: &Value, key: &str) -> EnumResult<Vec<String>> {
    match value {
        Value::String(s) => Ok(s.replace(',', " ").split_whitespace().map(str::to_owned).collect()),
        _ => value
            .sequence_items()
            .and_then(|items| items.iter().map(|item| item.as_str().map(str::to_owned)).collect())
            .ok_or_else(|| {
                EnumError::new_msg(
                    ErrorKind::Configuration,
                    format_args!("{key} must be a string or a sequence of strings"),
                )
            }),
    }
}

/// `__name__` style: at least one character between double underscores on both sides.
fn is_dunder(name: &str) -> bool {
    let b = name.as_bytes();
    b.len() > 4 && name.starts_with("__") && name.ends_with("__") && b[2] != b'_' && b[b.len() - 3] != b'_'
}

/// `_name_` style: single underscores on both sides.
fn is_sunder(name: &str) -> bool {
    let b = name.as_bytes();
    b.len() > 2 && b[0] == b'_' && b[1] != b'_' && b[b.len() - 1] == b'_' && b[b.len() - 2] != b'_'
}

/// Name-mangled private attribute, `_<Class>__name`.
fn is_private(class_name: &str, name: &str) -> bool {
    let pattern = format!("_{}__", class_name.trim_start_matches('_'));
    name.len() > pattern.len() && name.starts_with(&pattern) && !name.ends_with("__")
}
