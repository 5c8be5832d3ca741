//! Classes declared in a JSON document.
//!
//! ```json
//! {
//!   "enums": [
//!     {
//!       "name": "NBALegendary",
//!       "extends": "LabeledEnum",
//!       "members": {
//!         "JOHNSON": ["Johnson", "Magic Johnson"],
//!         "JORDAN": ["Jordan", "Air Jordan"]
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Entries are built in document order through the same builder as code declarations, so
//! an entry can extend an earlier one or a preset (`NamedEnum`, `ExtendedEnum`,
//! `LabeledEnum`, `PairEnum`). Member order follows the JSON object's key order. A member
//! value of `{"$auto": null}` takes its value from the `auto` hook, and
//! `{"$tuple": [...]}` is a tuple rather than a list.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    builder::EnumBuilder,
    class::NamedEnum,
    exception::{EnumError, EnumResult, ErrorKind},
    presets::preset_by_name,
    tracer::{BuildTracer, NoopTracer},
    value::Value,
};

const AUTO_KEY: &str = "$auto";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    enums: Vec<EnumDefinition>,
}

/// One class declaration in a definition document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDefinition {
    /// Class name, unique within the document.
    pub name: String,
    /// Declared module.
    #[serde(default)]
    pub module: Option<String>,
    /// Field specification: a `"a, b"` string or an array of names.
    #[serde(default)]
    pub fields: Option<serde_json::Value>,
    /// Parent class: an earlier entry or a preset name.
    #[serde(default)]
    pub extends: Option<String>,
    /// Expected member order (`_order_`).
    #[serde(default)]
    pub order: Option<serde_json::Value>,
    /// Members in declaration order.
    #[serde(default)]
    pub members: IndexMap<String, serde_json::Value>,
}

/// The classes built from a definition document, keyed by name in document order.
#[derive(Debug, Default)]
pub struct Registry {
    classes: IndexMap<String, NamedEnum>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `source` and builds every class it declares.
    ///
    /// # Errors
    /// `Definition` for malformed JSON, unknown keys, duplicate names or unknown parents;
    /// any build error of an entry is returned as is.
    pub fn from_json(source: &str) -> EnumResult<Self> {
        Self::from_json_traced(source, NoopTracer)
    }

    /// [`from_json`](Self::from_json) reporting every build to `tracer`.
    ///
    /// # Errors
    /// Same as [`from_json`](Self::from_json).
    pub fn from_json_traced(source: &str, mut tracer: impl BuildTracer) -> EnumResult<Self> {
        let document: Document = serde_json::from_str(source)?;
        let mut registry = Self::new();
        for definition in document.enums {
            registry.define(definition, &mut tracer)?;
        }
        Ok(registry)
    }

    /// Builds `definition` and adds it to the registry.
    ///
    /// # Errors
    /// `Definition` when the name is taken or the parent is unknown; otherwise the
    /// builder's errors.
    pub fn define(&mut self, definition: EnumDefinition, tracer: impl BuildTracer) -> EnumResult<&NamedEnum> {
        if self.classes.contains_key(&definition.name) {
            return Err(EnumError::new_msg(
                ErrorKind::Definition,
                format_args!("enum '{}' is defined more than once", definition.name),
            ));
        }
        let EnumDefinition {
            name,
            module,
            fields,
            extends,
            order,
            members,
        } = definition;

        let builder = match extends.as_deref() {
            Some(parent) => self.parent(parent)?.subclass(name.as_str()),
            None => EnumBuilder::new(name.as_str()),
        };
        let mut builder = builder.with_tracer(tracer);
        if let Some(module) = module {
            builder = builder.module(module);
        }
        if let Some(fields) = fields {
            builder = builder.field_names(Value::from_json(fields)?)?;
        }
        if let Some(order) = order {
            builder = builder.order(Value::from_json(order)?)?;
        }
        for (member, value) in members {
            builder = if is_auto(&value) {
                builder.auto(member)?
            } else {
                builder.member(member, Value::from_json(value)?)?
            };
        }
        let class = builder.build()?;
        Ok(self.classes.entry(name).or_insert(class))
    }

    /// Returns the class called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedEnum> {
        self.classes.get(name)
    }

    /// Iterates classes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &NamedEnum> {
        self.classes.values()
    }

    /// Iterates class names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns whether no class is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn parent(&self, name: &str) -> EnumResult<&NamedEnum> {
        self.classes
            .get(name)
            .or_else(|| preset_by_name(name))
            .ok_or_else(|| EnumError::new_msg(ErrorKind::Definition, format_args!("unknown parent enum '{name}'")))
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a NamedEnum;
    type IntoIter = indexmap::map::Values<'a, String, NamedEnum>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.values()
    }
}

fn is_auto(value: &serde_json::Value) -> bool {
    value.as_object().is_some_and(|map| map.len() == 1 && map.contains_key(AUTO_KEY))
}
