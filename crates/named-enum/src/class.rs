//! The built enumeration class and its read-only query surface.
//!
//! A [`NamedEnum`] is produced once by [`EnumBuilder::build`](crate::EnumBuilder::build)
//! and never mutated afterwards, so it can be shared freely across threads.
//!
//! Members are held twice over:
//! - `members`: canonical members in declaration order (what `iter()`/`len()` see)
//! - `member_map`: every declared name, aliases included, mapped to its canonical member
//!   (what `names()`, `values()`, `gen()` and the container exports see)

use std::{fmt, slice, sync::Arc};

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use strum::{Display, EnumIter, IntoStaticStr};

use crate::{
    builder::EnumBuilder,
    exception::{EnumError, EnumResult, ErrorKind},
    functions::{Collected, FieldFunction, Outcome},
    generate::GenerateNextValue,
    member::{ClassId, Member},
    record::RecordType,
    value::Value,
};

/// An immutable enumeration class whose members may carry named fields.
pub struct NamedEnum {
    pub(crate) id: ClassId,
    pub(crate) name: Arc<str>,
    pub(crate) module: Option<String>,
    pub(crate) base: Option<Arc<str>>,
    /// Effective raw field specification, own or inherited.
    pub(crate) field_spec: Option<Value>,
    pub(crate) record_type: Option<Arc<RecordType>>,
    pub(crate) members: Vec<Member>,
    pub(crate) member_map: IndexMap<String, usize>,
    pub(crate) value_map: AHashMap<Value, usize>,
    pub(crate) functions: IndexMap<String, FieldFunction>,
    pub(crate) attributes: IndexMap<String, Value>,
    pub(crate) generate_next_value: GenerateNextValue,
    pub(crate) source: Option<String>,
}

impl NamedEnum {
    /// Starts declaring a new root class.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> EnumBuilder {
        EnumBuilder::new(name)
    }

    /// Starts declaring a subclass of this class.
    ///
    /// The subclass inherits this class's field specification (unless it declares its
    /// own) and its `auto` hook. Building fails if this class already has members.
    #[must_use]
    pub fn subclass(&self, name: impl Into<String>) -> EnumBuilder {
        EnumBuilder::new(name).extends(self)
    }

    /// Returns the class identity.
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Returns the class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared module, if any.
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Returns the name of the parent class, if this class was declared as a subclass.
    #[must_use]
    pub fn base_name(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Returns the source snippet recorded by [`namedenum`](crate::namedenum).
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the effective raw field specification.
    #[must_use]
    pub fn field_spec(&self) -> Option<&Value> {
        self.field_spec.as_ref()
    }

    /// Returns the generated record type, or `None` when the class declares no fields.
    #[must_use]
    pub fn record_type(&self) -> Option<&Arc<RecordType>> {
        self.record_type.as_ref()
    }

    /// Returns the declared field names, empty when the class has none.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        match &self.record_type {
            Some(record_type) => record_type.field_names(),
            None => &[],
        }
    }

    /// Returns the `auto` hook subclasses inherit.
    #[must_use]
    pub fn generator(&self) -> GenerateNextValue {
        self.generate_next_value
    }

    /// Returns a non-member namespace entry (`_order_`, dunder names, ignored names).
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Number of canonical members; aliases are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the class has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates canonical members in declaration order.
    pub fn iter(&self) -> slice::Iter<'_, Member> {
        self.members.iter()
    }

    /// Returns the member registered under `name`, aliases included.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.member_map.get(name).map(|&idx| &self.members[idx])
    }

    /// Looks a member up by name.
    ///
    /// # Errors
    /// `Lookup` with the name's repr when no such member exists.
    pub fn get(&self, name: &str) -> EnumResult<&Member> {
        self.member(name)
            .ok_or_else(|| EnumError::new_msg(ErrorKind::Lookup, Value::from(name).py_repr()))
    }

    /// Looks a member up by value.
    ///
    /// Values compare structurally, so a plain tuple finds the member holding the equal
    /// record.
    ///
    /// # Errors
    /// `Lookup` with `<repr> is not a valid <ClassName>` when no member holds `value`.
    pub fn from_value(&self, value: &Value) -> EnumResult<&Member> {
        self.value_map.get(value).map(|&idx| &self.members[idx]).ok_or_else(|| {
            EnumError::new_msg(
                ErrorKind::Lookup,
                format_args!("{} is not a valid {}", value.py_repr(), self.name),
            )
        })
    }

    /// Returns `(alias, canonical)` name pairs in declaration order.
    #[must_use]
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        self.member_map
            .iter()
            .filter_map(|(name, &idx)| {
                let canonical = self.members[idx].name();
                (name != canonical).then_some((name.as_str(), canonical))
            })
            .collect()
    }

    /// Fails when the class has aliases.
    ///
    /// # Errors
    /// `Configuration` listing every `ALIAS -> ORIGINAL` pair.
    pub fn ensure_unique(&self) -> EnumResult<()> {
        let aliases = self.aliases();
        if aliases.is_empty() {
            return Ok(());
        }
        let details = aliases
            .iter()
            .map(|(alias, canonical)| format!("{alias} -> {canonical}"))
            .collect::<Vec<_>>()
            .join(", ");
        Err(EnumError::new_msg(
            ErrorKind::Configuration,
            format_args!("duplicate values found in {self}: {details}"),
        ))
    }

    /// Returns whether `probe` is a member of this class.
    ///
    /// Strings match member names; members match when they belong to this very class.
    /// The class itself and anything else never match.
    pub fn contains<M: Membership + ?Sized>(&self, probe: &M) -> bool {
        probe.is_member_of(self)
    }

    // ------------------------------------------------------------------------
    // Name registry views
    // ------------------------------------------------------------------------

    /// Iterates every registered member (aliases resolve to their canonical member).
    pub fn entries(&self) -> impl Iterator<Item = &Member> {
        self.member_map.values().map(|&idx| &self.members[idx])
    }

    /// Iterates `(name, value)` for every registered name.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.member_map
            .iter()
            .map(|(name, &idx)| (name.as_str(), self.members[idx].value()))
    }

    /// Returns a fresh generator over the name registry.
    ///
    /// Yields `(name, value)` pairs when `name_value_pair` is true, otherwise members.
    #[must_use]
    pub fn r#gen(&self, name_value_pair: bool) -> Gen<'_> {
        Gen {
            entries: self.member_map.iter(),
            members: &self.members,
            name_value_pair,
        }
    }

    /// Returns every registered name, materialized or lazy per `as_tuple`.
    #[must_use]
    pub fn names(&self, as_tuple: bool) -> Collected<'_, &str> {
        Collected::gather(self.names_iter(), as_tuple)
    }

    /// Iterates every registered name.
    pub fn names_iter(&self) -> impl Iterator<Item = &str> {
        self.member_map.keys().map(String::as_str)
    }

    /// Returns every registered value, materialized or lazy per `as_tuple`.
    #[must_use]
    pub fn values(&self, as_tuple: bool) -> Collected<'_, &Value> {
        Collected::gather(self.values_iter(), as_tuple)
    }

    /// Iterates every registered value.
    pub fn values_iter(&self) -> impl Iterator<Item = &Value> {
        self.entries().map(Member::value)
    }

    // ------------------------------------------------------------------------
    // Container exports
    // ------------------------------------------------------------------------

    /// Builds the requested container from `gen()`'s pairs.
    #[must_use]
    pub fn as_data_type(&self, kind: ContainerKind) -> Container<'_> {
        match kind {
            ContainerKind::Dict => Container::Dict(self.as_dict()),
            ContainerKind::OrderedDict => Container::OrderedDict(self.as_ordereddict()),
            ContainerKind::List => Container::List(self.as_list()),
            ContainerKind::Set => Container::Set(self.as_set()),
            ContainerKind::Tuple => Container::Tuple(self.as_tuple()),
        }
    }

    /// Name to value mapping.
    #[must_use]
    pub fn as_dict(&self) -> AHashMap<&str, &Value> {
        self.pairs().collect()
    }

    /// Name to value mapping in declaration order.
    #[must_use]
    pub fn as_ordereddict(&self) -> IndexMap<&str, &Value> {
        self.pairs().collect()
    }

    /// `(name, value)` pairs in declaration order.
    #[must_use]
    pub fn as_list(&self) -> Vec<(&str, &Value)> {
        self.pairs().collect()
    }

    /// `(name, value)` pairs as a set.
    #[must_use]
    pub fn as_set(&self) -> AHashSet<(&str, &Value)> {
        self.pairs().collect()
    }

    /// `(name, value)` pairs as a fixed sequence.
    #[must_use]
    pub fn as_tuple(&self) -> Box<[(&str, &Value)]> {
        self.pairs().collect()
    }

    // ------------------------------------------------------------------------
    // Per-field functions
    // ------------------------------------------------------------------------

    /// Returns whether the class declares any field.
    #[must_use]
    pub fn has_fields(&self) -> bool {
        self.record_type.is_some()
    }

    /// Returns the value of `field` for every registered entry (`<F>s`).
    ///
    /// # Errors
    /// `UnknownField` with message `<field>s` when the field is not declared.
    pub fn field_values(&self, field: &str) -> EnumResult<Vec<&Value>> {
        Ok(self.field_values_iter(field)?.collect())
    }

    /// Lazy form of [`field_values`](Self::field_values).
    pub fn field_values_iter<'a>(&'a self, field: &str) -> EnumResult<impl Iterator<Item = &'a Value> + use<'a>> {
        let index = self.field_index(field, || format!("{field}s"))?;
        Ok(self.field_values_at(index))
    }

    /// Returns the entries whose `field` equals `value` (`from_<F>`); empty when none match.
    ///
    /// # Errors
    /// `UnknownField` with message `from_<field>` when the field is not declared.
    pub fn from_field(&self, field: &str, value: &Value) -> EnumResult<Vec<&Member>> {
        let index = self.field_index(field, || format!("from_{field}"))?;
        Ok(self
            .entries()
            .filter(|member| member.field_at(index) == Some(value))
            .collect())
    }

    /// Lazy form of [`from_field`](Self::from_field).
    pub fn from_field_iter<'a>(
        &'a self,
        field: &str,
        value: &'a Value,
    ) -> EnumResult<impl Iterator<Item = &'a Member> + use<'a>> {
        let index = self.field_index(field, || format!("from_{field}"))?;
        Ok(self
            .entries()
            .filter(move |member| member.field_at(index) == Some(value)))
    }

    /// Returns whether some entry's `field` equals `value` (`has_<F>`).
    ///
    /// # Errors
    /// `UnknownField` with message `has_<field>` when the field is not declared.
    pub fn has_field(&self, field: &str, value: &Value) -> EnumResult<bool> {
        let index = self.field_index(field, || format!("has_{field}"))?;
        Ok(self.field_values_at(index).any(|candidate| candidate == value))
    }

    /// Returns the synthesized function called `name`.
    ///
    /// # Errors
    /// `UnknownField` whose message is `name`.
    pub fn function(&self, name: &str) -> EnumResult<&FieldFunction> {
        self.functions.get(name).ok_or_else(|| EnumError::unknown_field(name))
    }

    /// Iterates the synthesized functions in field order.
    pub fn functions(&self) -> impl Iterator<Item = &FieldFunction> {
        self.functions.values()
    }

    /// Invokes the synthesized function called `name`.
    ///
    /// # Errors
    /// `UnknownField` for an unknown function, `Argument` for a bad argument list.
    pub fn call(&self, name: &str, arg: Option<&Value>, as_tuple: bool) -> EnumResult<Outcome<'_>> {
        self.function(name)?.call(self, arg, as_tuple)
    }

    pub(crate) fn field_values_at(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.entries().filter_map(move |member| member.field_at(index))
    }

    fn field_index(&self, field: &str, function_name: impl FnOnce() -> String) -> EnumResult<usize> {
        self.record_type
            .as_ref()
            .and_then(|record_type| record_type.field_index(field))
            .ok_or_else(|| EnumError::unknown_field(function_name()))
    }
}

/// `<named enum 'Name'>`
impl fmt::Display for NamedEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<named enum '{}'>", self.name)
    }
}

/// Same as `Display`.
impl fmt::Debug for NamedEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<'a> IntoIterator for &'a NamedEnum {
    type Item = &'a Member;
    type IntoIter = slice::Iter<'a, Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Operand of a membership test against a [`NamedEnum`].
pub trait Membership {
    /// Returns whether `self` is a member of `class`.
    fn is_member_of(&self, class: &NamedEnum) -> bool;
}

impl Membership for str {
    fn is_member_of(&self, class: &NamedEnum) -> bool {
        class.member_map.contains_key(self)
    }
}

impl Membership for String {
    fn is_member_of(&self, class: &NamedEnum) -> bool {
        self.as_str().is_member_of(class)
    }
}

impl Membership for Member {
    fn is_member_of(&self, class: &NamedEnum) -> bool {
        self.class_id() == class.id && class.member_map.contains_key(self.name())
    }
}

impl Membership for NamedEnum {
    fn is_member_of(&self, _class: &Self) -> bool {
        false
    }
}

impl Membership for Value {
    fn is_member_of(&self, class: &NamedEnum) -> bool {
        self.as_str().is_some_and(|name| name.is_member_of(class))
    }
}

impl<T: Membership + ?Sized> Membership for &T {
    fn is_member_of(&self, class: &NamedEnum) -> bool {
        (**self).is_member_of(class)
    }
}

/// Item yielded by [`Gen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenItem<'a> {
    /// `(name, value)`.
    Pair(&'a str, &'a Value),
    /// The member registered under the name.
    Member(&'a Member),
}

/// One-shot generator over a class's name registry, see [`NamedEnum::r#gen`].
#[derive(Debug, Clone)]
pub struct Gen<'a> {
    entries: indexmap::map::Iter<'a, String, usize>,
    members: &'a [Member],
    name_value_pair: bool,
}

impl<'a> Iterator for Gen<'a> {
    type Item = GenItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (name, &idx) = self.entries.next()?;
        let member = &self.members[idx];
        Some(if self.name_value_pair {
            GenItem::Pair(name, member.value())
        } else {
            GenItem::Member(member)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

/// Container shapes available through [`NamedEnum::as_data_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ContainerKind {
    /// Unordered mapping.
    Dict,
    /// Insertion-ordered mapping.
    OrderedDict,
    /// Ordered list of pairs.
    List,
    /// Set of pairs.
    Set,
    /// Fixed sequence of pairs.
    Tuple,
}

/// A container built from a class's `(name, value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum Container<'a> {
    /// See [`NamedEnum::as_dict`].
    Dict(AHashMap<&'a str, &'a Value>),
    /// See [`NamedEnum::as_ordereddict`].
    OrderedDict(IndexMap<&'a str, &'a Value>),
    /// See [`NamedEnum::as_list`].
    List(Vec<(&'a str, &'a Value)>),
    /// See [`NamedEnum::as_set`].
    Set(AHashSet<(&'a str, &'a Value)>),
    /// See [`NamedEnum::as_tuple`].
    Tuple(Box<[(&'a str, &'a Value)]>),
}

impl Container<'_> {
    /// Returns the number of pairs held.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Dict(map) => map.len(),
            Self::OrderedDict(map) => map.len(),
            Self::List(pairs) => pairs.len(),
            Self::Set(set) => set.len(),
            Self::Tuple(pairs) => pairs.len(),
        }
    }

    /// Returns whether the container is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
