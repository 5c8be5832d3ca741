//! Per-field functions synthesized when a class is built.
//!
//! For every declared field `F` a class carries three [`FieldFunction`]s:
//! `<F>s`, `from_<F>` and `has_<F>`. Each one is a field selector plus a kind, so a
//! single generic implementation serves every field. Typed access goes through
//! [`NamedEnum::field_values`](crate::NamedEnum::field_values) and friends; the registry
//! here serves lookups by function name, the way attribute access would.

use std::{fmt, vec};

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{
    class::NamedEnum,
    exception::{EnumError, EnumResult, ErrorKind},
    member::Member,
    value::Value,
};

/// Which of the three per-field operations a function performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FieldFunctionKind {
    /// `<F>s(as_tuple)`: the field's value for every entry.
    Values,
    /// `from_<F>(field_value, as_tuple)`: the members whose field equals the argument.
    From,
    /// `has_<F>(field_value)`: whether any member's field equals the argument.
    Has,
}

impl FieldFunctionKind {
    /// Returns the function name for `field`.
    #[must_use]
    pub fn function_name(self, field: &str) -> String {
        match self {
            Self::Values => format!("{field}s"),
            Self::From => format!("from_{field}"),
            Self::Has => format!("has_{field}"),
        }
    }

    /// Returns the docstring attached to the function for `field`.
    #[must_use]
    pub fn docstring(self, field: &str) -> String {
        match self {
            Self::Values => format!(
                "Collective function to return the values of the attribute {field} from all the enumerations in the Enum class."
            ),
            Self::From => format!(
                "Returns the corresponding enumeration(s) according to the given value of the attribute {field}."
            ),
            Self::Has => format!(
                "Returns if the corresponding enumeration(s) exists according to the given value of the attribute {field}."
            ),
        }
    }

    fn takes_argument(self) -> bool {
        !matches!(self, Self::Values)
    }
}

/// A synthesized per-field function: name, docstring and the field it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFunction {
    name: String,
    doc: String,
    field: String,
    index: usize,
    kind: FieldFunctionKind,
}

impl FieldFunction {
    /// Builds the three functions for the field at `index`, in `<F>s`, `from_<F>`,
    /// `has_<F>` order.
    pub(crate) fn for_field(field: &str, index: usize) -> impl Iterator<Item = Self> {
        FieldFunctionKind::iter().map(move |kind| Self {
            name: kind.function_name(field),
            doc: kind.docstring(field),
            field: field.to_owned(),
            index,
            kind,
        })
    }

    /// Returns the function name, e.g. `from_key`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the docstring.
    #[must_use]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Returns the field the function selects.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the kind of operation.
    #[must_use]
    pub fn kind(&self) -> FieldFunctionKind {
        self.kind
    }

    /// Invokes the function on `class`.
    ///
    /// `<F>s` takes no argument; `from_<F>` and `has_<F>` require one. `as_tuple` selects
    /// between a materialized result and a lazy one-shot iterator; `has_<F>` ignores it.
    ///
    /// # Errors
    /// `Argument` when the argument is missing or superfluous.
    pub fn call<'a>(&self, class: &'a NamedEnum, arg: Option<&Value>, as_tuple: bool) -> EnumResult<Outcome<'a>> {
        let arg = match (self.kind.takes_argument(), arg) {
            (true, Some(arg)) => Some(arg.clone()),
            (true, None) => {
                return Err(EnumError::new_msg(
                    ErrorKind::Argument,
                    format_args!("{}() missing 1 required positional argument: 'field_value'", self.name),
                ));
            }
            (false, Some(_)) => {
                return Err(EnumError::new_msg(
                    ErrorKind::Argument,
                    format_args!("{}() takes no field value", self.name),
                ));
            }
            (false, None) => None,
        };
        let index = self.index;
        Ok(match (self.kind, arg) {
            (FieldFunctionKind::From, Some(wanted)) => Outcome::Members(Collected::gather(
                class
                    .entries()
                    .filter(move |member| member.field_at(index) == Some(&wanted)),
                as_tuple,
            )),
            (FieldFunctionKind::Has, Some(wanted)) => {
                Outcome::Flag(class.field_values_at(index).any(|value| *value == wanted))
            }
            _ => Outcome::Values(Collected::gather(class.field_values_at(index), as_tuple)),
        })
    }
}

impl fmt::Display for FieldFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

/// Result of invoking a [`FieldFunction`] by name.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// From `<F>s`.
    Values(Collected<'a, &'a Value>),
    /// From `from_<F>`.
    Members(Collected<'a, &'a Member>),
    /// From `has_<F>`.
    Flag(bool),
}

impl<'a> Outcome<'a> {
    /// Returns the values, if this is a `<F>s` result.
    #[must_use]
    pub fn into_values(self) -> Option<Vec<&'a Value>> {
        match self {
            Self::Values(values) => Some(values.into_vec()),
            _ => None,
        }
    }

    /// Returns the members, if this is a `from_<F>` result.
    #[must_use]
    pub fn into_members(self) -> Option<Vec<&'a Member>> {
        match self {
            Self::Members(members) => Some(members.into_vec()),
            _ => None,
        }
    }

    /// Returns the flag, if this is a `has_<F>` result.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// A collection that is either materialized up front or produced lazily.
///
/// `as_tuple = true` yields [`Collected::Tuple`]; `false` yields [`Collected::Lazy`], a
/// one-shot iterator that is consumed by iterating it.
pub enum Collected<'a, T> {
    /// Materialized, ordered.
    Tuple(Vec<T>),
    /// Lazy, one-shot.
    Lazy(Box<dyn Iterator<Item = T> + 'a>),
}

impl<'a, T> Collected<'a, T> {
    pub(crate) fn gather(iter: impl Iterator<Item = T> + 'a, as_tuple: bool) -> Self {
        if as_tuple {
            Self::Tuple(iter.collect())
        } else {
            Self::Lazy(Box::new(iter))
        }
    }

    /// Returns whether the items are produced lazily.
    #[must_use]
    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    /// Returns the items if they are already materialized.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[T]> {
        match self {
            Self::Tuple(items) => Some(items),
            Self::Lazy(_) => None,
        }
    }

    /// Collects the remaining items.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Tuple(items) => items,
            Self::Lazy(iter) => iter.collect(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Collected<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tuple(items) => f.debug_tuple("Tuple").field(items).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl<'a, T> IntoIterator for Collected<'a, T> {
    type Item = T;
    type IntoIter = CollectedIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::Tuple(items) => CollectedIter::Tuple(items.into_iter()),
            Self::Lazy(iter) => CollectedIter::Lazy(iter),
        }
    }
}

/// Iterator over a [`Collected`].
pub enum CollectedIter<'a, T> {
    /// Draining a materialized collection.
    Tuple(vec::IntoIter<T>),
    /// Driving a lazy one.
    Lazy(Box<dyn Iterator<Item = T> + 'a>),
}

impl<T> Iterator for CollectedIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Self::Tuple(iter) => iter.next(),
            Self::Lazy(iter) => iter.next(),
        }
    }
}
