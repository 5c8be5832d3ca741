use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{
    exception::{EnumError, EnumResult},
    record::RecordType,
    value::Value,
};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a built enumeration class.
///
/// Every build allocates a fresh id, so two classes with the same name and members are
/// still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

impl ClassId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A member of a named enum: a name bound to a value, owned by exactly one class.
///
/// Members compare by identity (owning class and name), never by value, so an alias
/// resolves to the very member it aliases.
#[derive(Clone)]
pub struct Member {
    class_id: ClassId,
    class_name: Arc<str>,
    name: String,
    value: Value,
    record_type: Option<Arc<RecordType>>,
}

impl Member {
    pub(crate) fn new(
        class_id: ClassId,
        class_name: Arc<str>,
        name: String,
        value: Value,
        record_type: Option<Arc<RecordType>>,
    ) -> Self {
        Self {
            class_id,
            class_name,
            name,
            value,
            record_type,
        }
    }

    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the member value; a record when the class declares fields.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the name of the owning class.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the identity of the owning class.
    #[must_use]
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Returns the value of `field`, or `None` when the class does not declare it.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&Value> {
        let index = self.record_type.as_ref()?.field_index(field)?;
        self.field_at(index)
    }

    pub(crate) fn field_at(&self, index: usize) -> Option<&Value> {
        self.value.as_record()?.get_index(index)
    }

    /// Resolves an attribute the way member attribute access does.
    ///
    /// Declared fields come first, then `name` and `value`.
    ///
    /// # Errors
    /// `UnknownAttribute` for anything else.
    pub fn getattr(&self, attr: &str) -> EnumResult<Cow<'_, Value>> {
        if let Some(value) = self.field(attr) {
            return Ok(Cow::Borrowed(value));
        }
        match attr {
            "name" => Ok(Cow::Owned(Value::String(self.name.clone()))),
            "value" => Ok(Cow::Borrowed(&self.value)),
            _ => Err(EnumError::unknown_attribute(&self.class_name, attr)),
        }
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.class_id == other.class_id && self.name == other.name
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class_id.hash(state);
        self.name.hash(state);
    }
}

/// `Class.NAME: value-repr`
impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: ", self.class_name, self.name)?;
        self.value.repr_fmt(f)
    }
}

/// `<Class.NAME: value-repr>`
impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}.{}: ", self.class_name, self.name)?;
        self.value.repr_fmt(f)?;
        f.write_str(">")
    }
}
