//! Two-phase construction of a [`NamedEnum`].
//!
//! An [`EnumBuilder`] owns an [`EnumNamespace`] while the class body is declared; every
//! assignment is checked immediately. [`EnumBuilder::build`] then runs the constructor:
//!
//! 1. Resolve the field specification: the class's own `_field_names_`, else the parent's.
//! 2. Generate the record type, rejecting `name` and `value` as fields.
//! 3. Materialize raw member values into records.
//! 4. Finalize: register members and aliases, check `_order_`.
//! 5. Synthesize `<F>s`, `from_<F>` and `has_<F>` for every field.
//!
//! ```
//! use named_enum::{NamedEnum, Value};
//!
//! let triangle = NamedEnum::builder("Triangle")
//!     .field_names(("first", "second", "third"))?
//!     .member("EQUILATERAL", (6, 6, 6))?
//!     .member("RIGHT", (3, 4, 5))?
//!     .build()?;
//! assert_eq!(triangle.field_values("first")?, [&Value::Int(6), &Value::Int(3)]);
//! assert!(triangle.has_field("third", &Value::Int(5))?);
//! # Ok::<(), named_enum::EnumError>(())
//! ```

use std::sync::Arc;

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::{
    class::NamedEnum,
    exception::{EnumError, EnumResult, ErrorKind},
    functions::FieldFunction,
    generate::GenerateNextValue,
    member::{ClassId, Member},
    namespace::{EnumNamespace, FIELD_NAMES_KEY, IGNORE_KEY, ORDER_KEY, parse_name_list},
    record::{RECORD_TYPE_NAME, RecordType, TupleClass, parse_field_names},
    tracer::{BuildTracer, NoopTracer},
    value::Value,
};

/// Field names every member already uses for itself.
const RESERVED_FIELDS: [&str; 2] = ["name", "value"];

/// What a subclass needs to know about its parent.
#[derive(Debug, Clone)]
struct ParentInfo {
    name: Arc<str>,
    field_spec: Option<Value>,
    has_members: bool,
}

/// Collects a class declaration and builds it into a [`NamedEnum`].
///
/// Every declaration method consumes the builder and returns it again, failing early on
/// reserved or duplicate keys so that `?` chains stop at the offending line.
#[derive(Debug)]
pub struct EnumBuilder<Tr: BuildTracer = NoopTracer> {
    namespace: EnumNamespace,
    parent: Option<ParentInfo>,
    module: Option<String>,
    source: Option<String>,
    tracer: Tr,
}

impl EnumBuilder {
    /// Starts a root class declaration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: EnumNamespace::new(name),
            parent: None,
            module: None,
            source: None,
            tracer: NoopTracer,
        }
    }
}

impl<Tr: BuildTracer> EnumBuilder<Tr> {
    /// Declares the class as a subclass of `parent`; the namespace adopts the parent's
    /// `auto` hook. Only called on a fresh builder, see [`NamedEnum::subclass`].
    pub(crate) fn extends(mut self, parent: &NamedEnum) -> Self {
        self.namespace = EnumNamespace::with_generator(self.namespace.class_name(), parent.generator());
        self.parent = Some(ParentInfo {
            name: Arc::clone(&parent.name),
            field_spec: parent.field_spec.clone(),
            has_members: !parent.is_empty(),
        });
        self
    }

    /// Replaces the tracer and reports the namespace to it.
    pub fn with_tracer<T: BuildTracer>(self, mut tracer: T) -> EnumBuilder<T> {
        tracer.on_namespace_created(self.namespace.class_name());
        EnumBuilder {
            namespace: self.namespace,
            parent: self.parent,
            module: self.module,
            source: self.source,
            tracer,
        }
    }

    /// Sets the declared module.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub(crate) fn source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }

    /// Assigns `_field_names_`: a `"a, b"` / `"a b"` string or a sequence of strings.
    pub fn field_names(self, spec: impl Into<Value>) -> EnumResult<Self> {
        self.set(FIELD_NAMES_KEY, spec)
    }

    /// Assigns a member.
    pub fn member(self, name: impl Into<String>, value: impl Into<Value>) -> EnumResult<Self> {
        self.set(name, value)
    }

    /// Assigns a member whose value comes from the `auto` hook.
    pub fn auto(mut self, name: impl Into<String>) -> EnumResult<Self> {
        let name = name.into();
        let member = self.namespace.set_auto(name.clone())?;
        self.tracer.on_entry_set(self.namespace.class_name(), &name, member);
        Ok(self)
    }

    /// Assigns `_order_`, the expected member order.
    pub fn order(self, names: impl Into<Value>) -> EnumResult<Self> {
        self.set(ORDER_KEY, names)
    }

    /// Assigns `_ignore_`, names that never become members.
    pub fn ignore(self, names: impl Into<Value>) -> EnumResult<Self> {
        self.set(IGNORE_KEY, names)
    }

    /// Replaces the `auto` hook; only allowed before any member is assigned.
    pub fn generator(mut self, hook: GenerateNextValue) -> EnumResult<Self> {
        self.namespace.set_generator(hook)?;
        Ok(self)
    }

    /// Assigns any key, classified the same way a class body assignment is.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> EnumResult<Self> {
        let key = key.into();
        let member = self.namespace.set(key.clone(), value)?;
        self.tracer.on_entry_set(self.namespace.class_name(), &key, member);
        Ok(self)
    }

    /// Returns the namespace collected so far.
    #[must_use]
    pub fn namespace(&self) -> &EnumNamespace {
        &self.namespace
    }

    /// Returns the tracer.
    #[must_use]
    pub fn tracer(&self) -> &Tr {
        &self.tracer
    }

    /// Builds the class.
    ///
    /// # Errors
    /// - `Configuration`: the parent already has members, a field is named `name` or
    ///   `value`, a field name is invalid, or `_order_` disagrees with the members
    /// - `Conversion`: a raw member value does not fit the record type
    pub fn build(self) -> EnumResult<NamedEnum> {
        let Self {
            mut namespace,
            parent,
            module,
            source,
            mut tracer,
        } = self;
        let class_name = namespace.class_name().to_owned();

        if let Some(parent) = &parent
            && parent.has_members
        {
            return Err(EnumError::new_msg(
                ErrorKind::Configuration,
                format_args!("<enum '{class_name}'> cannot extend <named enum '{}'>", parent.name),
            ));
        }

        let (field_spec, inherited) = match namespace.field_names() {
            Some(spec) => (Some(spec.clone()), false),
            None => (parent.as_ref().and_then(|p| p.field_spec.clone()), true),
        };
        let field_names = match &field_spec {
            Some(spec) if !matches!(spec, Value::None) => parse_field_names(spec)?,
            _ => Vec::new(),
        };

        let record_type = if field_names.is_empty() {
            None
        } else {
            tracer.on_fields_resolved(&class_name, &field_names, inherited);
            if let Some(reserved) = field_names.iter().find(|f| RESERVED_FIELDS.contains(&f.as_str())) {
                return Err(EnumError::reserved_field(reserved));
            }
            let record_type = RecordType::new(RECORD_TYPE_NAME, field_names)?;
            tracer.on_record_type_created(&class_name, &record_type);
            namespace.materialize(&TupleClass::Named(Arc::clone(&record_type)))?;
            tracer.on_materialized(&class_name, namespace.member_names().len());
            Some(record_type)
        };

        let id = ClassId::next();
        let name: Arc<str> = Arc::from(class_name.as_str());
        let mut members: Vec<Member> = Vec::new();
        let mut member_map = IndexMap::with_capacity(namespace.member_names().len());
        let mut value_map: AHashMap<Value, usize> = AHashMap::with_capacity(namespace.member_names().len());
        for (member_name, value) in namespace.members() {
            if let Some(&idx) = value_map.get(value) {
                tracer.on_member_created(&class_name, member_name, Some(members[idx].name()));
                member_map.insert(member_name.to_owned(), idx);
                continue;
            }
            let idx = members.len();
            members.push(Member::new(
                id,
                Arc::clone(&name),
                member_name.to_owned(),
                value.clone(),
                record_type.clone(),
            ));
            value_map.insert(value.clone(), idx);
            member_map.insert(member_name.to_owned(), idx);
            tracer.on_member_created(&class_name, member_name, None);
        }

        if let Some(order) = namespace.get(ORDER_KEY) {
            let expected = parse_name_list(order, ORDER_KEY)?;
            let actual: Vec<&str> = members.iter().map(Member::name).collect();
            if expected != actual {
                return Err(EnumError::new_msg(
                    ErrorKind::Configuration,
                    format_args!(
                        "member order does not match _order_:\n  {}\n  {}",
                        name_list_repr(expected.iter().map(String::as_str)),
                        name_list_repr(actual.iter().copied())
                    ),
                ));
            }
        }

        let mut functions = IndexMap::new();
        if let Some(record_type) = &record_type {
            for (index, field) in record_type.field_names().iter().enumerate() {
                for function in FieldFunction::for_field(field, index) {
                    tracer.on_function_synthesized(&class_name, function.name());
                    functions.insert(function.name().to_owned(), function);
                }
            }
        }

        let aliases = member_map.len() - members.len();
        tracer.on_class_finalized(&class_name, members.len(), aliases);

        let attributes = namespace
            .attributes()
            .map(|(key, value)| (key.to_owned(), value.clone()))
            .collect();
        Ok(NamedEnum {
            id,
            name,
            module,
            base: parent.map(|p| p.name),
            field_spec,
            record_type,
            members,
            member_map,
            value_map,
            functions,
            attributes,
            generate_next_value: namespace.generator(),
            source,
        })
    }
}

fn name_list_repr<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<String> = names.map(|name| Value::from(name).py_repr()).collect();
    format!("[{}]", items.join(", "))
}
