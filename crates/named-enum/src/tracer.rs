//! Class-construction tracing.
//!
//! The [`BuildTracer`] trait defines hook points at each phase of building an enumeration
//! class, from the first namespace assignment to the final class. Every hook has a no-op
//! default, so implementations only override what they care about.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | No-op (default for every builder) |
//! | [`StderrTracer`] | Human-readable construction log to stderr |
//! | [`RecordingTracer`] | Full event recording for assertions in tests |
//! | [`LogTracer`] | Forwards events to `tracing` at debug/trace level |
//!
//! ```
//! use named_enum::{NamedEnum, RecordingTracer, TraceEvent};
//!
//! let mut tracer = RecordingTracer::new();
//! let class = NamedEnum::builder("Pair")
//!     .with_tracer(&mut tracer)
//!     .field_names("first second")?
//!     .member("A", ("a", 1))?
//!     .build()?;
//! assert_eq!(class.len(), 1);
//! assert!(matches!(tracer.events().last(), Some(TraceEvent::ClassFinalized { .. })));
//! # Ok::<(), named_enum::EnumError>(())
//! ```

use crate::record::RecordType;

/// Event emitted while an enumeration class is being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A builder started collecting the namespace of a class.
    NamespaceCreated {
        /// Name of the class being declared.
        class_name: String,
    },
    /// A key was assigned in the namespace.
    EntrySet {
        /// Name of the class being declared.
        class_name: String,
        /// The assigned key.
        key: String,
        /// Whether the key became a member.
        member: bool,
    },
    /// The field specification was resolved to a non-empty list of fields.
    FieldsResolved {
        /// Name of the class being declared.
        class_name: String,
        /// Resolved field names.
        fields: Vec<String>,
        /// Whether the specification came from the parent class.
        inherited: bool,
    },
    /// The record type for the class was generated.
    RecordTypeCreated {
        /// Name of the class being declared.
        class_name: String,
        /// Number of fields in the record type.
        arity: usize,
    },
    /// Raw member values were converted into records.
    Materialized {
        /// Name of the class being declared.
        class_name: String,
        /// Number of members converted.
        count: usize,
    },
    /// A member (or alias) was registered on the class.
    MemberCreated {
        /// Name of the class being declared.
        class_name: String,
        /// Member name.
        name: String,
        /// Canonical member name when this name is an alias.
        alias_of: Option<String>,
    },
    /// A per-field function was attached to the class.
    FunctionSynthesized {
        /// Name of the class being declared.
        class_name: String,
        /// Function name (`<field>s`, `from_<field>` or `has_<field>`).
        function: String,
    },
    /// The class is complete.
    ClassFinalized {
        /// Name of the finished class.
        class_name: String,
        /// Number of canonical members.
        members: usize,
        /// Number of aliases.
        aliases: usize,
    },
}

/// Trait for class-construction tracing.
///
/// Builders carry the tracer as a type parameter, so [`NoopTracer`] compiles every hook
/// away.
pub trait BuildTracer: std::fmt::Debug {
    /// Called when a builder starts collecting a namespace.
    #[inline]
    fn on_namespace_created(&mut self, _class_name: &str) {}

    /// Called after each successful namespace assignment.
    #[inline]
    fn on_entry_set(&mut self, _class_name: &str, _key: &str, _member: bool) {}

    /// Called once the class has a non-empty field specification.
    #[inline]
    fn on_fields_resolved(&mut self, _class_name: &str, _fields: &[String], _inherited: bool) {}

    /// Called after the record type is generated.
    #[inline]
    fn on_record_type_created(&mut self, _class_name: &str, _record_type: &RecordType) {}

    /// Called after raw member values are converted to records.
    #[inline]
    fn on_materialized(&mut self, _class_name: &str, _count: usize) {}

    /// Called for each member name registered on the class, aliases included.
    #[inline]
    fn on_member_created(&mut self, _class_name: &str, _name: &str, _alias_of: Option<&str>) {}

    /// Called for each synthesized per-field function.
    #[inline]
    fn on_function_synthesized(&mut self, _class_name: &str, _function: &str) {}

    /// Called when the class is complete.
    #[inline]
    fn on_class_finalized(&mut self, _class_name: &str, _members: usize, _aliases: usize) {}
}

impl<T: BuildTracer + ?Sized> BuildTracer for &mut T {
    fn on_namespace_created(&mut self, class_name: &str) {
        (**self).on_namespace_created(class_name);
    }

    fn on_entry_set(&mut self, class_name: &str, key: &str, member: bool) {
        (**self).on_entry_set(class_name, key, member);
    }

    fn on_fields_resolved(&mut self, class_name: &str, fields: &[String], inherited: bool) {
        (**self).on_fields_resolved(class_name, fields, inherited);
    }

    fn on_record_type_created(&mut self, class_name: &str, record_type: &RecordType) {
        (**self).on_record_type_created(class_name, record_type);
    }

    fn on_materialized(&mut self, class_name: &str, count: usize) {
        (**self).on_materialized(class_name, count);
    }

    fn on_member_created(&mut self, class_name: &str, name: &str, alias_of: Option<&str>) {
        (**self).on_member_created(class_name, name, alias_of);
    }

    fn on_function_synthesized(&mut self, class_name: &str, function: &str) {
        (**self).on_function_synthesized(class_name, function);
    }

    fn on_class_finalized(&mut self, class_name: &str, members: usize, aliases: usize) {
        (**self).on_class_finalized(class_name, members, aliases);
    }
}

// ============================================================================
// NoopTracer
// ============================================================================

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl BuildTracer for NoopTracer {}

// ============================================================================
// StderrTracer
// ============================================================================

/// Tracer that prints a human-readable construction log to stderr.
///
/// Output format:
/// ```text
/// [Pair] namespace
/// [Pair]   set _field_names_
/// [Pair]   set A (member)
/// [Pair] fields first, second
/// [Pair] record NamedTuple/2
/// [Pair] materialized 1
/// [Pair]   + A
/// [Pair]   fn firsts
/// [Pair] done members=1 aliases=0
/// ```
#[derive(Debug, Default)]
pub struct StderrTracer;

impl StderrTracer {
    /// Creates a new stderr tracer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BuildTracer for StderrTracer {
    fn on_namespace_created(&mut self, class_name: &str) {
        eprintln!("[{class_name}] namespace");
    }

    fn on_entry_set(&mut self, class_name: &str, key: &str, member: bool) {
        if member {
            eprintln!("[{class_name}]   set {key} (member)");
        } else {
            eprintln!("[{class_name}]   set {key}");
        }
    }

    fn on_fields_resolved(&mut self, class_name: &str, fields: &[String], inherited: bool) {
        let origin = if inherited { " (inherited)" } else { "" };
        eprintln!("[{class_name}] fields {}{origin}", fields.join(", "));
    }

    fn on_record_type_created(&mut self, class_name: &str, record_type: &RecordType) {
        eprintln!("[{class_name}] record {}/{}", record_type.name(), record_type.arity());
    }

    fn on_materialized(&mut self, class_name: &str, count: usize) {
        eprintln!("[{class_name}] materialized {count}");
    }

    fn on_member_created(&mut self, class_name: &str, name: &str, alias_of: Option<&str>) {
        match alias_of {
            Some(canonical) => eprintln!("[{class_name}]   + {name} -> {canonical}"),
            None => eprintln!("[{class_name}]   + {name}"),
        }
    }

    fn on_function_synthesized(&mut self, class_name: &str, function: &str) {
        eprintln!("[{class_name}]   fn {function}");
    }

    fn on_class_finalized(&mut self, class_name: &str, members: usize, aliases: usize) {
        eprintln!("[{class_name}] done members={members} aliases={aliases}");
    }
}

// ============================================================================
// RecordingTracer
// ============================================================================

/// Tracer that records every event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    /// All recorded events in chronological order.
    events: Vec<TraceEvent>,
    /// Optional limit on number of events recorded.
    limit: Option<usize>,
}

impl RecordingTracer {
    /// Creates a new recording tracer with no event limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new recording tracer that stops recording after `limit` events.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: Vec::with_capacity(limit.min(1024)),
            limit: Some(limit),
        }
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Consumes the tracer and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    fn record(&mut self, event: TraceEvent) {
        if self.limit.is_some_and(|l| self.events.len() >= l) {
            return;
        }
        self.events.push(event);
    }
}

impl BuildTracer for RecordingTracer {
    fn on_namespace_created(&mut self, class_name: &str) {
        self.record(TraceEvent::NamespaceCreated {
            class_name: class_name.to_owned(),
        });
    }

    fn on_entry_set(&mut self, class_name: &str, key: &str, member: bool) {
        self.record(TraceEvent::EntrySet {
            class_name: class_name.to_owned(),
            key: key.to_owned(),
            member,
        });
    }

    fn on_fields_resolved(&mut self, class_name: &str, fields: &[String], inherited: bool) {
        self.record(TraceEvent::FieldsResolved {
            class_name: class_name.to_owned(),
            fields: fields.to_vec(),
            inherited,
        });
    }

    fn on_record_type_created(&mut self, class_name: &str, record_type: &RecordType) {
        self.record(TraceEvent::RecordTypeCreated {
            class_name: class_name.to_owned(),
            arity: record_type.arity(),
        });
    }

    fn on_materialized(&mut self, class_name: &str, count: usize) {
        self.record(TraceEvent::Materialized {
            class_name: class_name.to_owned(),
            count,
        });
    }

    fn on_member_created(&mut self, class_name: &str, name: &str, alias_of: Option<&str>) {
        self.record(TraceEvent::MemberCreated {
            class_name: class_name.to_owned(),
            name: name.to_owned(),
            alias_of: alias_of.map(str::to_owned),
        });
    }

    fn on_function_synthesized(&mut self, class_name: &str, function: &str) {
        self.record(TraceEvent::FunctionSynthesized {
            class_name: class_name.to_owned(),
            function: function.to_owned(),
        });
    }

    fn on_class_finalized(&mut self, class_name: &str, members: usize, aliases: usize) {
        self.record(TraceEvent::ClassFinalized {
            class_name: class_name.to_owned(),
            members,
            aliases,
        });
    }
}

// ============================================================================
// LogTracer
// ============================================================================

/// Tracer that forwards construction events to the `tracing` facade.
///
/// Phase events are logged at `debug`, per-entry events at `trace`. Nothing is emitted
/// unless a subscriber is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

impl BuildTracer for LogTracer {
    fn on_namespace_created(&mut self, class_name: &str) {
        tracing::debug!(class = class_name, "collecting namespace");
    }

    fn on_entry_set(&mut self, class_name: &str, key: &str, member: bool) {
        tracing::trace!(class = class_name, key, member, "namespace entry");
    }

    fn on_fields_resolved(&mut self, class_name: &str, fields: &[String], inherited: bool) {
        tracing::debug!(class = class_name, fields = ?fields, inherited, "fields resolved");
    }

    fn on_record_type_created(&mut self, class_name: &str, record_type: &RecordType) {
        tracing::debug!(
            class = class_name,
            record = record_type.name(),
            arity = record_type.arity(),
            "record type created"
        );
    }

    fn on_materialized(&mut self, class_name: &str, count: usize) {
        tracing::debug!(class = class_name, count, "members materialized");
    }

    fn on_member_created(&mut self, class_name: &str, name: &str, alias_of: Option<&str>) {
        tracing::trace!(class = class_name, name, alias_of = ?alias_of, "member created");
    }

    fn on_function_synthesized(&mut self, class_name: &str, function: &str) {
        tracing::trace!(class = class_name, function, "field function synthesized");
    }

    fn on_class_finalized(&mut self, class_name: &str, members: usize, aliases: usize) {
        tracing::debug!(class = class_name, members, aliases, "class finalized");
    }
}
