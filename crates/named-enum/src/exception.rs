use std::fmt;

use strum::{Display, IntoStaticStr};

/// Result type alias for every fallible named-enum operation.
pub type EnumResult<T> = Result<T, EnumError>;

/// Kinds of failure raised while declaring or querying a named enum.
///
/// Uses strum derives for `Display` and `Into<&'static str>`; the string form is the
/// variant name followed by `Error` (e.g. `Conversion` -> "ConversionError").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum ErrorKind {
    /// The field specification is unusable: a reserved name (`name`/`value`), an invalid
    /// identifier, a duplicate field, a mismatched `_order_`, or an extension of a class
    /// that already has members.
    #[strum(serialize = "ConfigurationError")]
    Configuration,
    /// A raw literal could not be turned into a record of the declared arity, or the
    /// materialization target was not a generated record type.
    #[strum(serialize = "ConversionError")]
    Conversion,
    /// A `_sunder_` name that is not recognised was assigned in the namespace.
    #[strum(serialize = "ReservedNameError")]
    ReservedName,
    /// A member name was assigned twice.
    #[strum(serialize = "DuplicateKeyError")]
    DuplicateKey,
    /// A synthesized per-field function was requested for a field that does not exist.
    ///
    /// The message is exactly the requested function name.
    #[strum(serialize = "UnknownFieldError")]
    UnknownField,
    /// A member attribute that is neither a field nor `name`/`value` was read.
    #[strum(serialize = "UnknownAttributeError")]
    UnknownAttribute,
    /// Key or value lookup on a class found nothing.
    #[strum(serialize = "LookupError")]
    Lookup,
    /// A synthesized function was called with the wrong arguments.
    #[strum(serialize = "ArgumentError")]
    Argument,
    /// A JSON definition document could not be read.
    #[strum(serialize = "DefinitionError")]
    Definition,
    /// Writing to an output sink failed.
    #[strum(serialize = "OutputError")]
    Output,
}

/// Error raised by the named-enum machinery.
///
/// All errors are fatal to the operation that raised them; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumError {
    kind: ErrorKind,
    message: String,
}

impl EnumError {
    /// Creates a new error with the given kind and message.
    #[must_use]
    pub fn new_msg(kind: ErrorKind, message: impl fmt::Display) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Reserved field name in a field specification.
    pub(crate) fn reserved_field(field: &str) -> Self {
        Self::new_msg(
            ErrorKind::Configuration,
            format_args!("'name' or 'value' cannot be attributes, got '{field}'"),
        )
    }

    /// A `_sunder_` key assigned in a namespace.
    pub(crate) fn reserved_name(key: &str) -> Self {
        Self::new_msg(
            ErrorKind::ReservedName,
            format_args!("_sunder_ names, such as '{key}', are reserved for future Enum use"),
        )
    }

    /// A raw member value that cannot be unpacked into the record's fields.
    pub(crate) fn unpack(value: &impl fmt::Display, type_name: &str) -> Self {
        Self::new_msg(
            ErrorKind::Conversion,
            format_args!("Unable to unpack the value '{value}' as {type_name} for the fields."),
        )
    }

    /// A per-field function requested for a field the class does not declare.
    pub(crate) fn unknown_field(function_name: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnknownField,
            message: function_name.into(),
        }
    }

    /// A member attribute that does not resolve.
    pub(crate) fn unknown_attribute(class_name: &str, attr: &str) -> Self {
        Self::new_msg(
            ErrorKind::UnknownAttribute,
            format_args!("'{class_name}' object has no attribute '{attr}'"),
        )
    }
}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EnumError {}

impl From<std::io::Error> for EnumError {
    fn from(err: std::io::Error) -> Self {
        Self::new_msg(ErrorKind::Output, err)
    }
}

impl From<serde_json::Error> for EnumError {
    fn from(err: serde_json::Error) -> Self {
        Self::new_msg(ErrorKind::Definition, err)
    }
}
