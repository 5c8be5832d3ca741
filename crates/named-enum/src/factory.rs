//! `namedenum`: define a class from a name and a field specification at run time.

use std::borrow::Cow;

use crate::{
    class::NamedEnum,
    exception::EnumResult,
    io::{PrintWriter, StdPrint},
    presets::NAMED_ENUM,
    value::Value,
};

/// Options for [`namedenum`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactoryOptions {
    /// Print the generated source before returning.
    pub verbose: bool,
    /// Module the class belongs to; the class name is used when unset.
    pub module: Option<String>,
}

/// Creates an empty subclass of [`NAMED_ENUM`] with the given field specification.
///
/// `field_names` takes the same forms as `_field_names_`; `Value::None` creates a class
/// without fields. The generated source is kept on the class ([`NamedEnum::source`]) and
/// printed to stdout when `options.verbose` is set. Members are added by subclassing the
/// result.
///
/// ```
/// use named_enum::{FactoryOptions, namedenum};
///
/// let triple = namedenum("TripleEnum", ("first", "second", "third"), FactoryOptions::default())?;
/// assert_eq!(triple.to_string(), "<named enum 'TripleEnum'>");
/// assert_eq!(triple.fields(), ["first", "second", "third"]);
/// # Ok::<(), named_enum::EnumError>(())
/// ```
pub fn namedenum(typename: &str, field_names: impl Into<Value>, options: FactoryOptions) -> EnumResult<NamedEnum> {
    namedenum_to(typename, field_names, options, &mut StdPrint)
}

/// [`namedenum`] printing the verbose source to `print` instead of stdout.
pub fn namedenum_to(
    typename: &str,
    field_names: impl Into<Value>,
    options: FactoryOptions,
    print: &mut impl PrintWriter,
) -> EnumResult<NamedEnum> {
    let field_names = field_names.into();
    let source = class_source(typename, &field_names);
    let module = options.module.unwrap_or_else(|| typename.to_owned());
    let class = NAMED_ENUM
        .subclass(typename)
        .field_names(field_names)?
        .module(module)
        .source(source)
        .build()?;
    if options.verbose
        && let Some(source) = class.source()
    {
        print.stdout_write(Cow::Borrowed(source))?;
        print.stdout_push('\n')?;
    }
    Ok(class)
}

/// Defines a class with [`namedenum`], recording the calling module.
///
/// ```
/// let pair = named_enum::namedenum!("Coordinates", "x, y")?;
/// assert_eq!(pair.module(), Some(module_path!()));
/// # Ok::<(), named_enum::EnumError>(())
/// ```
#[macro_export]
macro_rules! namedenum {
    ($typename:expr, $field_names:expr $(,)?) => {
        $crate::namedenum(
            $typename,
            $field_names,
            $crate::FactoryOptions {
                verbose: false,
                module: Some(::std::module_path!().to_owned()),
            },
        )
    };
    ($typename:expr, $field_names:expr, verbose $(,)?) => {
        $crate::namedenum(
            $typename,
            $field_names,
            $crate::FactoryOptions {
                verbose: true,
                module: Some(::std::module_path!().to_owned()),
            },
        )
    };
}

/// Builder snippet equivalent to the class `namedenum` creates.
fn class_source(typename: &str, field_names: &Value) -> String {
    format!(
        "let {typename} = NAMED_ENUM\n    .subclass({typename:?})\n    .field_names({})?\n    .build()?;\n",
        rust_literal(field_names)
    )
}

/// Renders a field specification as the Rust literal that produces it.
fn rust_literal(value: &Value) -> String {
    match value {
        Value::None => "Value::None".to_owned(),
        Value::String(s) => format!("{s:?}"),
        Value::Tuple(items) => {
            let items: Vec<String> = items.iter().map(rust_literal).collect();
            if items.len() == 1 {
                format!("({},)", items[0])
            } else {
                format!("({})", items.join(", "))
            }
        }
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(rust_literal).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.py_repr(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_substitutes_name_and_fields() {
        let source = class_source("Pair", &Value::from(("first", "second")));
        assert_eq!(
            source,
            "let Pair = NAMED_ENUM\n    .subclass(\"Pair\")\n    .field_names((\"first\", \"second\"))?\n    .build()?;\n"
        );
        assert_eq!(rust_literal(&Value::from("a b")), "\"a b\"");
        assert_eq!(rust_literal(&Value::from(["a"])), "[\"a\"]");
    }
}
