//! Ready-made base classes.
//!
//! | Static | Fields |
//! |--------|--------|
//! | [`NAMED_ENUM`] | none |
//! | [`EXTENDED_ENUM`] | none |
//! | [`LABELED_ENUM`] | `key`, `label` |
//! | [`PAIR_ENUM`] | `first`, `second` |
//!
//! Each is built on first use and has no members, so any of them can be extended with
//! [`NamedEnum::subclass`].

use std::sync::LazyLock;

use crate::{builder::EnumBuilder, class::NamedEnum, exception::EnumResult};

/// Root class without fields.
pub static NAMED_ENUM: LazyLock<NamedEnum> =
    LazyLock::new(|| preset(NamedEnum::builder("NamedEnum").build()));

/// Subclass of [`NAMED_ENUM`] without fields.
pub static EXTENDED_ENUM: LazyLock<NamedEnum> =
    LazyLock::new(|| preset(NAMED_ENUM.subclass("ExtendedEnum").build()));

/// Subclass of [`NAMED_ENUM`] with fields `key` and `label`.
pub static LABELED_ENUM: LazyLock<NamedEnum> = LazyLock::new(|| {
    preset(
        NAMED_ENUM
            .subclass("LabeledEnum")
            .field_names(("key", "label"))
            .and_then(EnumBuilder::build),
    )
});

/// Subclass of [`NAMED_ENUM`] with fields `first` and `second`.
pub static PAIR_ENUM: LazyLock<NamedEnum> = LazyLock::new(|| {
    preset(
        NAMED_ENUM
            .subclass("PairEnum")
            .field_names(("first", "second"))
            .and_then(EnumBuilder::build),
    )
});

/// Returns the preset called `name`.
#[must_use]
pub fn preset_by_name(name: &str) -> Option<&'static NamedEnum> {
    match name {
        "NamedEnum" => Some(&*NAMED_ENUM),
        "ExtendedEnum" => Some(&*EXTENDED_ENUM),
        "LabeledEnum" => Some(&*LABELED_ENUM),
        "PairEnum" => Some(&*PAIR_ENUM),
        _ => None,
    }
}

fn preset(built: EnumResult<NamedEnum>) -> NamedEnum {
    built.expect("preset declarations are constant and valid")
}
