#![doc = include_str!("../../../README.md")]
#![expect(clippy::float_cmp, reason = "value equality follows exact float comparison")]

mod builder;
mod class;
mod definition;
mod describe;
mod exception;
mod factory;
mod functions;
mod generate;
mod io;
mod member;
mod namespace;
mod presets;
mod record;
mod tracer;
mod value;

pub use crate::{
    builder::EnumBuilder,
    class::{Container, ContainerKind, Gen, GenItem, Membership, NamedEnum},
    definition::{EnumDefinition, Registry},
    exception::{EnumError, EnumResult, ErrorKind},
    factory::{FactoryOptions, namedenum, namedenum_to},
    functions::{Collected, CollectedIter, FieldFunction, FieldFunctionKind, Outcome},
    generate::{GenerateNextValue, auto_increment, lowercase_name},
    io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint},
    member::{ClassId, Member},
    namespace::{EnumNamespace, FIELD_NAMES_KEY, IGNORE_KEY, ORDER_KEY},
    presets::{EXTENDED_ENUM, LABELED_ENUM, NAMED_ENUM, PAIR_ENUM, preset_by_name},
    record::{RECORD_TYPE_NAME, Record, RecordType, TupleClass, parse_field_names},
    tracer::{BuildTracer, LogTracer, NoopTracer, RecordingTracer, StderrTracer, TraceEvent},
    value::Value,
};
