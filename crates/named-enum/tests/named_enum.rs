//! Tests for building named enums and querying them.
//!
//! Covers field resolution, per-field functions, membership, lookups, aliases and the
//! container exports on classes declared through `NamedEnum::builder`/`subclass`.

use named_enum::{
    ContainerKind, EnumError, ErrorKind, GenItem, LABELED_ENUM, Member, NAMED_ENUM, NamedEnum, PAIR_ENUM, Value,
};
use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;

fn triple_enum() -> NamedEnum {
    NamedEnum::builder("TripleEnum")
        .field_names(("first", "second", "third"))
        .and_then(named_enum::EnumBuilder::build)
        .unwrap()
}

fn triangle() -> NamedEnum {
    triple_enum()
        .subclass("Triangle")
        .member("EQUILATERAL", (6, 6, 6))
        .and_then(|b| b.member("RIGHT", (3, 4, 5)))
        .and_then(named_enum::EnumBuilder::build)
        .unwrap()
}

fn legends() -> NamedEnum {
    LABELED_ENUM
        .subclass("NBALegendary")
        .member("JOHNSON", ("Johnson", "Magic Johnson"))
        .and_then(|b| b.member("JORDAN", ("Jordan", "Air Jordan")))
        .and_then(named_enum::EnumBuilder::build)
        .unwrap()
}

fn names(members: &[&Member]) -> Vec<String> {
    members.iter().map(|m| m.name().to_owned()).collect()
}

// =============================================================================
// 1. Per-field functions
// =============================================================================

/// `firsts()` reads the first field of every member in declaration order.
#[test]
fn field_values_follow_declaration_order() {
    let triangle = triangle();
    assert_eq!(triangle.field_values("first").unwrap(), [&Value::Int(6), &Value::Int(3)]);
    assert_eq!(triangle.field_values("second").unwrap(), [&Value::Int(6), &Value::Int(4)]);
    let lazy: Vec<&Value> = triangle.field_values_iter("third").unwrap().collect();
    assert_eq!(lazy, [&Value::Int(6), &Value::Int(5)]);
}

/// `from_second(4)` finds only `RIGHT`; an unmatched value yields an empty result.
#[test]
fn from_field_matches_by_value() {
    let triangle = triangle();
    let found = triangle.from_field("second", &Value::Int(4)).unwrap();
    assert_eq!(names(&found), ["RIGHT"]);
    let found = triangle.from_field("first", &Value::Int(6)).unwrap();
    assert_eq!(names(&found), ["EQUILATERAL"]);
    assert!(triangle.from_field("first", &Value::Int(63)).unwrap().is_empty());
    let wanted = Value::Int(5);
    let lazy: Vec<&Member> = triangle.from_field_iter("third", &wanted).unwrap().collect();
    assert_eq!(names(&lazy), ["RIGHT"]);
}

/// `from_<F>` results borrow only the class, never the searched value.
#[test]
fn from_field_result_outlives_value() {
    let legends = legends();
    let found = {
        let wanted = Value::from(String::from("Johnson"));
        legends.from_field("key", &wanted).unwrap()
    };
    assert_eq!(names(&found), ["JOHNSON"]);
}

/// `has_third(5)` is true and `has_third(99)` is false.
#[test]
fn has_field_checks_existence() {
    let triangle = triangle();
    assert!(triangle.has_field("third", &Value::Int(5)).unwrap());
    assert!(!triangle.has_field("third", &Value::Int(99)).unwrap());
    assert!(triangle.has_field("first", &Value::Float(6.0)).unwrap(), "numeric equality crosses int/float");
}

/// String lookups on a two-field class, including a miss.
#[test]
fn labeled_lookups() {
    let legends = legends();
    let found = legends.from_field("key", &Value::from("Jordan")).unwrap();
    assert_eq!(names(&found), ["JORDAN"]);
    assert!(legends.from_field("key", &Value::from("nonexistent")).unwrap().is_empty());
    assert!(legends.has_field("label", &Value::from("Air Jordan")).unwrap());
}

/// Functions for undeclared fields fail with the requested function name.
#[test]
fn unknown_field_functions_fail() {
    let triangle = triangle();
    let err = triangle.field_values("forth").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);
    assert_eq!(err.message(), "forths");
    let err = triangle.from_field("forth", &Value::Int(6)).unwrap_err();
    assert_eq!(err.message(), "from_forth");
    let err = triangle.has_field("forth", &Value::Int(6)).unwrap_err();
    assert_eq!(err.message(), "has_forth");
    let err = triangle.function("from_color").unwrap_err();
    assert_eq!(err.to_string(), "UnknownFieldError: from_color");
}

/// Every field gets three named functions carrying docstrings.
#[test]
fn function_registry_lists_functions_in_field_order() {
    let triangle = triangle();
    let names: Vec<&str> = triangle.functions().map(|f| f.name()).collect();
    assert_eq!(
        names,
        [
            "firsts",
            "from_first",
            "has_first",
            "seconds",
            "from_second",
            "has_second",
            "thirds",
            "from_third",
            "has_third"
        ]
    );
    let function = triangle.function("from_second").unwrap();
    assert_eq!(function.field(), "second");
    assert_eq!(
        function.doc(),
        "Returns the corresponding enumeration(s) according to the given value of the attribute second."
    );
    assert_eq!(
        triangle.function("firsts").unwrap().doc(),
        "Collective function to return the values of the attribute first from all the enumerations in the Enum class."
    );
}

/// Calling by name honours `as_tuple` and validates the argument list.
#[test]
fn call_by_name() {
    let triangle = triangle();
    let eager = triangle.call("firsts", None, true).unwrap();
    let named_enum::Outcome::Values(values) = eager else {
        panic!("expected values");
    };
    assert!(!values.is_lazy());
    assert_eq!(values.as_slice().unwrap(), [&Value::Int(6), &Value::Int(3)]);

    let lazy = triangle.call("from_first", Some(&Value::Int(3)), false).unwrap();
    let named_enum::Outcome::Members(members) = lazy else {
        panic!("expected members");
    };
    assert!(members.is_lazy());
    assert_eq!(names(&members.into_vec()), ["RIGHT"]);

    let flag = triangle.call("has_first", Some(&Value::Int(63)), true).unwrap();
    assert_eq!(flag.as_flag(), Some(false));

    let err = triangle.call("from_first", None, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
    assert_eq!(
        err.message(),
        "from_first() missing 1 required positional argument: 'field_value'"
    );
    let err = triangle.call("firsts", Some(&Value::Int(1)), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
}

// =============================================================================
// 2. Materialization
// =============================================================================

/// Reading each field off a member returns the literal originally assigned.
#[test]
fn fields_round_trip_to_literals() {
    let triangle = triangle();
    let right = triangle.get("RIGHT").unwrap();
    assert_eq!(right.field("first"), Some(&Value::Int(3)));
    assert_eq!(right.field("second"), Some(&Value::Int(4)));
    assert_eq!(right.field("third"), Some(&Value::Int(5)));
    assert_eq!(right.value(), &Value::from((3, 4, 5)));
    assert_eq!(right.value().py_repr(), "NamedTuple(first=3, second=4, third=5)");
}

/// A two-field class rejects scalars and wrong-length sequences, and accepts pairs.
#[test]
fn arity_is_enforced() {
    let err = PAIR_ENUM.subclass("Bad").member("A", 1).unwrap().build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(err.message(), "Unable to unpack the value '1' as NamedTuple for the fields.");

    let err = PAIR_ENUM
        .subclass("Bad")
        .member("A", (1, 2, 3))
        .unwrap()
        .build()
        .unwrap_err();
    assert_eq!(err.message(), "Unable to unpack the value '(1, 2, 3)' as NamedTuple for the fields.");

    let err = PAIR_ENUM.subclass("Bad").member("A", "1,2").unwrap().build().unwrap_err();
    assert_eq!(err.message(), "Unable to unpack the value '1,2' as NamedTuple for the fields.");

    let ok = PAIR_ENUM.subclass("Good").member("A", vec![1, 2]).unwrap().build().unwrap();
    assert_eq!(ok.get("A").unwrap().field("second"), Some(&Value::Int(2)));
}

/// With one field a string is wrapped whole, and so is any other value.
#[test]
fn single_field_wraps_verbatim() {
    let class = NamedEnum::builder("Word")
        .field_names("text")
        .unwrap()
        .member("HELLO", "hello")
        .unwrap()
        .member("PAIR", ("a", "b"))
        .unwrap()
        .member("NUMBER", 7)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(class.get("HELLO").unwrap().field("text"), Some(&Value::from("hello")));
    assert_eq!(class.get("PAIR").unwrap().field("text"), Some(&Value::from(("a", "b"))));
    assert_eq!(class.get("NUMBER").unwrap().field("text"), Some(&Value::Int(7)));
}

/// `auto` values are wrapped by a single-field class and rejected by a multi-field one.
#[test]
fn auto_with_fields() {
    let class = NamedEnum::builder("Numbered")
        .field_names("number")
        .unwrap()
        .auto("ONE")
        .unwrap()
        .auto("TWO")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(class.field_values("number").unwrap(), [&Value::Int(1), &Value::Int(2)]);

    let err = PAIR_ENUM.subclass("Bad").auto("A").unwrap().build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
}

// =============================================================================
// 3. Field specification
// =============================================================================

/// `name` or `value` as a field aborts the class before any member exists.
#[test]
fn reserved_fields_are_rejected() {
    for spec in ["name, value, key", "key name", "value"] {
        let err = NamedEnum::builder("TripleFakeEnum")
            .field_names(spec)
            .unwrap()
            .member("A", (1, 2, 3))
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration, "spec {spec:?}");
        assert!(
            err.message().starts_with("'name' or 'value' cannot be attributes"),
            "spec {spec:?}: {err}"
        );
    }
}

/// A subclass reuses its parent's fields unless it declares its own.
#[test]
fn fields_are_inherited() {
    let triangle = triangle();
    assert_eq!(triangle.fields(), ["first", "second", "third"]);
    assert_eq!(triangle.base_name(), Some("TripleEnum"));

    let overridden = triple_enum()
        .subclass("Overridden")
        .field_names("x y")
        .unwrap()
        .member("P", (1, 2))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(overridden.fields(), ["x", "y"]);
}

/// Without a field specification there are no fields and no field functions.
#[test]
fn no_fields_boundary() {
    let color = NamedEnum::builder("Color")
        .member("RED", 1)
        .unwrap()
        .member("GREEN", 2)
        .unwrap()
        .build()
        .unwrap();
    assert!(color.fields().is_empty());
    assert!(!color.has_fields());
    assert_eq!(color.functions().count(), 0);
    assert_eq!(color.function("values").unwrap_err().kind(), ErrorKind::UnknownField);
    assert_eq!(color.get("RED").unwrap().value(), &Value::Int(1));
}

/// A class with members cannot be extended.
#[test]
fn cannot_extend_class_with_members() {
    let err = triangle().subclass("Child").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.message(), "<enum 'Child'> cannot extend <named enum 'Triangle'>");
}

// =============================================================================
// 4. Membership and representation
// =============================================================================

/// Names and members of this class are contained; classes and strangers are not.
#[test]
fn membership() {
    let triangle = triangle();
    let right = triangle.get("RIGHT").unwrap();
    assert!(triangle.contains("RIGHT"));
    assert!(triangle.contains("EQUILATERAL"));
    assert!(!triangle.contains("TOM_AND_JERRY"));
    assert!(triangle.contains(right));
    assert!(triangle.contains(&Value::from("RIGHT")));
    assert!(!triangle.contains(&Value::Int(1)));
    assert!(!triangle.contains(&triangle));
    assert!(!triangle.contains(&*NAMED_ENUM));

    let other = legends();
    assert!(!other.contains(right));

    let twin = triangle_twin();
    assert!(!triangle.contains(twin.get("RIGHT").unwrap()), "same name, different class");
}

fn triangle_twin() -> NamedEnum {
    triangle()
}

/// Classes render as `<named enum 'X'>`, members as `X.NAME: repr`.
#[test]
fn representations() {
    let triangle = triangle();
    assert_eq!(triangle.to_string(), "<named enum 'Triangle'>");
    assert_eq!(format!("{triangle:?}"), "<named enum 'Triangle'>");
    let right = triangle.get("RIGHT").unwrap();
    assert_eq!(right.to_string(), "Triangle.RIGHT: NamedTuple(first=3, second=4, third=5)");
    assert_eq!(format!("{right:?}"), "<Triangle.RIGHT: NamedTuple(first=3, second=4, third=5)>");
}

/// Member attributes resolve fields, then `name` and `value`.
#[test]
fn member_getattr() {
    let triangle = triangle();
    let right = triangle.get("RIGHT").unwrap();
    assert_eq!(*right.getattr("first").unwrap(), Value::Int(3));
    assert_eq!(*right.getattr("name").unwrap(), Value::from("RIGHT"));
    assert_eq!(*right.getattr("value").unwrap(), Value::from((3, 4, 5)));
    let err = right.getattr("key").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
    assert_eq!(err.message(), "'Triangle' object has no attribute 'key'");
}

// =============================================================================
// 5. Listing and containers
// =============================================================================

/// `names`, `values` and `gen` enumerate in declaration order, eagerly or lazily.
#[test]
fn listing_in_declaration_order() {
    let triangle = triangle();
    assert_eq!(triangle.names(true).into_vec(), ["EQUILATERAL", "RIGHT"]);
    let lazy = triangle.names(false);
    assert!(lazy.is_lazy());
    assert_eq!(lazy.into_iter().collect::<Vec<_>>(), ["EQUILATERAL", "RIGHT"]);
    assert_eq!(
        triangle.values(true).into_vec(),
        [&Value::from((6, 6, 6)), &Value::from((3, 4, 5))]
    );

    let pairs: Vec<GenItem<'_>> = triangle.r#gen(true).collect();
    assert!(matches!(pairs[0], GenItem::Pair("EQUILATERAL", _)));
    let members: Vec<String> = triangle
        .r#gen(false)
        .map(|item| match item {
            GenItem::Member(member) => member.name().to_owned(),
            GenItem::Pair(..) => panic!("expected members"),
        })
        .collect();
    assert_eq!(members, ["EQUILATERAL", "RIGHT"]);
}

/// Repeated reads return equal results.
#[test]
fn reads_are_idempotent() {
    let triangle = triangle();
    assert_eq!(triangle.names(true).into_vec(), triangle.names(true).into_vec());
    assert_eq!(triangle.as_dict(), triangle.as_dict());
    assert_eq!(triangle.fields(), triangle.fields());
}

/// Every container shape holds the same `(name, value)` pairs.
#[test]
fn container_exports() {
    let legends = legends();
    let dict = legends.as_dict();
    assert_eq!(dict.len(), 2);
    assert_eq!(dict["JORDAN"], &Value::from(("Jordan", "Air Jordan")));

    let ordered: Vec<&str> = legends.as_ordereddict().keys().copied().collect();
    assert_eq!(ordered, ["JOHNSON", "JORDAN"]);
    assert_eq!(legends.as_list()[1].0, "JORDAN");
    assert!(
        legends
            .as_set()
            .contains(&("JOHNSON", &Value::from(("Johnson", "Magic Johnson"))))
    );
    assert_eq!(legends.as_tuple().len(), 2);
    for kind in ContainerKind::iter() {
        assert_eq!(legends.as_data_type(kind).len(), 2, "{kind}");
    }
    let kinds: Vec<&'static str> = ContainerKind::iter().map(Into::into).collect();
    assert_eq!(kinds, ["dict", "ordereddict", "list", "set", "tuple"]);
}

// =============================================================================
// 6. Lookups, aliases and order
// =============================================================================

/// Lookup by name and by value, with their error messages.
#[test]
fn lookups() {
    let triangle = triangle();
    assert_eq!(triangle.get("RIGHT").unwrap().name(), "RIGHT");
    let err = triangle.get("WRONG").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert_eq!(err.message(), "'WRONG'");
    assert_eq!(triangle.from_value(&Value::from((3, 4, 5))).unwrap().name(), "RIGHT");
    let err = triangle.from_value(&Value::from((1, 1, 1))).unwrap_err();
    assert_eq!(err.message(), "(1, 1, 1) is not a valid Triangle");
    assert!(triangle.member("WRONG").is_none());
}

/// Equal values make aliases, visible by name but not in iteration.
#[test]
fn aliases() {
    let shapes = triple_enum()
        .subclass("Shapes")
        .member("RIGHT", (3, 4, 5))
        .unwrap()
        .member("PYTHAGOREAN", (3, 4, 5))
        .unwrap()
        .member("EQUILATERAL", (1, 1, 1))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes.iter().map(Member::name).collect::<Vec<_>>(), ["RIGHT", "EQUILATERAL"]);
    assert_eq!(shapes.names(true).into_vec(), ["RIGHT", "PYTHAGOREAN", "EQUILATERAL"]);
    assert_eq!(shapes.aliases(), [("PYTHAGOREAN", "RIGHT")]);
    assert_eq!(shapes.get("PYTHAGOREAN").unwrap(), shapes.get("RIGHT").unwrap());
    assert!(shapes.contains("PYTHAGOREAN"));
    assert_eq!(shapes.field_values("first").unwrap().len(), 3, "field functions walk the name registry");

    let err: EnumError = shapes.ensure_unique().unwrap_err();
    assert_eq!(
        err.message(),
        "duplicate values found in <named enum 'Shapes'>: PYTHAGOREAN -> RIGHT"
    );
    assert!(triangle().ensure_unique().is_ok());
}

/// `_order_` must list the canonical members in declaration order.
#[test]
fn order_is_checked() {
    let ok = NamedEnum::builder("Ordered")
        .order("A B")
        .unwrap()
        .member("A", 1)
        .unwrap()
        .member("B", 2)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(ok.attribute("_order_"), Some(&Value::from("A B")));

    let err = NamedEnum::builder("Misordered")
        .order(["B", "A"])
        .unwrap()
        .member("A", 1)
        .unwrap()
        .member("B", 2)
        .unwrap()
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.message(), "member order does not match _order_:\n  ['B', 'A']\n  ['A', 'B']");
}

/// Classes and members can be read from other threads.
#[test]
fn classes_are_shareable_across_threads() {
    let triangle = std::sync::Arc::new(triangle());
    let handle = {
        let triangle = std::sync::Arc::clone(&triangle);
        std::thread::spawn(move || triangle.field_values("third").unwrap().len())
    };
    assert_eq!(handle.join().unwrap(), 2);
}
