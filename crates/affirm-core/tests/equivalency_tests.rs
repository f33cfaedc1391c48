#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use affirm_core::equivalency::{assert_equivalent, compare, compare_as, EquivalencyOptions};
use affirm_core::errors::AffirmError;
use affirm_core::value::{EnumValue, MemberSpec, Object, ObjectType, Type, Value};
use common::*;
use serde_json::json;

fn options() -> EquivalencyOptions {
    EquivalencyOptions::default()
}

fn messages(report: &affirm_core::EquivalencyReport) -> Vec<String> {
    report.failures().iter().map(|f| f.message.clone()).collect()
}

// ----------------------------------------------------------------------------
// Objects
// ----------------------------------------------------------------------------

#[test]
fn test_single_member_mismatch_reports_one_failure_at_member_path() {
    let report = compare(keyed("01"), keyed("02"), &options()).unwrap();

    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].path, "Id");
    assert!(report.failures()[0]
        .message
        .starts_with("Expected Id to be the same string, but they differ at index 1:"));
}

#[test]
fn test_equal_objects_are_equivalent() {
    let report = compare(
        customer("1", "Ann", 40),
        customer("1", "Ann", 40),
        &options(),
    )
    .unwrap();
    assert!(report.is_equivalent());
}

#[test]
fn test_every_mismatch_is_reported() {
    let report = compare(
        customer("1", "Bob", 41),
        customer("1", "Ann", 40),
        &options(),
    )
    .unwrap();

    let paths: Vec<&str> = report.failures().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["Name", "Age"]);
    assert_eq!(
        report.failures()[1].message,
        "Expected Age to be 40, but found 41."
    );
}

#[test]
fn test_failures_are_stamped_in_report_order() {
    let report = compare(
        customer("2", "Bob", 41),
        customer("1", "Ann", 40),
        &options(),
    )
    .unwrap();
    let sequences: Vec<_> = report.failures().iter().map(|f| f.sequence).collect();
    let mut sorted = sequences.clone();
    sorted.sort();
    assert_eq!(sequences, sorted);
}

#[test]
fn test_member_missing_on_subject_is_reported() {
    let short = ObjectType::builder("Short")
        .property("Id", Type::String)
        .property("Name", Type::String)
        .build();
    let subject = Object::with_values(&short, [("Id", "1"), ("Name", "Ann")]).unwrap();

    let report = compare(subject.clone(), customer("1", "Ann", 40), &options()).unwrap();
    assert_eq!(
        messages(&report),
        vec!["Expectation has property Age that the other object does not have."]
    );

    let relaxed = options().excluding_missing_members();
    assert!(compare(subject, customer("1", "Ann", 40), &relaxed)
        .unwrap()
        .is_equivalent());
}

#[test]
fn test_null_member_on_one_side_is_reported() {
    let subject = Object::with_values(&customer_type(), [("Id", "1")]).unwrap();
    let expectation = Object::with_values(&customer_type(), [("Id", "1"), ("Name", "Ann")]).unwrap();

    let report = compare(subject, expectation, &options().excluding("Age").unwrap()).unwrap();
    assert_eq!(
        messages(&report),
        vec!["Expected Name to be \"Ann\", but found <null>."]
    );
}

#[test]
fn test_nested_paths_are_reported_in_full() {
    let address = ObjectType::builder("Address")
        .property("Street", Type::String)
        .build();
    let person = ObjectType::builder("Person")
        .property("Address", Type::Object(address.clone()))
        .build();
    let subject = Object::with_values(
        &person,
        [("Address", Object::with_values(&address, [("Street", "Main")]).unwrap())],
    )
    .unwrap();
    let expectation = Object::with_values(
        &person,
        [("Address", Object::with_values(&address, [("Street", "High")]).unwrap())],
    )
    .unwrap();

    let report = compare(subject, expectation, &options()).unwrap();
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].path, "Address.Street");
}

#[test]
fn test_object_against_scalar_is_a_type_mismatch() {
    let report = compare(Value::from(5), keyed("1"), &options()).unwrap();
    assert_eq!(report.failures().len(), 1);
    assert!(report.failures()[0].message.starts_with("Expected subject to be Keyed"));
}

#[test]
fn test_type_without_members_is_a_configuration_error() {
    let empty = ObjectType::builder("Empty").build();
    let err = compare(Object::new(&empty), Object::new(&empty), &options()).unwrap_err();
    assert!(matches!(err, AffirmError::NoMembersSelected { ref type_name, .. } if type_name == "Empty"));
}

#[test]
fn test_same_instance_is_equivalent_without_recursion() {
    let shared = customer("1", "Ann", 40);
    let report = compare(shared.clone(), shared, &options().with_tracing()).unwrap();
    assert!(report.is_equivalent());
    assert_eq!(report.trace().len(), 2);
}

// ----------------------------------------------------------------------------
// Declared versus runtime types
// ----------------------------------------------------------------------------

fn derived_pair() -> (Value, Value, Type) {
    let base = ObjectType::builder("Base").property("Id", Type::Int).build();
    let derived = ObjectType::builder("Derived")
        .base(&base)
        .property("Extra", Type::String)
        .build();
    let subject = Object::with_values(&derived, [("Id", Value::from(1)), ("Extra", Value::from("x"))]).unwrap();
    let expectation =
        Object::with_values(&derived, [("Id", Value::from(1)), ("Extra", Value::from("y"))]).unwrap();
    (subject.into(), expectation.into(), Type::Object(base))
}

#[test]
fn test_declared_type_limits_compared_members() {
    let (subject, expectation, base) = derived_pair();
    let report = compare_as(subject, expectation, base, &options()).unwrap();
    assert!(report.is_equivalent());
}

#[test]
fn test_runtime_types_include_derived_members() {
    let (subject, expectation, base) = derived_pair();
    let report = compare_as(
        subject,
        expectation,
        base,
        &options().respecting_runtime_types(),
    )
    .unwrap();
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].path, "Extra");
}

#[test]
fn test_undeclared_root_uses_runtime_type() {
    let (subject, expectation, _) = derived_pair();
    assert!(!compare(subject, expectation, &options()).unwrap().is_equivalent());
}

// ----------------------------------------------------------------------------
// Collections and dictionaries
// ----------------------------------------------------------------------------

#[test]
fn test_collections_ignore_order_by_default() {
    let report = compare(vec![1, 2, 3], vec![3, 2, 1], &options()).unwrap();
    assert!(report.is_equivalent());
}

#[test]
fn test_strict_ordering_pairs_items_by_index() {
    let report = compare(vec![1, 2, 3], vec![3, 2, 1], &options().with_strict_ordering()).unwrap();
    let paths: Vec<&str> = report.failures().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["[0]", "[2]"]);
}

#[test]
fn test_count_mismatch_stops_item_comparison() {
    let report = compare(vec![1, 2], vec![1, 2, 3], &options()).unwrap();
    assert_eq!(
        messages(&report),
        vec!["Expected subject to be a collection with 3 item(s), but {1, 2} contains 2 item(s)."]
    );
}

#[test]
fn test_loose_matching_reports_closest_candidate() {
    let subject = vec![customer("2", "Bob", 30), customer("1", "Anne", 40)];
    let expectation = vec![customer("1", "Ann", 40), customer("2", "Bob", 30)];

    let report = compare(subject, expectation, &options()).unwrap();
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].path, "[0].Name");
}

#[test]
fn test_strict_ordering_for_a_single_path() {
    let holder = ObjectType::builder("Holder")
        .property("Items", Type::Sequence)
        .property("Tags", Type::Sequence)
        .build();
    let make = |items: Vec<i64>, tags: Vec<&str>| {
        Object::with_values(&holder, [("Items", Value::from(items)), ("Tags", Value::from(tags))])
            .unwrap()
    };
    let strict_items = options().with_strict_ordering_for("Items");

    let report = compare(
        make(vec![2, 1], vec!["b", "a"]),
        make(vec![1, 2], vec!["a", "b"]),
        &strict_items,
    )
    .unwrap();
    let paths: Vec<&str> = report.failures().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["Items[0]", "Items[1]"]);
}

#[test]
fn test_dictionary_key_mismatches() {
    let subject = Value::map([("a", 1), ("c", 3)]);
    let expectation = Value::map([("a", 1), ("b", 2)]);

    let report = compare(subject, expectation, &options()).unwrap();
    assert_eq!(
        messages(&report),
        vec![
            "Expected subject to contain key(s) {\"b\"}, but they were missing.",
            "Expected subject not to contain additional key(s) {\"c\"}.",
        ]
    );
}

#[test]
fn test_dictionary_values_are_compared_per_key() {
    let report = compare(
        Value::map([("a", 1), ("b", 5)]),
        Value::map([("b", 2), ("a", 1)]),
        &options(),
    )
    .unwrap();
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].path, "[b]");
}

// ----------------------------------------------------------------------------
// Cycles and depth
// ----------------------------------------------------------------------------

#[test]
fn test_cyclic_reference_is_reported() {
    let report = compare(self_loop("a"), self_loop("a"), &options()).unwrap();
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].path, "Next");
    assert!(report.failures()[0]
        .message
        .ends_with("but it contains a cyclic reference."));
}

#[test]
fn test_cyclic_reference_can_be_ignored() {
    let report = compare(
        self_loop("a"),
        self_loop("a"),
        &options().ignoring_cyclic_references(),
    )
    .unwrap();
    assert!(report.is_equivalent());
}

#[test]
fn test_depth_limit_is_reported_not_overflowed() {
    let report = compare(chain(15), chain(15), &options()).unwrap();

    // both members of the tenth node sit one level too deep
    assert_eq!(report.failures().len(), 2);
    for failure in report.failures() {
        assert!(failure
            .message
            .starts_with("The maximum recursion depth of 10 was reached"));
        assert!(failure.path.starts_with("Next.Next"));
    }
}

#[test]
fn test_depth_limit_can_be_raised_or_lifted() {
    assert!(compare(chain(15), chain(15), &options().with_max_recursion_depth(20))
        .unwrap()
        .is_equivalent());
    assert!(compare(chain(15), chain(15), &options().allowing_infinite_recursion())
        .unwrap()
        .is_equivalent());
}

// ----------------------------------------------------------------------------
// Specialized values
// ----------------------------------------------------------------------------

#[test]
fn test_json_documents_report_a_single_difference() {
    let subject = Value::from(json!({"a": {"b": 2, "c": 9}, "d": [1]}));
    let expectation = Value::from(json!({"d": [1], "a": {"b": 1, "c": 1}}));

    let report = compare(subject, expectation, &options()).unwrap();
    assert_eq!(report.failures().len(), 1);
    assert!(report.failures()[0].message.ends_with("but $.a.b has 2 instead of 1."));
}

#[test]
fn test_json_equivalent_regardless_of_key_order() {
    let report = compare(
        Value::from(json!({"x": 1, "y": 2})),
        Value::from(json!({"y": 2, "x": 1})),
        &options(),
    )
    .unwrap();
    assert!(report.is_equivalent());
}

#[test]
fn test_enums_compare_by_value_by_default() {
    let red = EnumValue::new(&color_type(), 1);
    let crimson = EnumValue::new(&shade_type(), 1);
    assert!(compare(crimson.clone(), red.clone(), &options()).unwrap().is_equivalent());

    let report = compare(crimson, red, &options().comparing_enums_by_name()).unwrap();
    assert_eq!(report.failures().len(), 1);
    assert!(report.failures()[0].message.contains("by name"));
}

#[test]
fn test_enum_against_non_enum_subject() {
    let red = EnumValue::new(&color_type(), 1);
    let report = compare("Red", red, &options()).unwrap();
    assert_eq!(
        messages(&report),
        vec!["Expected subject to be an enum value, but found \"Red\"."]
    );
}

#[test]
fn test_object_type_with_own_equality_is_a_value() {
    let money = ObjectType::builder("Money")
        .property("Amount", Type::Int)
        .property("Note", Type::String)
        .with_equality(|a, b| a.get("Amount") == b.get("Amount"))
        .build();
    let subject = Object::with_values(&money, [("Amount", Value::from(5)), ("Note", Value::from("x"))]).unwrap();
    let expectation =
        Object::with_values(&money, [("Amount", Value::from(5)), ("Note", Value::from("y"))]).unwrap();

    assert!(compare(subject.clone(), expectation.clone(), &options())
        .unwrap()
        .is_equivalent());
    let by_members = options().comparing_by_members(Type::Object(money));
    assert_eq!(
        compare(subject, expectation, &by_members).unwrap().failures().len(),
        1
    );
}

#[test]
fn test_computed_members_take_part() {
    let ty = type_with(
        "Rect",
        vec![
            MemberSpec::property("Width", Type::Int),
            MemberSpec::computed("Area", Type::Int, |o| match o.get("Width") {
                Some(Value::Int(w)) => Value::Int(w * w),
                _ => Value::Null,
            }),
        ],
    );
    let report = compare(
        Object::with_values(&ty, [("Width", 2)]).unwrap(),
        Object::with_values(&ty, [("Width", 3)]).unwrap(),
        &options(),
    )
    .unwrap();
    let paths: Vec<&str> = report.failures().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["Width", "Area"]);
}

// ----------------------------------------------------------------------------
// Strings
// ----------------------------------------------------------------------------

#[test]
fn test_string_options() {
    let cases = [
        ("ABC", "abc", options().ignoring_case()),
        ("  abc", "abc", options().ignoring_leading_whitespace()),
        ("abc \n", "abc", options().ignoring_trailing_whitespace()),
        ("a\r\nb", "a\nb", options().ignoring_newline_style()),
    ];
    for (subject, expectation, options) in cases {
        assert!(
            compare(subject, expectation, &options).unwrap().is_equivalent(),
            "{:?} vs {:?}",
            subject,
            expectation
        );
        assert!(!compare(subject, expectation, &EquivalencyOptions::default())
            .unwrap()
            .is_equivalent());
    }
}

#[test]
fn test_string_against_number_is_reported() {
    let report = compare(5, "5", &options()).unwrap();
    assert_eq!(messages(&report), vec!["Expected subject to be \"5\", but found 5."]);
}

// ----------------------------------------------------------------------------
// User steps, reports and results
// ----------------------------------------------------------------------------

#[test]
fn test_user_assertion_for_a_type() {
    let close = options().using_for_type(Type::Float, "approximate equality", |s, e| {
        match (s, e) {
            (Value::Float(a), Value::Float(b)) if (a - b).abs() < 0.01 => Ok(()),
            _ => Err(format!("{:?} is not close to {:?}", s, e)),
        }
    });
    assert!(compare(1.001, 1.0, &close).unwrap().is_equivalent());
    assert_eq!(
        messages(&compare(1.5, 1.0, &close).unwrap()),
        vec!["Float(1.5) is not close to Float(1.0)"]
    );
    assert!(!compare(1.001, 1.0, &options()).unwrap().is_equivalent());
}

#[test]
fn test_assert_equivalent_appends_configuration() {
    let err = assert_equivalent(keyed("01"), keyed("02"), &options()).unwrap_err();
    match err {
        AffirmError::AssertionFailed {
            message,
            failure_count,
        } => {
            assert_eq!(failure_count, 1);
            assert!(message.contains("\n\nWith configuration:\n- Use declared types"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_report_serializes_to_json() {
    let report = compare(keyed("01"), keyed("02"), &options()).unwrap();
    let text = report.to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["failures"][0]["path"], "Id");
    assert!(parsed["configuration"].as_str().unwrap().contains("Include properties"));
}

#[test]
fn test_tracing_records_steps() {
    let report = compare(customer("1", "Ann", 40), customer("1", "Ann", 40), &options().with_tracing())
        .unwrap();
    assert!(report.trace().iter().any(|line| line.contains("Compare objects member by member")));
    assert!(report.trace().iter().any(|line| line.starts_with("  Name")));
}
