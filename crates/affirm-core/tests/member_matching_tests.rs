#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use affirm_core::equivalency::{compare, EquivalencyOptions};
use affirm_core::errors::AffirmError;
use affirm_core::value::{MemberSpec, Object, ObjectRef, ObjectType, Type, Value};
use common::*;

/// Like `Customer`, but the name lives in `FullName`
fn client_type() -> Arc<ObjectType> {
    ObjectType::builder("Client")
        .property("Id", Type::String)
        .property("FullName", Type::String)
        .property("Age", Type::Int)
        .build()
}

fn client(id: &str, name: &str, age: i64) -> ObjectRef {
    Object::with_values(
        &client_type(),
        [
            ("Id", Value::from(id)),
            ("FullName", Value::from(name)),
            ("Age", Value::from(age)),
        ],
    )
    .unwrap()
}

// ----------------------------------------------------------------------------
// Matching by name
// ----------------------------------------------------------------------------

#[test]
fn test_unmapped_rename_is_a_missing_member() {
    let report = compare(
        client("1", "Ann", 40),
        customer("1", "Ann", 40),
        &EquivalencyOptions::default(),
    )
    .unwrap();
    assert_eq!(report.failures().len(), 1);
    assert_eq!(
        report.failures()[0].message,
        "Expectation has property Name that the other object does not have."
    );
}

#[test]
fn test_missing_members_can_be_skipped() {
    let report = compare(
        client("1", "Ann", 41),
        customer("1", "Ann", 40),
        &EquivalencyOptions::default().excluding_missing_members(),
    )
    .unwrap();
    let paths: Vec<&str> = report.failures().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["Age"]);
}

#[test]
fn test_non_browsable_subject_member_is_reported_when_ignored() {
    let hidden = type_with(
        "Hidden",
        vec![
            MemberSpec::property("Id", Type::String),
            MemberSpec::property("Cache", Type::String).non_browsable(),
        ],
    );
    let visible = type_with(
        "Visible",
        vec![
            MemberSpec::property("Id", Type::String),
            MemberSpec::property("Cache", Type::String),
        ],
    );
    let subject = Object::with_values(&hidden, [("Id", "1"), ("Cache", "c")]).unwrap();
    let expectation = Object::with_values(&visible, [("Id", "1"), ("Cache", "c")]).unwrap();

    assert!(compare(subject.clone(), expectation.clone(), &EquivalencyOptions::default())
        .unwrap()
        .is_equivalent());

    let report = compare(
        subject,
        expectation,
        &EquivalencyOptions::default().ignoring_non_browsable_on_subject(),
    )
    .unwrap();
    assert_eq!(report.failures().len(), 1);
    assert!(report.failures()[0]
        .message
        .starts_with("Expectation has property Cache that is non-browsable in the other object"));
}

// ----------------------------------------------------------------------------
// Mapping
// ----------------------------------------------------------------------------

#[test]
fn test_path_mapping_compares_renamed_member() {
    let options = EquivalencyOptions::default()
        .with_mapping("Name", "FullName")
        .unwrap();

    assert!(compare(client("1", "Ann", 40), customer("1", "Ann", 40), &options)
        .unwrap()
        .is_equivalent());

    let report = compare(client("1", "Anne", 40), customer("1", "Ann", 40), &options).unwrap();
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].path, "Name");
}

#[test]
fn test_path_mapping_applies_to_every_item_of_a_collection() {
    let options = EquivalencyOptions::default()
        .with_strict_ordering()
        .with_mapping("Name", "FullName")
        .unwrap();

    let report = compare(
        vec![client("1", "Ann", 40), client("2", "Bob", 50)],
        vec![customer("1", "Ann", 40), customer("2", "Bob", 50)],
        &options,
    )
    .unwrap();
    assert!(report.is_equivalent());
}

#[test]
fn test_member_mapping_by_type() {
    let options = EquivalencyOptions::default()
        .with_member_mapping(customer_type(), client_type(), "Name", "FullName")
        .unwrap();

    assert!(compare(client("1", "Ann", 40), customer("1", "Ann", 40), &options)
        .unwrap()
        .is_equivalent());
    assert!(options.to_string().contains("Map Customer.Name to Client.FullName"));
}

#[test]
fn test_member_mapping_ignores_other_types() {
    let options = EquivalencyOptions::default()
        .with_member_mapping(id_type(), client_type(), "Name", "FullName")
        .unwrap();

    // Customer is not Keyed, so the mapping never applies
    let report = compare(client("1", "Ann", 40), customer("1", "Ann", 40), &options).unwrap();
    assert_eq!(report.failures().len(), 1);
}

#[test]
fn test_mapping_to_an_absent_member_fails_the_comparison() {
    let options = EquivalencyOptions::default()
        .with_mapping("Name", "Nickname")
        .unwrap();

    let err = compare(client("1", "Ann", 40), customer("1", "Ann", 40), &options).unwrap_err();
    match err {
        AffirmError::MissingMappedMember { type_name, member } => {
            assert_eq!(type_name, "Client");
            assert_eq!(member, "Nickname");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_invalid_mappings_are_rejected_up_front() {
    let nested = EquivalencyOptions::default()
        .with_member_mapping(customer_type(), client_type(), "a.b", "FullName")
        .unwrap_err();
    assert!(matches!(nested, AffirmError::NestedMemberName { ref side, .. } if side == "expectation"));

    let empty = EquivalencyOptions::default()
        .with_member_mapping(customer_type(), client_type(), "Name", "")
        .unwrap_err();
    assert!(matches!(empty, AffirmError::EmptyArgument { .. }));

    let parents = EquivalencyOptions::default()
        .with_mapping("Address.Street", "Street")
        .unwrap_err();
    assert!(matches!(parents, AffirmError::MismatchedMappingParents { .. }));

    let indexed = EquivalencyOptions::default()
        .with_mapping("Items[0]", "Entries[0]")
        .unwrap_err();
    assert!(matches!(indexed, AffirmError::InvalidMemberPath { .. }));
}

#[test]
fn test_latest_mapping_wins() {
    let options = EquivalencyOptions::default()
        .with_mapping("Name", "Nickname")
        .unwrap()
        .with_mapping("Name", "FullName")
        .unwrap();

    assert!(compare(client("1", "Ann", 40), customer("1", "Ann", 40), &options)
        .unwrap()
        .is_equivalent());
}
