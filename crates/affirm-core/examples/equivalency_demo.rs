//! Equivalency Demo
//!
//! Walks through the main features of the assertion engine:
//! 1. Structural comparison of object graphs with every mismatch reported
//! 2. Member selection and mapping
//! 3. Loose and strict collection ordering
//! 4. Text mismatch excerpts
//! 5. Chained ordering assertions

use affirm_core::collections::assert_that;
use affirm_core::equivalency::{compare, EquivalencyOptions};
use affirm_core::logging_facility::{init, Profile};
use affirm_core::mismatch::assertions::assert_same_string;
use affirm_core::value::{Object, ObjectType, Type, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);
    println!("=== Affirm Equivalency Demo ===\n");

    // ===== Part 1: Object graphs =====
    println!("## Part 1: Object graphs\n");

    let address = ObjectType::builder("Address")
        .property("Street", Type::String)
        .property("City", Type::String)
        .build();
    let customer = ObjectType::builder("Customer")
        .property("Name", Type::String)
        .property("Age", Type::Int)
        .property("Address", Type::Object(address.clone()))
        .build();

    let subject = Object::with_values(
        &customer,
        [
            ("Name", Value::from("Jane Doe")),
            ("Age", Value::from(41)),
            (
                "Address",
                Object::with_values(&address, [("Street", "Main St 1"), ("City", "Springfield")])?
                    .into(),
            ),
        ],
    )?;
    let expectation = Object::with_values(
        &customer,
        [
            ("Name", Value::from("Jane Roe")),
            ("Age", Value::from(40)),
            (
                "Address",
                Object::with_values(&address, [("Street", "Main St 1"), ("City", "Shelbyville")])?
                    .into(),
            ),
        ],
    )?;

    let report = compare(subject.clone(), expectation.clone(), &EquivalencyOptions::new())?;
    println!("{} mismatch(es):", report.failures().len());
    for failure in report.failures() {
        println!("- [{}] {}", failure.path, failure.message);
    }
    println!();

    // ===== Part 2: Selecting members =====
    println!("## Part 2: Selecting members\n");

    let options = EquivalencyOptions::new()
        .excluding("Name")?
        .excluding("Age")?
        .excluding("Address.City")?;
    let report = compare(subject, expectation, &options)?;
    println!("Without Name, Age and Address.City: equivalent = {}\n", report.is_equivalent());

    // ===== Part 3: Collections =====
    println!("## Part 3: Collections\n");

    let loose = compare(vec![1, 2, 3], vec![3, 1, 2], &EquivalencyOptions::new())?;
    println!("[1, 2, 3] vs [3, 1, 2], loose: equivalent = {}", loose.is_equivalent());

    let strict = compare(
        vec![1, 2, 3],
        vec![3, 1, 2],
        &EquivalencyOptions::new().with_strict_ordering(),
    )?;
    println!(
        "[1, 2, 3] vs [3, 1, 2], strict: {} mismatch(es)\n",
        strict.failures().len()
    );

    // ===== Part 4: Text mismatches =====
    println!("## Part 4: Text mismatches\n");

    if let Err(err) = assert_same_string(
        "The quick brown fox jumps over the lazy dog and keeps running",
        "The quick brown fox jumps over the lazy cat and keeps running",
        "sentence",
    ) {
        println!("{}\n", err);
    }

    // ===== Part 5: Chained ordering =====
    println!("## Part 5: Chained ordering\n");

    let people = [("Ann", 40), ("Ann", 30), ("Bob", 50)];
    let result = assert_that(&people)
        .be_in_ascending_order_by(|(name, _)| *name, "name")?
        .then_be_in_ascending_order(|(_, age)| *age, "age");
    if let Err(err) = result {
        println!("{}", err);
    }

    println!("\n=== Demo complete ===");
    Ok(())
}
