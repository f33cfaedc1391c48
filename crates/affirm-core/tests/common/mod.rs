use std::sync::Arc;

use affirm_core::value::{EnumType, MemberSpec, Object, ObjectRef, ObjectType, Type, Value};

/// `Customer { Id: String, Name: String, Age: Int }`
#[allow(dead_code)]
pub fn customer_type() -> Arc<ObjectType> {
    ObjectType::builder("Customer")
        .property("Id", Type::String)
        .property("Name", Type::String)
        .property("Age", Type::Int)
        .build()
}

/// Build a customer instance
#[allow(dead_code)]
pub fn customer(id: &str, name: &str, age: i64) -> ObjectRef {
    Object::with_values(
        &customer_type(),
        [
            ("Id", Value::from(id)),
            ("Name", Value::from(name)),
            ("Age", Value::from(age)),
        ],
    )
    .unwrap()
}

/// A type with a single string member `Id`
#[allow(dead_code)]
pub fn id_type() -> Arc<ObjectType> {
    ObjectType::builder("Keyed").property("Id", Type::String).build()
}

#[allow(dead_code)]
pub fn keyed(id: &str) -> ObjectRef {
    Object::with_values(&id_type(), [("Id", id)]).unwrap()
}

/// `Node { Name: String, Next: Any }` for linked and cyclic graphs
#[allow(dead_code)]
pub fn node_type() -> Arc<ObjectType> {
    ObjectType::builder("Node")
        .property("Name", Type::String)
        .property("Next", Type::Any)
        .build()
}

/// A chain of `length` nodes named `n0`, `n1`, ...
#[allow(dead_code)]
pub fn chain(length: usize) -> ObjectRef {
    let ty = node_type();
    let head = Object::with_values(&ty, [("Name", "n0")]).unwrap();
    let mut tail = head.clone();
    for i in 1..length {
        let next = Object::with_values(&ty, [("Name", format!("n{}", i))]).unwrap();
        tail.set("Next", next.clone()).unwrap();
        tail = next;
    }
    head
}

/// A node whose `Next` points back at itself
#[allow(dead_code)]
pub fn self_loop(name: &str) -> ObjectRef {
    let node = Object::with_values(&node_type(), [("Name", name)]).unwrap();
    node.set("Next", node.clone()).unwrap();
    node
}

/// `enum Color { Red = 1, Green = 2 }`
#[allow(dead_code)]
pub fn color_type() -> Arc<EnumType> {
    EnumType::new("Color", [("Red", 1), ("Green", 2)])
}

/// Same values as `Color`, different names
#[allow(dead_code)]
pub fn shade_type() -> Arc<EnumType> {
    EnumType::new("Shade", [("Crimson", 1), ("Lime", 2)])
}

/// Assemble an object type with extra member specs
#[allow(dead_code)]
pub fn type_with(name: &str, members: Vec<MemberSpec>) -> Arc<ObjectType> {
    members
        .into_iter()
        .fold(ObjectType::builder(name), |builder, spec| builder.member(spec))
        .build()
}
