//! Affirm Core - fluent assertion engine
//!
//! This crate provides the machinery behind structural assertions:
//! - A dynamic object model (`value`) standing in for reflection
//! - The structural equivalency engine with selection, matching and
//!   ordering rules and a pluggable step plan (`equivalency`)
//! - The text-mismatch renderer used by string assertions (`mismatch`)
//! - Chained collection-ordering assertions (`collections`)
//! - A failure reporter, a value formatter and a structured logging facility

pub mod collections;
pub mod equivalency;
pub mod errors;
pub mod execution;
pub mod formatting;
pub mod logging_facility;
pub mod mismatch;
pub mod value;

pub use affirm_core_types::schema;

// Re-export commonly used types
pub use equivalency::{assert_equivalent, compare, compare_as, EquivalencyOptions, EquivalencyReport};
pub use errors::{AfError, AfErrorKind, AffirmError, Result};
pub use execution::{AssertionScope, Failure};
pub use value::{EnumType, EnumValue, Object, ObjectRef, ObjectType, Type, Value};
