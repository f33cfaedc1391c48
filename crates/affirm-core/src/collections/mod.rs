//! Assertions on in-memory collections

pub mod ordering;

pub use ordering::{assert_that, CollectionAssertions, SortDirection, SubsequentOrderingAssertions};
