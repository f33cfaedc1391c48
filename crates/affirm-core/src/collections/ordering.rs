//! Ordering assertions with chained secondary keys
//!
//! Once a primary order holds, `then_be_in_*` checks the same sequence
//! against the primary comparator extended by one more key, the way a
//! multi-key sort comparator breaks ties.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::{AffirmError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("ascending"),
            SortDirection::Descending => f.write_str("descending"),
        }
    }
}

type Comparer<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;

struct OrderingKey<'a, T> {
    comparer: Comparer<'a, T>,
    direction: SortDirection,
    description: String,
}

impl<T> OrderingKey<'_, T> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = (self.comparer)(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Start an assertion on `subject`
pub fn assert_that<T: fmt::Debug>(subject: &[T]) -> CollectionAssertions<'_, T> {
    CollectionAssertions { subject }
}

pub struct CollectionAssertions<'a, T> {
    subject: &'a [T],
}

impl<'a, T: fmt::Debug> CollectionAssertions<'a, T> {
    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the first item out of order.
    pub fn be_in_ascending_order_by<K, F>(
        self,
        key: F,
        description: &str,
    ) -> Result<SubsequentOrderingAssertions<'a, T>>
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.start(by_key(key), SortDirection::Ascending, description)
    }

    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the first item out of order.
    pub fn be_in_descending_order_by<K, F>(
        self,
        key: F,
        description: &str,
    ) -> Result<SubsequentOrderingAssertions<'a, T>>
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.start(by_key(key), SortDirection::Descending, description)
    }

    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the first item out of order.
    pub fn be_in_ascending_order_using<C>(
        self,
        comparer: C,
        description: &str,
    ) -> Result<SubsequentOrderingAssertions<'a, T>>
    where
        C: Fn(&T, &T) -> Ordering + 'a,
    {
        self.start(Box::new(comparer), SortDirection::Ascending, description)
    }

    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the first item out of order.
    pub fn be_in_descending_order_using<C>(
        self,
        comparer: C,
        description: &str,
    ) -> Result<SubsequentOrderingAssertions<'a, T>>
    where
        C: Fn(&T, &T) -> Ordering + 'a,
    {
        self.start(Box::new(comparer), SortDirection::Descending, description)
    }

    fn start(
        self,
        comparer: Comparer<'a, T>,
        direction: SortDirection,
        description: &str,
    ) -> Result<SubsequentOrderingAssertions<'a, T>> {
        SubsequentOrderingAssertions {
            subject: self.subject,
            keys: Vec::new(),
        }
        .chain(comparer, direction, description)
    }
}

fn by_key<'a, T, K, F>(key: F) -> Comparer<'a, T>
where
    K: Ord,
    F: Fn(&T) -> K + 'a,
{
    Box::new(move |a, b| key(a).cmp(&key(b)))
}

/// Handle returned once an ordering holds; adds tie-breaking keys
pub struct SubsequentOrderingAssertions<'a, T> {
    subject: &'a [T],
    keys: Vec<OrderingKey<'a, T>>,
}

impl<'a, T: fmt::Debug> SubsequentOrderingAssertions<'a, T> {
    pub fn subject(&self) -> &'a [T] {
        self.subject
    }

    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the first item out of order.
    pub fn then_be_in_ascending_order<K, F>(self, key: F, description: &str) -> Result<Self>
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.chain(by_key(key), SortDirection::Ascending, description)
    }

    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the first item out of order.
    pub fn then_be_in_descending_order<K, F>(self, key: F, description: &str) -> Result<Self>
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.chain(by_key(key), SortDirection::Descending, description)
    }

    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the first item out of order.
    pub fn then_be_in_ascending_order_using<C>(self, comparer: C, description: &str) -> Result<Self>
    where
        C: Fn(&T, &T) -> Ordering + 'a,
    {
        self.chain(Box::new(comparer), SortDirection::Ascending, description)
    }

    /// # Errors
    ///
    /// Returns `AssertionFailed` naming the first item out of order.
    pub fn then_be_in_descending_order_using<C>(self, comparer: C, description: &str) -> Result<Self>
    where
        C: Fn(&T, &T) -> Ordering + 'a,
    {
        self.chain(Box::new(comparer), SortDirection::Descending, description)
    }

    fn chain(
        mut self,
        comparer: Comparer<'a, T>,
        direction: SortDirection,
        description: &str,
    ) -> Result<Self> {
        self.keys.push(OrderingKey {
            comparer,
            direction,
            description: description.to_string(),
        });
        match self.first_out_of_order() {
            None => Ok(self),
            Some(index) => Err(AffirmError::AssertionFailed {
                message: format!(
                    "Expected collection to be ordered {}, but found {:?} where the item at index {} is out of order.",
                    self.describe(),
                    self.subject,
                    index
                ),
                failure_count: 1,
            }),
        }
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    fn first_out_of_order(&self) -> Option<usize> {
        self.subject
            .windows(2)
            .position(|pair| self.compare(&pair[0], &pair[1]) == Ordering::Greater)
            .map(|i| i + 1)
    }

    fn describe(&self) -> String {
        self.keys
            .iter()
            .map(|key| format!("{} by {}", key.direction, key.description))
            .collect::<Vec<_>>()
            .join(", then ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Person {
        name: &'static str,
        age: u32,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Ann", age: 40 },
            Person { name: "Ann", age: 30 },
            Person { name: "Bob", age: 50 },
        ]
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let people = people();
        let result = assert_that(&people)
            .be_in_ascending_order_by(|p| p.name, "name")
            .unwrap()
            .then_be_in_descending_order(|p| p.age, "age");
        assert!(result.is_ok());
    }

    #[test]
    fn test_secondary_key_violation_is_reported() {
        let people = people();
        let err = assert_that(&people)
            .be_in_ascending_order_by(|p| p.name, "name")
            .unwrap()
            .then_be_in_ascending_order(|p| p.age, "age")
            .err()
            .unwrap();
        let message = err.to_string();
        assert!(message.contains("ascending by name, then ascending by age"));
        assert!(message.contains("index 1"));
    }

    #[test]
    fn test_primary_violation() {
        let numbers = [3, 1, 2];
        let err = assert_that(&numbers)
            .be_in_ascending_order_by(|n| *n, "value")
            .err()
            .unwrap();
        assert!(matches!(err, AffirmError::AssertionFailed { failure_count: 1, .. }));
    }

    #[test]
    fn test_comparer_variant() {
        let words = ["pear", "fig", "apple"];
        assert!(assert_that(&words)
            .be_in_descending_order_using(|a: &&str, b: &&str| a.cmp(b), "alphabet")
            .is_ok());
    }

    #[test]
    fn test_trivial_sequences_are_always_ordered() {
        let empty: [i32; 0] = [];
        let single = [7];
        for subject in [&empty[..], &single[..]] {
            assert!(assert_that(subject)
                .be_in_ascending_order_by(|n| *n, "value")
                .unwrap()
                .then_be_in_descending_order(|n| -n, "negated")
                .unwrap()
                .then_be_in_ascending_order(|n| *n, "value again")
                .is_ok());
        }
    }
}
