//! Ordering rules
//!
//! Decide whether the order of items in a collection matters at a given
//! position. Without any rule, collections are compared loosely.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::object_info::ObjectInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStrictness {
    Strict,
    NotStrict,
    Irrelevant,
}

impl OrderStrictness {
    fn inverted(self, invert: bool) -> Self {
        match (self, invert) {
            (OrderStrictness::Strict, true) => OrderStrictness::NotStrict,
            (OrderStrictness::NotStrict, true) => OrderStrictness::Strict,
            (strictness, _) => strictness,
        }
    }
}

pub trait OrderingRule: fmt::Display + Send + Sync + 'static {
    fn evaluate(&self, info: &ObjectInfo) -> OrderStrictness;
}

/// Every collection is strictly ordered
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchAllOrderingRule;

impl OrderingRule for MatchAllOrderingRule {
    fn evaluate(&self, _info: &ObjectInfo) -> OrderStrictness {
        OrderStrictness::Strict
    }
}

impl fmt::Display for MatchAllOrderingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Be strict about the order of items in collections")
    }
}

/// Strict (or, inverted, not strict) ordering for the collection at a path
#[derive(Debug, Clone)]
pub struct PathBasedOrderingRule {
    path: String,
    invert: bool,
}

impl PathBasedOrderingRule {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            invert: false,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Without numeric index qualifiers in the configured path, the rule
    /// applies to the same member of every collection item
    fn normalize(&self, object_path: &str) -> (String, String) {
        if has_index_qualifier(&self.path) {
            (self.path.to_lowercase(), object_path.to_lowercase())
        } else {
            (
                strip_indices(&self.path).to_lowercase(),
                strip_indices(object_path).to_lowercase(),
            )
        }
    }
}

fn strip_indices(path: &str) -> String {
    let mut stripped = String::with_capacity(path.len());
    let mut depth = 0usize;
    for c in path.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }
    stripped.trim_start_matches('.').to_string()
}

fn has_index_qualifier(path: &str) -> bool {
    path.split('[').skip(1).any(|rest| {
        rest.split_once(']')
            .is_some_and(|(index, _)| !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()))
    })
}

impl OrderingRule for PathBasedOrderingRule {
    fn evaluate(&self, info: &ObjectInfo) -> OrderStrictness {
        let (configured, actual) = self.normalize(&info.path);
        if configured == actual {
            OrderStrictness::Strict.inverted(self.invert)
        } else {
            OrderStrictness::Irrelevant
        }
    }
}

impl fmt::Display for PathBasedOrderingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            write!(f, "Do not be strict about the order of collection items when path is {}", self.path)
        } else {
            write!(f, "Be strict about the order of collection items when path is {}", self.path)
        }
    }
}

pub type ObjectPredicate = Arc<dyn Fn(&ObjectInfo) -> bool + Send + Sync>;

/// Strict (or, inverted, not strict) ordering wherever a predicate holds
#[derive(Clone)]
pub struct PredicateBasedOrderingRule {
    description: String,
    predicate: ObjectPredicate,
    invert: bool,
}

impl PredicateBasedOrderingRule {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ObjectInfo) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
            invert: false,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }
}

impl OrderingRule for PredicateBasedOrderingRule {
    fn evaluate(&self, info: &ObjectInfo) -> OrderStrictness {
        if (self.predicate)(info) {
            OrderStrictness::Strict.inverted(self.invert)
        } else {
            OrderStrictness::Irrelevant
        }
    }
}

impl fmt::Display for PredicateBasedOrderingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.invert { "Do not be" } else { "Be" };
        write!(f, "{} strict about the order of items when {}", prefix, self.description)
    }
}

/// The configured ordering rules
#[derive(Clone, Default)]
pub struct OrderingRuleCollection {
    rules: Vec<Arc<dyn OrderingRule>>,
}

impl OrderingRuleCollection {
    pub fn add(&mut self, rule: impl OrderingRule) {
        self.rules.push(Arc::new(rule));
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn rules(&self) -> &[Arc<dyn OrderingRule>] {
        &self.rules
    }

    /// Strict when some rule says so and none says otherwise
    pub fn is_order_strict(&self, info: &ObjectInfo) -> bool {
        let verdicts: Vec<OrderStrictness> = self.rules.iter().map(|r| r.evaluate(info)).collect();
        verdicts.contains(&OrderStrictness::Strict) && !verdicts.contains(&OrderStrictness::NotStrict)
    }
}

impl fmt::Display for OrderingRuleCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rules.is_empty() {
            return f.write_str("- Without strict ordering of collection items");
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "- {}", rule)?;
        }
        Ok(())
    }
}
