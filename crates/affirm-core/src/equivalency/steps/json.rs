use std::fmt;

use serde_json::Value as Json;

use super::{EquivalencyResult, TypedEquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;
use crate::value::{Type, Value};

/// Hands JSON documents to a dedicated comparison
///
/// Reports at most one failure, describing the first difference, and never
/// recurses into the document structurally.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEquivalencyStep;

impl TypedEquivalencyStep for JsonEquivalencyStep {
    fn accepts(&self, expected_type: &Type) -> bool {
        *expected_type == Type::Json
    }

    fn on_handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        _validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let Value::Json(expectation) = &comparands.expectation else {
            return Ok(EquivalencyResult::ContinueWithNext);
        };
        let subject = match &comparands.subject {
            Value::Json(json) => Some(json.clone()),
            Value::Str(text) => serde_json::from_str::<Json>(text).ok(),
            _ => None,
        };
        let Some(subject) = subject else {
            let message = format!(
                "Expected {} to be a JSON document, but found {}.",
                context.node().description(),
                context.format(&comparands.subject)
            );
            context.fail(message);
            return Ok(EquivalencyResult::AssertionCompleted);
        };

        match first_difference(&subject, expectation, "$") {
            None => Ok(EquivalencyResult::EquivalencyProven),
            Some(difference) => {
                let message = format!(
                    "Expected {} to be JSON equivalent to {}, but {}.",
                    context.node().description(),
                    expectation,
                    difference
                );
                context.fail(message);
                Ok(EquivalencyResult::AssertionCompleted)
            }
        }
    }
}

/// Describe the first difference between two documents, depth first
///
/// Object keys are compared regardless of order; array items pairwise.
pub(crate) fn first_difference(subject: &Json, expectation: &Json, path: &str) -> Option<String> {
    match (subject, expectation) {
        (Json::Object(actual), Json::Object(expected)) => {
            for (key, value) in expected {
                let child = format!("{}.{}", path, key);
                match actual.get(key) {
                    None => return Some(format!("{} is missing", child)),
                    Some(found) => {
                        if let Some(difference) = first_difference(found, value, &child) {
                            return Some(difference);
                        }
                    }
                }
            }
            actual
                .keys()
                .find(|key| !expected.contains_key(*key))
                .map(|key| format!("{}.{} was not expected", path, key))
        }
        (Json::Array(actual), Json::Array(expected)) => {
            if actual.len() != expected.len() {
                return Some(format!(
                    "{} has {} item(s) instead of {}",
                    path,
                    actual.len(),
                    expected.len()
                ));
            }
            actual
                .iter()
                .zip(expected)
                .enumerate()
                .find_map(|(i, (a, e))| first_difference(a, e, &format!("{}[{}]", path, i)))
        }
        (Json::Number(a), Json::Number(e)) if numbers_equal(a, e) => None,
        (a, e) if a == e => None,
        (a, e) => Some(format!("{} has {} instead of {}", path, a, e)),
    }
}

/// Integers compare exactly; floats only against the f64 of the other side
fn numbers_equal(a: &serde_json::Number, e: &serde_json::Number) -> bool {
    if let (Some(a), Some(e)) = (a.as_i64(), e.as_i64()) {
        return a == e;
    }
    if let (Some(a), Some(e)) = (a.as_u64(), e.as_u64()) {
        return a == e;
    }
    if (a.is_i64() || a.is_u64()) && (e.is_i64() || e.is_u64()) {
        return false;
    }
    a.as_f64() == e.as_f64()
}

impl fmt::Display for JsonEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compare JSON documents")
    }
}
