use std::fmt;

use super::{EquivalencyResult, TypedEquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::node::Node;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;
use crate::value::{Type, Value};

/// Compares maps key by key
///
/// Missing and additional keys are reported once each; values under shared
/// keys are compared as child nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryEquivalencyStep;

fn key_text(key: &Value) -> String {
    match key {
        Value::Str(s) => s.clone(),
        Value::Char(c) => c.to_string(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        other => format!("{:?}", other),
    }
}

fn find<'v>(entries: &'v [(Value, Value)], key: &Value) -> Option<&'v Value> {
    entries
        .iter()
        .find(|(k, _)| k.simple_equals(key))
        .map(|(_, v)| v)
}

impl TypedEquivalencyStep for DictionaryEquivalencyStep {
    fn accepts(&self, expected_type: &Type) -> bool {
        *expected_type == Type::Map
    }

    fn on_handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let (Value::Map(subject), Value::Map(expectation)) =
            (&comparands.subject, &comparands.expectation)
        else {
            if comparands.expectation.is_null() {
                return Ok(EquivalencyResult::ContinueWithNext);
            }
            let message = format!(
                "Expected {} to be a dictionary, but found {}.",
                context.node().description(),
                context.format(&comparands.subject)
            );
            context.fail(message);
            return Ok(EquivalencyResult::AssertionCompleted);
        };

        let missing: Vec<&Value> = expectation
            .iter()
            .map(|(k, _)| k)
            .filter(|k| find(subject, k).is_none())
            .collect();
        let additional: Vec<&Value> = subject
            .iter()
            .map(|(k, _)| k)
            .filter(|k| find(expectation, k).is_none())
            .collect();

        if !missing.is_empty() {
            let keys = format_keys(context, &missing);
            let message = format!(
                "Expected {} to contain key(s) {}, but they were missing.",
                context.node().description(),
                keys
            );
            context.fail(message);
        }
        if !additional.is_empty() {
            let keys = format_keys(context, &additional);
            let message = format!(
                "Expected {} not to contain additional key(s) {}.",
                context.node().description(),
                keys
            );
            context.fail(message);
        }

        for (key, expected) in expectation {
            let Some(actual) = find(subject, key) else {
                continue;
            };
            let node = Node::dictionary_entry(context.node(), &key_text(key));
            let mut child = Comparands::new(actual.clone(), expected.clone(), Type::Any);
            let mut child_context = context.for_node(node);
            validator.assert_equality_using(&mut child, &mut child_context)?;
        }
        Ok(EquivalencyResult::AssertionCompleted)
    }
}

fn format_keys(context: &ValidationContext<'_>, keys: &[&Value]) -> String {
    let parts: Vec<String> = keys.iter().map(|k| context.format(k)).collect();
    format!("{{{}}}", parts.join(", "))
}

impl fmt::Display for DictionaryEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compare dictionaries key by key")
    }
}

