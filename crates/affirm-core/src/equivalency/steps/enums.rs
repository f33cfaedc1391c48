use std::fmt;

use super::{EquivalencyResult, TypedEquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::options::EnumEquivalencyHandling;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;
use crate::value::{Type, Value};

/// Compares enum values by their underlying value or by member name
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumEqualityStep;

fn underlying(value: &Value) -> Option<i64> {
    match value {
        Value::Enum(e) => Some(e.value()),
        Value::Int(i) => Some(*i),
        Value::UInt(u) => i64::try_from(*u).ok(),
        _ => None,
    }
}

impl TypedEquivalencyStep for EnumEqualityStep {
    fn accepts(&self, expected_type: &Type) -> bool {
        matches!(expected_type, Type::Enum(_))
    }

    fn on_handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        _validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let Value::Enum(expected) = &comparands.expectation else {
            return Ok(EquivalencyResult::ContinueWithNext);
        };
        let Some(actual) = underlying(&comparands.subject) else {
            let message = format!(
                "Expected {} to be an enum value, but found {}.",
                context.node().description(),
                context.format(&comparands.subject)
            );
            context.fail(message);
            return Ok(EquivalencyResult::AssertionCompleted);
        };

        let handling = context.options().enum_handling();
        let equal = match handling {
            EnumEquivalencyHandling::ByValue => actual == expected.value(),
            EnumEquivalencyHandling::ByName => match &comparands.subject {
                Value::Enum(subject) => subject.name().is_some() && subject.name() == expected.name(),
                _ => false,
            },
        };
        if equal {
            return Ok(EquivalencyResult::EquivalencyProven);
        }

        let how = match handling {
            EnumEquivalencyHandling::ByValue => "value",
            EnumEquivalencyHandling::ByName => "name",
        };
        let message = format!(
            "Expected {} to equal {} by {}, but found {}.",
            context.node().description(),
            context.format(&comparands.expectation),
            how,
            context.format(&comparands.subject)
        );
        context.fail(message);
        Ok(EquivalencyResult::AssertionCompleted)
    }
}

impl fmt::Display for EnumEqualityStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compare enums")
    }
}
