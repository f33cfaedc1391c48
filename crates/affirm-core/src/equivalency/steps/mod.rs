//! Equivalency steps
//!
//! Each step looks at one node and either declines (`ContinueWithNext`) or
//! settles it. Steps that compare children call back into the validator.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use super::comparands::Comparands;
use super::context::ValidationContext;
use super::validator::ValidateChildNode;
use crate::errors::Result;
use crate::value::Type;

mod auto_conversion;
mod dictionary;
mod enumerable;
mod enums;
mod json;
mod reference_equality;
mod simple;
mod string;
mod structural;
mod user;
mod value_type;

pub use auto_conversion::AutoConversionStep;
pub use dictionary::DictionaryEquivalencyStep;
pub use enumerable::EnumerableEquivalencyStep;
pub use enums::EnumEqualityStep;
pub use json::JsonEquivalencyStep;
pub use reference_equality::ReferenceEqualityEquivalencyStep;
pub use simple::SimpleEqualityEquivalencyStep;
pub use string::StringEqualityEquivalencyStep;
pub use structural::StructuralEqualityEquivalencyStep;
pub use user::{RunAllUserStepsEquivalencyStep, TypeAssertionStep};
pub use value_type::ValueTypeEquivalencyStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquivalencyResult {
    ContinueWithNext,
    EquivalencyProven,
    AssertionCompleted,
}

impl fmt::Display for EquivalencyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EquivalencyResult::ContinueWithNext => "continue",
            EquivalencyResult::EquivalencyProven => "proven",
            EquivalencyResult::AssertionCompleted => "completed",
        };
        f.write_str(text)
    }
}

pub trait EquivalencyStep: fmt::Display + Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns configuration errors only; mismatches go to the context.
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult>;

    /// Identity used to find the step in a plan
    fn step_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// A step that only applies to nodes of certain expected types
pub trait TypedEquivalencyStep: fmt::Display + Send + Sync + 'static {
    fn accepts(&self, expected_type: &Type) -> bool;

    /// # Errors
    ///
    /// Returns configuration errors only.
    fn on_handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult>;
}

/// Adapter declining every node a typed step does not accept
///
/// Reports the wrapped step's type as its own, so plans can refer to it by
/// the inner type.
#[derive(Debug, Clone, Default)]
pub struct Typed<S>(pub S);

impl<S: TypedEquivalencyStep> EquivalencyStep for Typed<S> {
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let expected = comparands.expected_type(context.options());
        if !self.0.accepts(&expected) {
            return Ok(EquivalencyResult::ContinueWithNext);
        }
        self.0.on_handle(comparands, context, validator)
    }

    fn step_type(&self) -> TypeId {
        TypeId::of::<S>()
    }
}

impl<S: fmt::Display> fmt::Display for Typed<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The built-in plan, in evaluation order
pub fn default_steps() -> Vec<Arc<dyn EquivalencyStep>> {
    vec![
        Arc::new(RunAllUserStepsEquivalencyStep),
        Arc::new(AutoConversionStep),
        Arc::new(ReferenceEqualityEquivalencyStep),
        Arc::new(Typed(DictionaryEquivalencyStep)),
        Arc::new(Typed(JsonEquivalencyStep)),
        Arc::new(Typed(EnumerableEquivalencyStep)),
        Arc::new(Typed(StringEqualityEquivalencyStep)),
        Arc::new(Typed(EnumEqualityStep)),
        Arc::new(ValueTypeEquivalencyStep),
        Arc::new(StructuralEqualityEquivalencyStep),
        Arc::new(SimpleEqualityEquivalencyStep),
    ]
}

/// Report the standard "expected X, but found Y" failure at the current node
pub(crate) fn report_mismatch(comparands: &Comparands, context: &mut ValidationContext<'_>) {
    let message = format!(
        "Expected {} to be {}, but found {}.",
        context.node().description(),
        context.format(&comparands.expectation),
        context.format(&comparands.subject)
    );
    context.fail(message);
}
