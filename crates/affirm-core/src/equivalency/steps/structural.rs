use std::fmt;

use super::{report_mismatch, EquivalencyResult, EquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::matching::find_match;
use crate::equivalency::member::Member;
use crate::equivalency::node::Node;
use crate::equivalency::selection::select_members;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::{AffirmError, Result};
use crate::value::Type;

/// Compares objects member by member
///
/// Members come from the expected type: the declared type by default, the
/// runtime type when runtime types are respected.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEqualityEquivalencyStep;

impl EquivalencyStep for StructuralEqualityEquivalencyStep {
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let options = context.options();
        let expected_type = comparands.expected_type(options);
        let Some(object_type) = expected_type.as_object().cloned() else {
            return Ok(EquivalencyResult::ContinueWithNext);
        };
        if comparands.expectation.as_object().is_none() {
            return Ok(EquivalencyResult::ContinueWithNext);
        }
        if comparands.subject.as_object().is_none() {
            report_mismatch(comparands, context);
            return Ok(EquivalencyResult::AssertionCompleted);
        }

        let parent = context.node().clone();
        let members = select_members(&parent, &object_type, options);
        if members.is_empty() {
            return Err(AffirmError::NoMembersSelected {
                type_name: object_type.name().to_string(),
                path: parent.description(),
            });
        }

        for def in &members {
            let expected = Member::new(
                Node::member(&parent, Type::Object(object_type.clone()), def),
                def.clone(),
            );
            let matched = find_match(
                &expected,
                &comparands.subject,
                &parent,
                options,
                context.scope(),
            )?;
            let Some(matched) = matched else {
                continue;
            };

            let mut child = Comparands::new(
                matched.read_subject(&comparands.subject),
                matched.read_expectation(&comparands.expectation),
                def.declared_type().clone(),
            );
            let mut child_context = context.for_node(matched.into_node());
            validator.assert_equality_using(&mut child, &mut child_context)?;
        }
        Ok(EquivalencyResult::AssertionCompleted)
    }
}

impl fmt::Display for StructuralEqualityEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compare objects member by member")
    }
}
