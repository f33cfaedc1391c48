//! Structural equivalency engine
//!
//! Compares a subject graph against an expectation graph member by member,
//! under the control of `EquivalencyOptions`. Mismatches are collected, not
//! returned one at a time: a comparison always walks the whole graph and
//! hands back a report.
//!
//! # Usage
//!
//! ```rust
//! use affirm_core::equivalency::{assert_equivalent, EquivalencyOptions};
//! use affirm_core::value::{Object, ObjectType, Type};
//!
//! let customer = ObjectType::builder("Customer")
//!     .property("Id", Type::String)
//!     .build();
//! let subject = Object::with_values(&customer, [("Id", "01")]).unwrap();
//! let expectation = Object::with_values(&customer, [("Id", "01")]).unwrap();
//!
//! assert_equivalent(subject, expectation, &EquivalencyOptions::new()).unwrap();
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::execution::scope::failures_to_result;
use crate::execution::Failure;
use crate::formatting;
use crate::value::{Type, Value};
use crate::{log_op_end, log_op_error, log_op_start};

pub mod comparands;
pub mod context;
pub mod conversion;
pub mod global;
pub mod matching;
pub mod member;
pub mod member_path;
pub mod node;
pub mod object_info;
pub mod options;
pub mod ordering;
pub mod selection;
pub mod steps;
pub mod validator;

pub use comparands::Comparands;
pub use context::{TraversalState, ValidationContext};
pub use conversion::{ConversionError, ConversionSelector};
pub use global::{EquivalencyPlan, GlobalEquivalencyOptions};
pub use matching::{
    MappedMemberMatchingRule, MappedPathMatchingRule, MemberMatchingRule, MustMatchByNameRule,
    TryMatchByNameRule,
};
pub use member::Member;
pub use member_path::MemberPath;
pub use node::{Node, NodeKind, Pathway};
pub use object_info::ObjectInfo;
pub use options::{
    CyclicReferenceHandling, EnumEquivalencyHandling, EquivalencyOptions, StringComparison,
};
pub use ordering::{
    MatchAllOrderingRule, OrderStrictness, OrderingRule, OrderingRuleCollection,
    PathBasedOrderingRule, PredicateBasedOrderingRule,
};
pub use selection::{MemberSelectionContext, MemberSelectionRule};
pub use steps::{EquivalencyResult, EquivalencyStep, Typed, TypedEquivalencyStep};
pub use validator::{EquivalencyValidator, ValidateChildNode};

/// Outcome of one comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalencyReport {
    failures: Vec<Failure>,
    trace: Vec<String>,
    configuration: String,
}

impl EquivalencyReport {
    pub fn is_equivalent(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Lines written by the tracer, empty unless tracing was enabled
    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    /// # Errors
    ///
    /// Returns `Serialization` if the report cannot be encoded.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Turn the report into a pass/fail outcome
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` listing every failure followed by the
    /// configuration used.
    pub fn into_result(self) -> Result<()> {
        failures_to_result(&self.failures, Some(&self.configuration))
    }
}

/// Compare `subject` with `expectation`, both declared as `Any`
///
/// # Errors
///
/// Returns configuration errors only; mismatches end up in the report.
pub fn compare(
    subject: impl Into<Value>,
    expectation: impl Into<Value>,
    options: &EquivalencyOptions,
) -> Result<EquivalencyReport> {
    compare_as(subject, expectation, Type::Any, options)
}

/// Compare `subject` with `expectation` declared as `declared_type`
///
/// Unless runtime types are respected, objects are compared through the
/// members of the declared type.
///
/// # Errors
///
/// Returns configuration errors only; mismatches end up in the report.
pub fn compare_as(
    subject: impl Into<Value>,
    expectation: impl Into<Value>,
    declared_type: Type,
    options: &EquivalencyOptions,
) -> Result<EquivalencyReport> {
    let start = Instant::now();
    let mut comparands = Comparands::new(subject.into(), expectation.into(), declared_type);
    let expected_type = comparands.expected_type(options);
    log_op_start!("compare_equivalency", expectation_type = %expected_type);

    let plan = global::snapshot().plan;
    let root_is_collection = matches!(comparands.expectation, Value::Seq(_));
    let root = Node::root(comparands.compile_time_type.clone(), root_is_collection);
    let mut state = TraversalState::new(options.tracing_enabled(), formatting::current());

    let outcome = options.validate().and_then(|()| {
        let mut context = ValidationContext::new(root, options, &mut state);
        EquivalencyValidator::new(&plan).assert_equality_using(&mut comparands, &mut context)
    });
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => {
            let (scope, tracer) = state.into_parts();
            let report = EquivalencyReport {
                failures: scope.into_failures(),
                trace: tracer.into_lines(),
                configuration: options.to_string(),
            };
            log_op_end!(
                "compare_equivalency",
                duration_ms = duration_ms,
                failure_count = report.failures.len() as u64
            );
            Ok(report)
        }
        Err(err) => {
            log_op_error!("compare_equivalency", err.clone(), duration_ms = duration_ms);
            Err(err)
        }
    }
}

/// Assert that `subject` is structurally equivalent to `expectation`
///
/// # Errors
///
/// Returns a configuration error, or `AssertionFailed` describing every
/// mismatch.
pub fn assert_equivalent(
    subject: impl Into<Value>,
    expectation: impl Into<Value>,
    options: &EquivalencyOptions,
) -> Result<()> {
    compare(subject, expectation, options)?.into_result()
}
