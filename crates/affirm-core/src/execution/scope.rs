//! Failure reporter
//!
//! Structural comparison reports every mismatch it finds instead of stopping
//! at the first one. The scope collects them; `into_result` decides the
//! outcome.

use affirm_core_types::{next_sequence, SequenceNumber};
use serde::{Deserialize, Serialize};

use crate::errors::{AffirmError, Result};

/// A reported mismatch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Failure {
    /// Position in report order across the whole process
    pub sequence: SequenceNumber,
    /// Expectation path of the node the failure belongs to
    pub path: String,
    pub message: String,
}

/// Collects failures for one assertion
#[derive(Debug, Default)]
pub struct AssertionScope {
    failures: Vec<Failure>,
}

impl AssertionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a failure; may be called any number of times
    pub fn fail_with(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.failures.push(Failure {
            sequence: next_sequence(),
            path: path.into(),
            message: message.into(),
        });
    }

    /// Re-register failures captured elsewhere, such as in a probe
    pub fn replay(&mut self, failures: impl IntoIterator<Item = Failure>) {
        for failure in failures {
            self.fail_with(failure.path, failure.message);
        }
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    /// Pass when nothing was reported
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` with every message, one per line.
    pub fn into_result(self) -> Result<()> {
        failures_to_result(&self.failures, None)
    }
}

pub(crate) fn failures_to_result(failures: &[Failure], configuration: Option<&str>) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    let mut message = failures
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if let Some(configuration) = configuration {
        message.push_str("\n\nWith configuration:\n");
        message.push_str(configuration);
    }
    Err(AffirmError::AssertionFailed {
        message,
        failure_count: failures.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scope_passes() {
        assert!(AssertionScope::new().into_result().is_ok());
    }

    #[test]
    fn test_failures_accumulate_in_order() {
        let mut scope = AssertionScope::new();
        scope.fail_with("Id", "first");
        scope.fail_with("Name", "second");
        assert_eq!(scope.failure_count(), 2);
        assert!(scope.failures()[0].sequence < scope.failures()[1].sequence);

        match scope.into_result() {
            Err(AffirmError::AssertionFailed {
                message,
                failure_count,
            }) => {
                assert_eq!(failure_count, 2);
                assert_eq!(message, "first\nsecond");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_replay_restamps_failures() {
        let mut probe = AssertionScope::new();
        probe.fail_with("[0].Id", "mismatch");
        let captured = probe.into_failures();

        let mut scope = AssertionScope::new();
        scope.replay(captured.clone());
        assert_eq!(scope.failures()[0].path, "[0].Id");
        assert!(scope.failures()[0].sequence > captured[0].sequence);
    }

    #[test]
    fn test_failure_serializes() {
        let mut scope = AssertionScope::new();
        scope.fail_with("Id", "differs");
        let json = serde_json::to_value(&scope.failures()[0]).unwrap();
        assert_eq!(json["path"], "Id");
        assert_eq!(json["message"], "differs");
    }
}
