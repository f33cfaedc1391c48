//! The pair of values compared at one node

use super::options::EquivalencyOptions;
use crate::value::{Type, Value};

#[derive(Debug, Clone)]
pub struct Comparands {
    pub subject: Value,
    pub expectation: Value,
    /// Declared type of the position, `Any` when nothing is declared
    pub compile_time_type: Type,
}

impl Comparands {
    pub fn new(subject: Value, expectation: Value, compile_time_type: Type) -> Self {
        Self {
            subject,
            expectation,
            compile_time_type,
        }
    }

    /// The expectation's runtime type, or the declared type for `Null`
    pub fn runtime_type(&self) -> Type {
        self.expectation
            .runtime_type()
            .unwrap_or_else(|| self.compile_time_type.clone())
    }

    /// The type that drives step dispatch and member selection
    pub fn expected_type(&self, options: &EquivalencyOptions) -> Type {
        if options.respects_runtime_types() || self.compile_time_type == Type::Any {
            self.runtime_type()
        } else {
            self.compile_time_type.clone()
        }
    }
}
