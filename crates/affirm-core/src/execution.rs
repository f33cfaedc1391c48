//! Assertion execution support: the failure reporter and the trace sink

pub mod scope;
pub mod tracer;

pub use scope::{AssertionScope, Failure};
pub use tracer::Tracer;
