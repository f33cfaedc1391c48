//! Core types shared across Affirm facilities
//!
//! This crate provides foundational types used by the logging facility and
//! the assertion engine:
//!
//! - **Sequence numbers**: process-wide, monotonically increasing ordering
//!   stamps for reported failures and trace events
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
pub mod sequence;

pub use sequence::{next_sequence, SequenceCounter, SequenceNumber};
