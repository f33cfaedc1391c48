//! Structured logging for Affirm
//!
//! Comparisons emit `tracing` events at their boundaries: a `start` and an
//! `end` (or `end_error`) event per `compare_equivalency` call, a `debug`
//! event per failed auto conversion, and `trace` events mirroring the
//! per-node tracer. Field names come from `affirm_core_types::schema`.
//!
//! The library never installs a subscriber on its own. Demo binaries call
//! `init` with a `Profile`; tests that inspect events call
//! `test_capture::init_test_capture` instead.
//!
//! ```rust
//! use affirm_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
