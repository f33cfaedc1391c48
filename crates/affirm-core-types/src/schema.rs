//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and failure reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_SEQUENCE: &str = "sequence";

// Graph positions
pub const FIELD_PATH: &str = "path";
pub const FIELD_DEPTH: &str = "depth";
pub const FIELD_SUBJECT_TYPE: &str = "subject_type";
pub const FIELD_EXPECTATION_TYPE: &str = "expectation_type";

// Outcome sizes
pub const FIELD_FAILURE_COUNT: &str = "failure_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_TRACE: &str = "trace";
pub const EVENT_CONVERSION_FAILED: &str = "conversion_failed";
