//! Operation boundary macros
//!
//! Every operation boundary in Affirm is logged with the same field set:
//! `component`, `op`, `event` and, on completion, `duration_ms`. Errors add
//! `err.kind` and `err.code` from the error facility. Extra fields follow
//! the usual `tracing` syntax (`name = value`, `name = %display`,
//! `name = ?debug`).

#[doc(hidden)]
#[macro_export]
macro_rules! __affirm_log_boundary {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        ::tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use affirm_core::log_op_start;
/// log_op_start!("compare_equivalency");
/// log_op_start!("compare_equivalency", subject_type = "Customer");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__affirm_log_boundary!(info, $op, $crate::schema::EVENT_START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use affirm_core::log_op_end;
/// log_op_end!("compare_equivalency", duration_ms = 3);
/// log_op_end!("compare_equivalency", duration_ms = 3, failure_count = 0u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__affirm_log_boundary!(
            info,
            $op,
            $crate::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log the failed end of an operation
///
/// `$err` is anything convertible into `AfError`; its kind and stable code
/// become the `err.kind` and `err.code` fields.
///
/// ```
/// # use affirm_core::{log_op_error, errors::AffirmError};
/// let err = AffirmError::NoStepHandled { path: "subject".to_string() };
/// log_op_error!("compare_equivalency", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let af_err: $crate::errors::AfError = $err.into();
        $crate::__affirm_log_boundary!(
            error,
            $op,
            $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?af_err.kind(),
            err.code = af_err.code()
            $(, $($field)*)?
        );
    }};
}
