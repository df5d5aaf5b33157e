//! Logging macros for operation boundaries and per-declaration verdicts.
//!
//! Boundary events carry `component`, `op` and `event`, so captured events
//! can be matched without parsing messages. Failures also carry the package
//! and declaration the error names, when it names one.

/// Log the start of an operation, with optional extra fields.
///
/// ```
/// # use apicompat_core::log_op_start;
/// log_op_start!("diff_bundles");
/// log_op_start!("diff_snapshots", package = "example.com/t");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation. `duration_ms` is required.
///
/// ```
/// # use apicompat_core::log_op_end;
/// log_op_end!("diff_snapshots", duration_ms = 3, breaking_count = 0usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log an operation failure. `err` is anything convertible into `ExError`;
/// its kind, code, package and declaration become fields.
///
/// ```
/// # use apicompat_core::log_op_error;
/// # use apicompat_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::InvalidSnapshot).with_package("example.com/t");
/// log_op_error!("parse_snapshot_bytes", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            package = ex_err.package().unwrap_or_default(),
            decl_name = ex_err.decl().unwrap_or_default(),
            $($($field)*)?
        );
    }};
}

/// Log the verdict for one declaration at debug level.
///
/// ```
/// # use apicompat_core::log_decl_classified;
/// # use apicompat_core::ChangeKind;
/// log_decl_classified!("example.com/t", "function", "F", ChangeKind::Compatible);
/// ```
#[macro_export]
macro_rules! log_decl_classified {
    ($package:expr, $category:expr, $name:expr, $kind:expr) => {
        tracing::debug!(
            package = $package,
            category = $category,
            decl_name = %$name,
            change_kind = $kind.as_str(),
            "classified declaration"
        );
    };
}
