//! sqlx error conversion with query context.

use taskflow_core::error::{AppError, ErrorKind};

/// Build a `map_err` closure that converts a sqlx error and prefixes plain
/// data-access failures with `context`. Constraint violations keep their
/// own message.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let err = AppError::from(e);
        match err.kind {
            ErrorKind::Database => AppError {
                message: format!("{context}: {}", err.message),
                ..err
            },
            _ => err,
        }
    }
}

/// Convert a row count returned by `COUNT(*)`.
pub(crate) fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
