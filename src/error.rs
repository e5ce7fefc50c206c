//! Domain error types
//!
//! Validation and not-found failures are surfaced to callers as distinct,
//! actionable errors. Storage failures are carried as `Upstream` so the
//! history path can absorb them and degrade instead of failing.

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    Upstream(#[from] DbError),
}

impl TrackerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        TrackerError::NotFound(msg.into())
    }
}

impl From<rusqlite::Error> for TrackerError {
    fn from(e: rusqlite::Error) -> Self {
        TrackerError::Upstream(DbError::Sqlite(e))
    }
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Reject NaN, infinities and negatives.
pub fn ensure_non_negative(field: &str, value: f64) -> TrackerResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrackerError::validation(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Reject NaN, infinities, zero and negatives.
pub fn ensure_positive(field: &str, value: f64) -> TrackerResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TrackerError::validation(format!(
            "{} must be a positive number, got {}",
            field, value
        )));
    }
    Ok(())
}
