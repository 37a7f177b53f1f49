//! Error types shared across uwave crates.

use std::collections::TryReserveError;

/// Top-level error type for uwave operations.
///
/// The first three variants make up the engine's status taxonomy. "No
/// match" is deliberately absent: it is a normal outcome and is expressed
/// as `Option::None` by the query that produces it.
#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Allocation failure: {message}")]
    AllocationFailure { message: String },

    #[error("Internal inconsistency: {message}")]
    InternalInconsistency { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using GestureError.
pub type GestureResult<T> = Result<T, GestureError>;

/// Coarse classification of a [`GestureError`], cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    AllocationFailure,
    InternalInconsistency,
    Config,
    Io,
}

impl GestureError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: msg.into(),
        }
    }

    pub fn allocation_failure(msg: impl Into<String>) -> Self {
        Self::AllocationFailure {
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalInconsistency {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a failed `try_reserve` with a note on what was being grown.
    pub fn from_reserve(what: &str, err: TryReserveError) -> Self {
        Self::allocation_failure(format!("{what}: {err}"))
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::AllocationFailure { .. } => ErrorKind::AllocationFailure,
            Self::InternalInconsistency { .. } => ErrorKind::InternalInconsistency,
            Self::Config { .. } | Self::Json(_) => ErrorKind::Config,
            Self::Io(_) | Self::Other(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            GestureError::invalid_parameter("zero axes").kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            GestureError::internal("state mismatch").kind(),
            ErrorKind::InternalInconsistency
        );
        assert_eq!(
            GestureError::allocation_failure("template").kind(),
            ErrorKind::AllocationFailure
        );
    }

    #[test]
    fn test_reserve_failure_maps_to_allocation_failure() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        let mapped = GestureError::from_reserve("affinities", err);
        assert_eq!(mapped.kind(), ErrorKind::AllocationFailure);
        assert!(mapped.to_string().contains("affinities"));
    }

    #[test]
    fn test_display_messages() {
        let err = GestureError::invalid_parameter("window size must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid parameter: window size must be positive"
        );
    }
}
