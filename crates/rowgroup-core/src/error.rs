use std::collections::TryReserveError;

use thiserror::Error;

/// Recoverable failures of a grouping run.
///
/// Contract violations (pushing past a budget, mismatched thread ids, calling
/// phases out of order) are not represented here; they are caller bugs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GroupError {
    #[error("failed to allocate grouped storage: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("keys and values must have equal length (keys: {keys}, values: {values})")]
    LengthMismatch { keys: usize, values: usize },
    #[error("key index must be non-negative, got {0}")]
    NegativeIndex(i64),
    #[error("index {index} out of bounds for dimension {bound}")]
    IndexOutOfBounds { index: i64, bound: usize },
    #[error("offsets do not fit in the offset type")]
    OffsetOverflow,
    #[error("budget must be non-negative")]
    NegativeBudget,
    #[error("invalid indptr: {0}")]
    InvalidIndptr(&'static str),
    #[error("thread count must be at least 1")]
    ZeroThreads,
}
