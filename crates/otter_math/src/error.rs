//! Math error types.

/// Errors produced by checked vector operations.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    /// A vector component was addressed with an index other than 0, 1 or 2.
    #[error("vector index {0} out of range (expected 0..=2)")]
    IndexOutOfRange(usize),

    /// An element-wise or scalar division had a zero divisor.
    #[error("division by zero on axis {axis}")]
    DivideByZero {
        /// Index of the first zero divisor component (0 = x, 1 = y, 2 = z).
        axis: usize,
    },

    /// Attempted to normalize a vector with zero (or non-finite) length.
    #[error("cannot normalize a zero-length vector")]
    ZeroLength,
}
