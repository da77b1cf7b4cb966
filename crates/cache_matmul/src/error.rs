// Error type shared by the matrix buffers and the kernel selection.

use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatrixError>;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("matrix dimension must be positive")]
    EmptyDimension,

    #[error("a {n}x{n} matrix does not fit in the address space")]
    TooLarge { n: usize },

    #[error("unable to allocate a {n}x{n} matrix")]
    Allocation {
        n: usize,
        #[source]
        source: TryReserveError,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("unknown multiplication method `{0}`, expected one of: standard, line, block")]
    UnknownMethod(String),

    #[error("operand dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
