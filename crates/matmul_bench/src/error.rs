// Error taxonomy of the benchmark harness. Every variant is fatal.

use std::io;

use cache_matmul::MatrixError;
use thiserror::Error;

use crate::counters::{CounterOp, SessionState};

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("counter subsystem failed to {op}")]
    Subsystem {
        op: CounterOp,
        #[source]
        source: io::Error,
    },

    #[error("cannot {op} while the counter session is {state}")]
    InvalidTransition { op: CounterOp, state: SessionState },

    #[error("counter subsystem returned {actual} values, expected {expected}")]
    EventCount { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum BenchError {
    /// Missing or malformed arguments, including an unknown method name.
    #[error(transparent)]
    Argument(#[from] clap::Error),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Counter(#[from] CounterError),

    #[error("unable to write run report")]
    Output(#[source] io::Error),
}
