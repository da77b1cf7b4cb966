// Measurement harness for the cache_matmul kernels: hardware cache-miss
// counters, timing and reporting around a single multiplication.

pub mod cli;
pub mod counters;
pub mod error;
pub mod harness;
pub mod report;
pub mod timer;

pub use error::{BenchError, CounterError, Result};
