// Command line arguments.

use std::num::NonZeroUsize;

use cache_matmul::{DEFAULT_BLOCK_SIZE, Kernel, Method};
use clap::Parser;

use crate::harness::BenchConfig;

/// Times one square matrix multiplication and counts L1/L2 data-cache
/// misses, printing `<seconds> <l1 misses> <l2 misses>`.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Matrix dimension (rows = columns)
    pub size: NonZeroUsize,

    /// Loop order: standard, line or block
    pub method: Method,

    /// Block side length, only used by the block method
    #[arg(default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: NonZeroUsize,

    /// Number of runs; counters are reset between runs
    #[arg(long, default_value = "1")]
    pub runs: NonZeroUsize,

    /// Also print a readable summary of each run to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn kernel(&self) -> Kernel {
        Kernel::new(self.method, self.block_size)
    }

    pub fn config(&self) -> BenchConfig {
        BenchConfig {
            n: self.size,
            kernel: self.kernel(),
            runs: self.runs,
        }
    }
}
