// Formatting of one measured run.
//
// Standard output carries a single machine-readable line per run:
//
//   <elapsedSeconds> <l1Misses> <l2Misses>
//
// The readable summary and the log record go to stderr.

use std::fmt;
use std::io::{self, Write};

use cache_matmul::{Kernel, Matrix};

use crate::counters::{CacheEvent, CounterValues};

/// Number of leading row-0 entries kept as a smoke check of the result.
pub const PROJECTION_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub n: usize,
    pub kernel: Kernel,
    pub elapsed_secs: f64,
    pub counters: CounterValues,
    pub projection: Vec<f64>,
}

impl RunReport {
    pub fn new(kernel: Kernel, result: &Matrix, elapsed_secs: f64, counters: CounterValues) -> Self {
        Self {
            n: result.dim(),
            kernel,
            elapsed_secs,
            counters,
            projection: result.first_row_projection(PROJECTION_LEN),
        }
    }

    /// The result line, newline terminated.
    pub fn write_line(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{self}")
    }

    /// Readable multi-line summary of the run.
    pub fn write_summary(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Time: {:3.3} seconds", self.elapsed_secs)?;
        writeln!(out, "Result matrix: ")?;
        writeln!(out, "{}", self.projection_text())?;
        writeln!(
            out,
            "{}: {}",
            CacheEvent::L1DataMisses.name(),
            self.counters.l1_misses
        )?;
        writeln!(
            out,
            "{}: {}",
            CacheEvent::L2DataMisses.name(),
            self.counters.l2_misses
        )
    }

    pub fn log(&self) {
        log::info!(
            "{} {}x{}: {:.6}s, L1 DCM {}, L2 DCM {}",
            self.kernel,
            self.n,
            self.n,
            self.elapsed_secs,
            self.counters.l1_misses,
            self.counters.l2_misses
        );
        log::info!("row 0 projection: {}", self.projection_text());
    }

    fn projection_text(&self) -> String {
        self.projection
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.9} {} {}",
            self.elapsed_secs, self.counters.l1_misses, self.counters.l2_misses
        )
    }
}
