// The measurement loop: allocate operands, bracket the kernel with the
// counter session and the timer, report, release.
//
// Nothing else runs between starting and stopping the counters, so the
// counts cover exactly the kernel's execution.

use std::hint::black_box;
use std::num::NonZeroUsize;

use cache_matmul::{Kernel, Operands};

use crate::counters::{CounterBackend, CounterSession, CounterValues};
use crate::error::Result;
use crate::report::RunReport;
use crate::timer::Timer;

/// What to measure and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub n: NonZeroUsize,
    pub kernel: Kernel,
    pub runs: NonZeroUsize,
}

/// Runs the kernel once over `operands` with counters and timer around it.
///
/// __Arguments:__
///
/// + `session` - a counter session in the configured or reset state;
///   it is left stopped
///
/// + `kernel` - the multiplication strategy to time
///
/// + `operands` - freshly filled `A`, `B` and a zeroed `C`
///
pub fn measure<B: CounterBackend>(
    session: &mut CounterSession<B>,
    kernel: Kernel,
    operands: &mut Operands,
) -> Result<(f64, CounterValues)> {
    let Operands { a, b, c } = operands;

    session.start()?;
    let timer = Timer::start();
    let outcome = kernel.apply(a, b, c);
    let elapsed = timer.elapsed_secs();
    let counters = session.stop()?;

    outcome?;
    black_box(c);

    Ok((elapsed, counters))
}

/// One complete run: the operands live only for the duration of this call.
pub fn run_once<B: CounterBackend>(
    session: &mut CounterSession<B>,
    n: NonZeroUsize,
    kernel: Kernel,
) -> Result<RunReport> {
    let mut operands = Operands::allocate(n.get())?;
    log::info!("multiplying {n}x{n} matrices using {kernel}");

    let (elapsed, counters) = measure(session, kernel, &mut operands)?;
    let report = RunReport::new(kernel, &operands.c, elapsed, counters);
    report.log();

    Ok(report)
}

/// Performs `config.runs` runs, handing each report to `on_report` before
/// resetting the counters for the next one.
pub fn run_all<B, F>(
    session: &mut CounterSession<B>,
    config: &BenchConfig,
    mut on_report: F,
) -> Result<Vec<RunReport>>
where
    B: CounterBackend,
    F: FnMut(&RunReport) -> Result<()>,
{
    let mut reports = Vec::with_capacity(config.runs.get());

    for run in 1..=config.runs.get() {
        log::debug!("run {run} of {}", config.runs);
        let report = run_once(session, config.n, config.kernel)?;
        on_report(&report)?;
        session.reset()?;
        reports.push(report);
    }

    Ok(reports)
}
