// CLI for timing the cache_matmul kernels under hardware cache counters.

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use matmul_bench::cli::CliArgs;
use matmul_bench::counters::CounterSession;
use matmul_bench::{BenchError, harness};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), BenchError> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return Err(err.into()),
    };

    let mut session = CounterSession::open()?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    harness::run_all(&mut session, &args.config(), |report| {
        report
            .write_line(&mut stdout.lock())
            .map_err(BenchError::Output)?;
        if args.verbose {
            report
                .write_summary(&mut stderr.lock())
                .map_err(BenchError::Output)?;
        }
        Ok(())
    })?;

    session.teardown()?;
    Ok(())
}

fn report_error(err: &BenchError) {
    // clap renders its own message and usage
    if let BenchError::Argument(err) = err {
        let _ = err.print();
        return;
    }

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  caused by: {cause}");
        source = cause.source();
    }
}
