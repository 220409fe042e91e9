//! Benchmark phase orchestration.
//!
//! Each phase runs to completion even when an earlier phase failed; the
//! failure is logged in place, and the process exits nonzero at the end
//! so automation still sees it.
mod summary;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::args::{BenchArgs, Command};
use crate::bench::{Harness, HarnessOptions, Job, Operation};
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{ReadOperation, WriteOperation, build_client};

use summary::{print_burst_summary, print_sample_summary, print_separator};

pub(crate) async fn execute(args: &BenchArgs) -> AppResult<()> {
    info!(
        "Host: {}, port: {}, file: {}",
        args.host, args.port, args.file
    );

    let client = build_client(args.request_timeout, args.connect_timeout)?;
    let harness = Harness::with_options(HarnessOptions {
        invocation_timeout: args.op_timeout,
        max_in_flight: args.concurrency_limit,
    });

    let failed = match args.command {
        Command::Write => {
            let write =
                WriteOperation::new(client, &args.host, args.port, Path::new(&args.file))?;
            debug!("Benchmarking {}", write.target_url());
            let operation: Arc<dyn Operation> = Arc::new(write);
            run_phases(&harness, args, &operation).await
        }
        Command::Read => {
            let read = ReadOperation::new(
                client,
                &args.host,
                args.port,
                &remote_file_name(&args.file),
            )?;
            debug!("Benchmarking {}", read.target_url());
            let operation: Arc<dyn Operation> = Arc::new(read);
            run_phases(&harness, args, &operation).await
        }
        Command::Mixed => {
            let write = WriteOperation::new(
                client.clone(),
                &args.host,
                args.port,
                Path::new(&args.file),
            )?;
            let read =
                ReadOperation::new(client, &args.host, args.port, &remote_file_name(&args.file))?;
            debug!(
                "Benchmarking {} + {}",
                write.target_url(),
                read.target_url()
            );
            let jobs = vec![
                Job::new("write", Arc::new(write)),
                Job::new("read", Arc::new(read)),
            ];
            run_mixed_phase(&harness, args, &jobs).await
        }
    };

    if failed {
        return Err(AppError::validation(ValidationError::RuntimeErrors));
    }
    Ok(())
}

/// Sequential trials, then a concurrent burst. Returns whether any phase
/// failed.
async fn run_phases(harness: &Harness, args: &BenchArgs, operation: &Arc<dyn Operation>) -> bool {
    println!("Sequential benchmarking:");
    let sequential = harness.run_sequential(args.trials, operation.as_ref()).await;
    let sequential_failed = report_samples("Trials", "Sequential", sequential);
    print_separator();

    println!("Burst benchmarking:");
    let burst = harness.run_concurrent_burst(args.burst, operation).await;
    let burst_failed = report_burst(args.burst.get(), burst);
    print_separator();

    sequential_failed || burst_failed
}

async fn run_mixed_phase(harness: &Harness, args: &BenchArgs, jobs: &[Job]) -> bool {
    let names: Vec<&str> = jobs.iter().map(|job| job.name.as_str()).collect();
    println!("Mixed benchmarking ({}):", names.join(" + "));
    let outcome = harness.run_concurrent_mixed(args.trials, jobs).await;
    let failed = report_samples("Batches", "Mixed", outcome);
    print_separator();
    failed
}

fn report_samples(label: &str, phase: &str, outcome: AppResult<Vec<Duration>>) -> bool {
    let samples = match outcome {
        Ok(samples) => samples,
        Err(err) => {
            error!("{} benchmark failed: {}", phase, err);
            return true;
        }
    };
    print_sample_summary(label, &samples);
    false
}

fn report_burst(requests: usize, outcome: AppResult<Duration>) -> bool {
    let elapsed = match outcome {
        Ok(elapsed) => elapsed,
        Err(err) => {
            error!("Burst benchmark failed: {}", err);
            return true;
        }
    };
    print_burst_summary(requests, elapsed);
    false
}

/// The name the agent stores an uploaded file under, and therefore the
/// name reads request back.
fn remote_file_name(file: &str) -> String {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
        .to_owned()
}
