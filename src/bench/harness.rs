use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::args::PositiveUsize;
use crate::error::{AppError, AppResult, BenchError};

use super::job::{Job, Operation};

/// Optional limits applied to every strategy. The defaults preserve the
/// plain benchmarking behavior: one execution unit per requested call and
/// no cap on how long a single invocation may run.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarnessOptions {
    /// Abort a single invocation once it has run this long.
    pub invocation_timeout: Option<Duration>,
    /// Cap on simultaneously active execution units within a batch.
    pub max_in_flight: Option<PositiveUsize>,
}

/// Times an opaque [`Operation`] under three execution disciplines.
///
/// All measurements use [`tokio::time::Instant`], a monotonic clock, so
/// samples can never go negative or be skewed by wall-clock adjustments.
pub struct Harness {
    options: HarnessOptions,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: HarnessOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(options: HarnessOptions) -> Self {
        Self { options }
    }

    /// Invokes the operation `trials` times back to back and records each
    /// invocation's wall-clock latency, in invocation order.
    ///
    /// # Errors
    ///
    /// The first failing invocation aborts the run and propagates its
    /// error; latencies recorded before the failure are dropped with it.
    pub async fn run_sequential<O>(
        &self,
        trials: PositiveUsize,
        operation: &O,
    ) -> AppResult<Vec<Duration>>
    where
        O: Operation + ?Sized,
    {
        let mut samples = Vec::with_capacity(trials.get());
        for _ in 0..trials.get() {
            let started = Instant::now();
            invoke_with_limit(operation, self.options.invocation_timeout).await?;
            samples.push(started.elapsed());
        }
        Ok(samples)
    }

    /// Launches `burst` execution units as one batch and measures the
    /// wall-clock time from first launch until the last unit completes.
    ///
    /// The result is a throughput measurement of draining the whole burst,
    /// not a per-call latency; completion order within the burst is
    /// unspecified and never reported.
    ///
    /// # Errors
    ///
    /// Every unit is joined before any failure is surfaced, so a failing
    /// unit never leaves the rest of the burst unawaited. When several
    /// units fail, the earliest-launched failure is returned and the rest
    /// are logged at debug level. A panicking unit surfaces as a join
    /// error.
    pub async fn run_concurrent_burst(
        &self,
        burst: PositiveUsize,
        operation: &Arc<dyn Operation>,
    ) -> AppResult<Duration> {
        let permits = self.limiter();
        let mut units = Vec::with_capacity(burst.get());
        let started = Instant::now();
        for _ in 0..burst.get() {
            units.push(self.launch_unit(Arc::clone(operation), permits.clone()));
        }
        let failure = join_units(units).await;
        let elapsed = started.elapsed();
        failure.map_or_else(|| Ok(elapsed), Err)
    }

    /// Repeats a heterogeneous batch `trials` times: each repetition
    /// launches one execution unit per job in descriptor order, joins them
    /// all, and records one duration for the whole batch.
    ///
    /// Batch durations are wall-clock elapsed time. Scheduled-time
    /// accounting is not portable across async runtimes, so the harness
    /// does not attempt it; a batch that spends its life blocked on the
    /// network still accrues elapsed time.
    ///
    /// # Errors
    ///
    /// Rejects an empty job list. A failing unit is surfaced after its
    /// batch is fully joined and aborts the remaining repetitions;
    /// durations of earlier repetitions are dropped with it.
    pub async fn run_concurrent_mixed(
        &self,
        trials: PositiveUsize,
        jobs: &[Job],
    ) -> AppResult<Vec<Duration>> {
        if jobs.is_empty() {
            return Err(AppError::bench(BenchError::JobListEmpty));
        }
        let mut samples = Vec::with_capacity(trials.get());
        for _ in 0..trials.get() {
            let permits = self.limiter();
            let mut units = Vec::with_capacity(jobs.len());
            let started = Instant::now();
            for job in jobs {
                units.push(self.launch_unit(Arc::clone(&job.operation), permits.clone()));
            }
            let failure = join_units(units).await;
            let elapsed = started.elapsed();
            if let Some(err) = failure {
                return Err(err);
            }
            samples.push(elapsed);
        }
        Ok(samples)
    }

    fn limiter(&self) -> Option<Arc<Semaphore>> {
        self.options
            .max_in_flight
            .map(|cap| Arc::new(Semaphore::new(cap.get())))
    }

    fn launch_unit(
        &self,
        operation: Arc<dyn Operation>,
        permits: Option<Arc<Semaphore>>,
    ) -> JoinHandle<AppResult<()>> {
        let limit = self.options.invocation_timeout;
        tokio::spawn(async move {
            let _permit = match permits {
                Some(semaphore) => Some(semaphore.acquire_owned().await.map_err(|err| {
                    AppError::bench(BenchError::LimiterClosed { source: err })
                })?),
                None => None,
            };
            invoke_with_limit(operation.as_ref(), limit).await
        })
    }
}

async fn invoke_with_limit<O>(operation: &O, limit: Option<Duration>) -> AppResult<()>
where
    O: Operation + ?Sized,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, operation.invoke())
            .await
            .map_err(|_elapsed| AppError::bench(BenchError::OperationTimedOut { limit }))?,
        None => operation.invoke().await,
    }
}

/// Joins every unit of a batch, then reports the earliest-launched failure
/// if any unit failed. Each unit owns its result slot; nothing is merged
/// until the whole batch has been joined.
async fn join_units(units: Vec<JoinHandle<AppResult<()>>>) -> Option<AppError> {
    let mut first_failure = None;
    for unit in units {
        let unit_result = match unit.await {
            Ok(result) => result,
            Err(join_err) => Err(AppError::from(join_err)),
        };
        if let Err(err) = unit_result {
            if first_failure.is_none() {
                first_failure = Some(err);
            } else {
                debug!("Additional unit failure after the first: {}", err);
            }
        }
    }
    first_failure
}
