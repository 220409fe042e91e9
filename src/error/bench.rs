use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Mixed burst requires at least one job.")]
    JobListEmpty,
    #[error("Operation timed out after {limit:?}.")]
    OperationTimedOut { limit: Duration },
    #[error("Concurrency limiter closed: {source}")]
    LimiterClosed {
        #[source]
        source: tokio::sync::AcquireError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
}
