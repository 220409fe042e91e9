use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;

/// A unit of work submitted to the harness.
///
/// The harness only invokes the operation and measures elapsed time;
/// results are discarded and failures propagate to the harness caller.
/// Whatever arguments the operation needs are captured by the implementing
/// type at construction.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Performs one invocation.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying work; the harness propagates it
    /// without retrying.
    async fn invoke(&self) -> AppResult<()>;
}

/// One task within a mixed burst: an operation plus the label reports use.
#[derive(Clone)]
pub struct Job {
    pub name: String,
    pub operation: Arc<dyn Operation>,
}

impl Job {
    #[must_use]
    pub fn new(name: &str, operation: Arc<dyn Operation>) -> Self {
        Self {
            name: name.to_owned(),
            operation,
        }
    }
}
