use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, AppResult, HttpError};

const DEFAULT_USER_AGENT: &str = concat!("dfsbench/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by every benchmark operation.
///
/// # Errors
///
/// Returns an error when the underlying client cannot be constructed.
pub fn build_client(request_timeout: Duration, connect_timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
