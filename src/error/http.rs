use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to read payload file '{path}': {source}")]
    ReadPayloadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request failed: {source}")]
    RequestFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {source}")]
    ReadBodyFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected status {status} from {route}.")]
    UnexpectedStatus { status: u16, route: &'static str },
}
