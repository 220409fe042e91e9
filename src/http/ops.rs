use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

use crate::bench::Operation;
use crate::error::{AppError, AppResult, HttpError};

/// Multipart field name the agent expects for uploads.
const WRITE_FIELD: &str = "benchmark_write";

pub(crate) fn agent_url(host: &str, port: u16, route: &str) -> AppResult<Url> {
    let raw = format!("http://{}:{}{}", host, port, route);
    Url::parse(&raw).map_err(move |err| {
        AppError::http(HttpError::InvalidUrl {
            url: raw,
            source: err,
        })
    })
}

/// Uploads one file per invocation via multipart `POST /write`.
///
/// The payload is read from disk once at construction; every invocation
/// rebuilds the multipart form from the cached bytes, so no local I/O
/// lands inside the measured interval.
pub struct WriteOperation {
    client: Client,
    url: Url,
    file_name: String,
    payload: Vec<u8>,
}

impl WriteOperation {
    /// # Errors
    ///
    /// Fails when the endpoint URL is invalid or the payload file cannot
    /// be read.
    pub fn new(client: Client, host: &str, port: u16, payload_path: &Path) -> AppResult<Self> {
        let url = agent_url(host, port, "/write")?;
        let payload = std::fs::read(payload_path).map_err(|err| {
            AppError::http(HttpError::ReadPayloadFile {
                path: payload_path.to_path_buf(),
                source: err,
            })
        })?;
        let file_name = file_name_of(payload_path);
        Ok(Self {
            client,
            url,
            file_name,
            payload,
        })
    }

    #[must_use]
    pub const fn target_url(&self) -> &Url {
        &self.url
    }

    fn form(&self) -> Form {
        let part = Part::bytes(self.payload.clone()).file_name(self.file_name.clone());
        Form::new().part(WRITE_FIELD, part)
    }
}

#[async_trait]
impl Operation for WriteOperation {
    async fn invoke(&self) -> AppResult<()> {
        let response = self
            .client
            .post(self.url.clone())
            .multipart(self.form())
            .send()
            .await
            .map_err(|err| AppError::http(HttpError::RequestFailed { source: err }))?;
        check_and_drain(response, "/write").await
    }
}

/// Fetches a stored file per invocation via `GET /read`, streaming the
/// whole body so the measured interval covers the full transfer.
pub struct ReadOperation {
    client: Client,
    url: Url,
}

impl ReadOperation {
    /// # Errors
    ///
    /// Fails when the endpoint URL is invalid.
    pub fn new(client: Client, host: &str, port: u16, filepath: &str) -> AppResult<Self> {
        let mut url = agent_url(host, port, "/read")?;
        url.query_pairs_mut().append_pair("filepath", filepath);
        Ok(Self { client, url })
    }

    #[must_use]
    pub const fn target_url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Operation for ReadOperation {
    async fn invoke(&self) -> AppResult<()> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| AppError::http(HttpError::RequestFailed { source: err }))?;
        check_and_drain(response, "/read").await
    }
}

async fn check_and_drain(response: reqwest::Response, route: &'static str) -> AppResult<()> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::http(HttpError::UnexpectedStatus {
            status: status.as_u16(),
            route,
        }));
    }
    let _drained = drain_response_body(response).await?;
    Ok(())
}

async fn drain_response_body(response: reqwest::Response) -> AppResult<u64> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes =
            chunk.map_err(|err| AppError::http(HttpError::ReadBodyFailed { source: err }))?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("file")
        .to_owned()
}
