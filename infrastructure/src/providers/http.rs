//! Shared request plumbing for the HTTP adapters

use dxo_application::BackendErrorKind;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Map a transport failure. The URL is stripped so query strings never
/// reach the logs.
pub(crate) fn send_error(err: reqwest::Error, timeout: Duration) -> BackendErrorKind {
    if err.is_timeout() {
        BackendErrorKind::Timeout(timeout)
    } else {
        BackendErrorKind::Connection(err.without_url().to_string())
    }
}

/// Check the status line, then decode the body
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    timeout: Duration,
) -> Result<T, BackendErrorKind> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendErrorKind::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| send_error(e, timeout))?;
    serde_json::from_str(&body).map_err(|e| BackendErrorKind::MalformedResponse(e.to_string()))
}

/// Reject empty completions
pub(crate) fn non_empty(text: String, what: &str) -> Result<String, BackendErrorKind> {
    if text.trim().is_empty() {
        Err(BackendErrorKind::MalformedResponse(format!("no {what} in response")))
    } else {
        Ok(text)
    }
}
