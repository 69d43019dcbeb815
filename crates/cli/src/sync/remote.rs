// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST backend abstraction.
//!
//! Provides a trait-based remote layer that enables:
//! - Real HTTP calls for production ([`HttpRemote`])
//! - Mock remotes for unit testing
//!
//! Every failure is a [`RemoteError`], classified as transient (retry on a
//! later trigger) or permanent (retrying the same request cannot succeed).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use fk_core::{
    CorrectiveRequest, NewVacationRequest, Ticket, VacationRequestDto, VacationStatus,
    WorkOrderAck,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;

/// Characters left as-is in an id used as a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Error type for remote operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Connection could not be established or broke mid-request.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Non-2xx response.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response whose body could not be read.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The server answered `false` to an update.
    #[error("server declined the update: {0}")]
    Declined(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RemoteError {
    /// Returns true if retrying the same request cannot succeed.
    ///
    /// 4xx responses are permanent, except 408 and 429 which ask the client
    /// to come back later.
    pub fn is_permanent(&self) -> bool {
        match self {
            RemoteError::Status { status, .. } => {
                (400..500).contains(status) && *status != 408 && *status != 429
            }
            RemoteError::Declined(_) | RemoteError::InvalidRequest(_) => true,
            RemoteError::Network(_) | RemoteError::Timeout | RemoteError::Decode(_) => false,
        }
    }

    /// Returns true if a later retry may succeed.
    pub fn is_transient(&self) -> bool {
        !self.is_permanent()
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`Remote`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// The backend operations the sync core depends on.
pub trait Remote: Send + Sync {
    /// Creates a corrective work order. `None` when the server sends no body.
    fn create_corrective<'a>(
        &'a self,
        request: &'a CorrectiveRequest,
    ) -> RemoteFuture<'a, Option<WorkOrderAck>>;

    /// Creates a vacation request. `None` when the server sends no body.
    fn create_vacation_request<'a>(
        &'a self,
        request: &'a NewVacationRequest,
    ) -> RemoteFuture<'a, Option<VacationRequestDto>>;

    /// Changes the status of a server-known vacation request.
    fn set_vacation_status<'a>(
        &'a self,
        id: &'a str,
        status: VacationStatus,
    ) -> RemoteFuture<'a, Option<VacationRequestDto>>;

    /// Fetches every ticket assigned to the operator.
    fn list_tickets<'a>(&'a self, operator_id: &'a str) -> RemoteFuture<'a, Vec<Ticket>>;

    /// Cheap reachability check. Any HTTP answer proves connectivity.
    fn health(&self) -> RemoteFuture<'_, ()>;
}

/// HTTP implementation of [`Remote`] using reqwest.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    health_path: String,
}

impl HttpRemote {
    /// Builds a client with the configured timeout and credentials.
    pub fn new(config: &ApiConfig) -> RemoteResult<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;

        Ok(HttpRemote {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            health_path: config.health_path.clone(),
        })
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl Remote for HttpRemote {
    fn create_corrective<'a>(
        &'a self,
        request: &'a CorrectiveRequest,
    ) -> RemoteFuture<'a, Option<WorkOrderAck>> {
        Box::pin(async move {
            let builder = self
                .request(Method::POST, "work-orders/corrective")
                .json(request);
            let response = send(builder).await?;
            Ok(optional_json(response).await)
        })
    }

    fn create_vacation_request<'a>(
        &'a self,
        request: &'a NewVacationRequest,
    ) -> RemoteFuture<'a, Option<VacationRequestDto>> {
        Box::pin(async move {
            let builder = self.request(Method::POST, "vacation-requests").json(request);
            let response = send(builder).await?;
            Ok(optional_json(response).await)
        })
    }

    fn set_vacation_status<'a>(
        &'a self,
        id: &'a str,
        status: VacationStatus,
    ) -> RemoteFuture<'a, Option<VacationRequestDto>> {
        Box::pin(async move {
            let path = format!(
                "vacation-requests/{}/status",
                utf8_percent_encode(id, PATH_SEGMENT)
            );
            let builder = self
                .request(Method::PUT, &path)
                .json(&serde_json::json!({ "status": status }));
            let response = send(builder).await?;

            let value: Option<serde_json::Value> = optional_json(response).await;
            match value {
                Some(serde_json::Value::Bool(false)) => Err(RemoteError::Declined(format!(
                    "status change of {} to {}",
                    id, status
                ))),
                Some(serde_json::Value::Bool(true)) | None => Ok(None),
                Some(other) => Ok(serde_json::from_value(other).ok()),
            }
        })
    }

    fn list_tickets<'a>(&'a self, operator_id: &'a str) -> RemoteFuture<'a, Vec<Ticket>> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, "tickets")
                .query(&[("operatorId", operator_id)]);
            let response = send(builder).await?;
            response
                .json::<Vec<Ticket>>()
                .await
                .map_err(|e| RemoteError::Decode(e.to_string()))
        })
    }

    fn health(&self) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            send(self.request(Method::GET, &self.health_path)).await?;
            Ok(())
        })
    }
}

/// Sends a request, mapping transport failures and non-2xx statuses.
async fn send(builder: RequestBuilder) -> RemoteResult<Response> {
    let response = builder.send().await.map_err(map_reqwest)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body: truncate(&body, 512),
    })
}

/// Reads an optional JSON body from a successful response.
///
/// The server already accepted the request, so an empty or unexpected body
/// is logged and treated as "no body" rather than a failure that would
/// replay the mutation.
async fn optional_json<T: DeserializeOwned>(response: Response) -> Option<T> {
    if response.status() == StatusCode::NO_CONTENT {
        return None;
    }
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read response body");
            return None;
        }
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unexpected response body");
            None
        }
    }
}

fn map_reqwest(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else if e.is_builder() {
        RemoteError::InvalidRequest(e.to_string())
    } else {
        RemoteError::Network(e.to_string())
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
