//! Access to the task server.
//!
//! Defines the [`TaskApi`] trait the edit session talks through, and
//! [`HttpTaskApi`], its reqwest-backed implementation.

use std::future::Future;
use std::time::Duration;

use taskboard_proto::api::{Reply, parse_reply};
use taskboard_proto::task::{Task, TaskId, TaskPayload};
use url::Url;

/// Errors that can occur while talking to the task server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout,
    /// broken body).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured server URL does not parse.
    #[error("invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server URL parses but cannot carry a path (e.g. `mailto:`).
    #[error("{0} cannot be used as a server URL")]
    UnsupportedUrl(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The server's `message`, or the status text when it sent none.
        message: String,
    },

    /// A success response did not contain the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A raw update response: status and body, not yet interpreted.
///
/// Update replies are read leniently (see [`RawReply::reply`]), so the body
/// is kept as text rather than decoded up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl RawReply {
    /// Returns `true` for the one status the edit flow treats as saved.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Reads the body; a malformed body reads as an empty reply.
    #[must_use]
    pub fn reply(&self) -> Reply {
        parse_reply(&self.body)
    }
}

/// Task server operations used by the client.
pub trait TaskApi: Send + Sync {
    /// Fetches every task.
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, ClientError>> + Send;

    /// Fetches one task by id.
    fn fetch_task(&self, id: &TaskId) -> impl Future<Output = Result<Task, ClientError>> + Send;

    /// Sends an update for one task.
    ///
    /// Any HTTP response, success or not, is returned as `Ok`; only a
    /// request that got no response at all is an `Err`.
    fn update_task(
        &self,
        id: &TaskId,
        payload: &TaskPayload,
    ) -> impl Future<Output = Result<RawReply, ClientError>> + Send;
}

/// [`TaskApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpTaskApi {
    /// Creates a client for the server at `base_url`, with `timeout` applied
    /// to every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::UnsupportedUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Returns the server base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn tasks_url(&self, id: Option<&TaskId>) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::UnsupportedUrl(self.base.to_string()))?;
            segments.pop_if_empty().push("tasks");
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }
}

/// Returns the body of a success response, or the server's message as a
/// [`ClientError::Status`].
async fn success_body(res: reqwest::Response) -> Result<String, ClientError> {
    let status = res.status();
    let body = res.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    let message = parse_reply(&body)
        .message
        .unwrap_or_else(|| status.to_string());
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let url = self.tasks_url(None)?;
        tracing::debug!(%url, "listing tasks");
        let res = self.client.get(url).send().await?;
        Ok(serde_json::from_str(&success_body(res).await?)?)
    }

    async fn fetch_task(&self, id: &TaskId) -> Result<Task, ClientError> {
        let url = self.tasks_url(Some(id))?;
        tracing::debug!(%url, "fetching task");
        let res = self.client.get(url).send().await?;
        Ok(serde_json::from_str(&success_body(res).await?)?)
    }

    async fn update_task(&self, id: &TaskId, payload: &TaskPayload) -> Result<RawReply, ClientError> {
        let url = self.tasks_url(Some(id))?;
        tracing::debug!(%url, "updating task");
        let res = self.client.put(url).json(payload).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(RawReply { status, body })
    }
}
