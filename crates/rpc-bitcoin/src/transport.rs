//! HTTP transport seam shared by the JSON-RPC dispatcher and the REST
//! accessor.
//!
//! [`HttpTransport`] is the `reqwest` implementation. Anything else that can
//! POST a JSON body and GET a path (a proxy, a test double) can implement
//! [`Transport`] and be injected through the client builders.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use tracing::{debug, trace};

use crate::error::{ClientError, RpcError};

/// Status and raw body of one HTTP exchange. Non-2xx statuses are not errors
/// at this layer; callers decide what a status means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, lossily decoded, for error messages.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Minimal HTTP surface the clients need.
///
/// Implementations own authentication, timeouts and connection reuse.
/// `path` always starts with `/` and is relative to the daemon's base URL.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as `application/json` to `path`.
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpReply, RpcError>;

    /// GET `path`.
    async fn get(&self, path: &str) -> Result<HttpReply, RpcError>;
}

// ==============================================================================
// HttpTransport: reqwest with basic auth
// ==============================================================================

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth: Option<(String, String)>,
}

impl HttpTransport {
    /// `base_url` is `scheme://host:port` without a trailing slash.
    pub fn new(
        base_url: &str,
        auth: Option<(String, String)>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .pool_max_idle_per_host(32)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ClientError::Config(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth {
            Some((ref user, ref pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<HttpReply, RpcError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpReply, RpcError> {
        let builder = self
            .client
            .post(self.url(path))
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);
        let reply = self.send(builder).await?;
        debug!(http.path = path, status = %reply.status, body_len = reply.body.len(), "http post");
        trace!(http.path = path, body = %reply.body_text(), "http post body");
        Ok(reply)
    }

    async fn get(&self, path: &str) -> Result<HttpReply, RpcError> {
        let reply = self.send(self.client.get(self.url(path))).await?;
        debug!(http.path = path, status = %reply.status, body_len = reply.body.len(), "http get");
        Ok(reply)
    }
}
