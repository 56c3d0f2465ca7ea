//! JSON-RPC dispatcher.
//!
//! [`RpcClient`] turns a method name, a parameter object and an optional
//! wallet into exactly one HTTP POST and turns the reply into a value or an
//! error. The response mode is a type parameter: [`Unwrapped`] returns the
//! `result` member and fails with the daemon's `{code, message}`;
//! [`FullResponse`] returns and fails with the whole envelope.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{
    build_base_url, resolve_auth, RpcConfig, DEFAULT_PORT, DEFAULT_REQUEST_ID, DEFAULT_TIMEOUT,
    DEFAULT_URL,
};
use crate::error::{ClientError, RpcError};
use crate::methods::{find_method, Scope};
use crate::protocol::{
    decode_batch, decode_envelope, parse_server_error, BatchRequest, BatchResponse, RequestId,
    RpcRequest, RpcResponse, JSONRPC_VERSION,
};
use crate::rest::RestClient;
use crate::transport::{HttpReply, HttpTransport, Transport};

// ==============================================================================
// Response Modes
// ==============================================================================

/// How a decoded envelope is handed back to the caller.
pub trait ResponseMode: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Envelope whose `error` member is null or absent.
    fn success(envelope: RpcResponse) -> Self::Output;

    /// Envelope carrying an `error` member.
    fn failure(envelope: RpcResponse) -> RpcError;
}

/// Return `result`; fail with [`RpcError::Server`].
#[derive(Debug)]
pub enum Unwrapped {}

/// Return the whole envelope; fail with [`RpcError::Envelope`].
#[derive(Debug)]
pub enum FullResponse {}

impl ResponseMode for Unwrapped {
    type Output = Value;

    fn success(envelope: RpcResponse) -> Value {
        envelope.result
    }

    fn failure(envelope: RpcResponse) -> RpcError {
        match envelope.error {
            Some(err) => parse_server_error(err),
            None => RpcError::InvalidResponse("error envelope without error member".to_owned()),
        }
    }
}

impl ResponseMode for FullResponse {
    type Output = RpcResponse;

    fn success(envelope: RpcResponse) -> RpcResponse {
        envelope
    }

    fn failure(envelope: RpcResponse) -> RpcError {
        RpcError::Envelope(Box::new(envelope))
    }
}

// ==============================================================================
// RpcClient
// ==============================================================================

/// Bitcoin Core JSON-RPC client.
///
/// Cloning is cheap; clones share the transport and configuration. The
/// client holds no mutable state, so calls may run concurrently.
pub struct RpcClient<M: ResponseMode = Unwrapped> {
    transport: Arc<dyn Transport>,
    config: Arc<RpcConfig>,
    mode: PhantomData<fn() -> M>,
}

impl<M: ResponseMode> Clone for RpcClient<M> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            mode: PhantomData,
        }
    }
}

impl RpcClient<Unwrapped> {
    pub fn builder() -> RpcClientBuilder<Unwrapped> {
        RpcClientBuilder::default()
    }

    /// `call`, then decode `result` into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        params: impl Serialize,
        wallet: Option<&str>,
    ) -> Result<T, ClientError> {
        let result = self.call(method, params, wallet).await?;
        serde_json::from_value(result).map_err(|e| {
            RpcError::InvalidResponse(format!("unexpected {method} result: {e}")).into()
        })
    }
}

impl<M: ResponseMode> RpcClient<M> {
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// REST accessor sharing this client's transport.
    pub fn rest(&self) -> RestClient {
        RestClient::from_transport(Arc::clone(&self.transport))
    }

    /// Explicit wallet, else the configured default. `Some("")` is explicit
    /// and routes to `/`.
    pub fn resolve_wallet<'a>(&'a self, wallet: Option<&'a str>) -> Option<&'a str> {
        wallet.or(self.config.wallet())
    }

    /// Issue one JSON-RPC call.
    ///
    /// `params` must serialize to a JSON object (named arguments) or array
    /// (positional arguments). The call is routed to `/wallet/<wallet>` when
    /// `wallet` is set and to `/` otherwise; no default-wallet fallback is
    /// applied here.
    pub async fn call(
        &self,
        method: &str,
        params: impl Serialize,
        wallet: Option<&str>,
    ) -> Result<M::Output, ClientError> {
        let params = encode_params(method, params)?;
        let path = wallet_path(wallet)?;
        let request = RpcRequest::new(method)
            .params(params)
            .jsonrpc(Value::from(JSONRPC_VERSION))
            .id(self.config.request_id.clone());
        let body = serde_json::to_value(&request)
            .map_err(|e| ClientError::InvalidParams(format!("{method}: {e}")))?;

        debug!(
            rpc.id = %self.config.request_id,
            rpc.method = method,
            rpc.path = %path,
            "rpc call"
        );
        let reply = self.transport.post_json(&path, &body).await?;
        debug!(
            rpc.method = method,
            status = %reply.status,
            body_len = reply.body.len(),
            "rpc response"
        );
        trace!(rpc.method = method, body = %reply.body_text(), "rpc response body");

        let envelope = decode_envelope(&reply.body)
            .ok_or_else(|| unexpected_reply(&reply, "JSON-RPC response"))?;
        if envelope.is_error() {
            return Err(M::failure(envelope).into());
        }
        Ok(M::success(envelope))
    }

    /// Like [`call`](Self::call), but applies the default-wallet fallback
    /// when `method` is a wallet-scoped entry of [`METHODS`](crate::METHODS)
    /// and `params` do not carry a `wallet_name` of their own.
    pub async fn invoke(
        &self,
        method: &str,
        params: impl Serialize,
        wallet: Option<&str>,
    ) -> Result<M::Output, ClientError> {
        match find_method(method) {
            Some(spec) if spec.scope == Scope::Wallet => {
                self.call_wallet(method, params, wallet).await
            }
            _ => self.call(method, params, wallet).await,
        }
    }

    /// Wallet-scoped call: `wallet`, else the default wallet, unless the
    /// params name their target through `wallet_name`.
    pub(crate) async fn call_wallet(
        &self,
        method: &str,
        params: impl Serialize,
        wallet: Option<&str>,
    ) -> Result<M::Output, ClientError> {
        let params = encode_params(method, params)?;
        let wallet = if names_wallet(&params) {
            wallet
        } else {
            self.resolve_wallet(wallet)
        };
        self.call(method, params, wallet).await
    }

    /// Post one envelope or a list of envelopes exactly as given.
    ///
    /// Ids are neither assigned nor checked, and the reply is returned in
    /// server order without unwrapping; correlate by id on the way back.
    pub async fn batch(
        &self,
        body: impl Into<BatchRequest>,
        wallet: Option<&str>,
    ) -> Result<BatchResponse, ClientError> {
        let body = body.into();
        let path = wallet_path(wallet)?;
        let batch_size = match &body {
            BatchRequest::Single(_) => 1,
            BatchRequest::Many(requests) => requests.len(),
        };
        let payload = serde_json::to_value(&body)
            .map_err(|e| ClientError::InvalidParams(format!("batch: {e}")))?;

        debug!(rpc.batch_size = batch_size, rpc.path = %path, "rpc batch call");
        let reply = self.transport.post_json(&path, &payload).await?;
        debug!(
            rpc.batch_size = batch_size,
            status = %reply.status,
            body_len = reply.body.len(),
            "rpc batch response"
        );
        trace!(body = %reply.body_text(), "rpc batch response body");

        decode_batch(&reply.body)
            .ok_or_else(|| unexpected_reply(&reply, "JSON-RPC batch response").into())
    }
}

/// `/wallet/<name>` with `name` percent-encoded as a single path segment, or
/// `/` for no wallet.
fn wallet_path(wallet: Option<&str>) -> Result<String, ClientError> {
    let name = match wallet {
        Some(name) if !name.is_empty() => name,
        _ => return Ok("/".to_owned()),
    };
    let invalid =
        || ClientError::InvalidParams(format!("wallet name `{name}` is not a path segment"));

    let mut url = Url::parse("http://localhost/").map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|()| invalid())?
        .clear()
        .push("wallet")
        .push(name);
    Ok(url.path().to_owned())
}

/// Params that name their own target wallet (`unloadwallet`'s `wallet_name`)
/// opt out of the default-wallet fallback.
fn names_wallet(params: &Value) -> bool {
    params
        .get("wallet_name")
        .is_some_and(|name| !name.is_null())
}

fn encode_params(method: &str, params: impl Serialize) -> Result<Value, ClientError> {
    let value = serde_json::to_value(params)
        .map_err(|e| ClientError::InvalidParams(format!("{method}: {e}")))?;
    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        other => Err(ClientError::InvalidParams(format!(
            "{method}: params must be a JSON object or array, got {other}"
        ))),
    }
}

/// Body that is not the expected envelope: a non-2xx status wins over a
/// decoding complaint.
fn unexpected_reply(reply: &HttpReply, what: &str) -> RpcError {
    if reply.is_success() {
        RpcError::InvalidResponse(format!("decode {what}: body={}", reply.body_text()))
    } else {
        RpcError::HttpStatus {
            status: reply.status.as_u16(),
            body: reply.body_text(),
        }
    }
}

// ==============================================================================
// Builder
// ==============================================================================

pub struct RpcClientBuilder<M: ResponseMode = Unwrapped> {
    url: String,
    port: u16,
    timeout: Duration,
    user: Option<String>,
    pass: Option<String>,
    cookie_file: Option<PathBuf>,
    wallet: Option<String>,
    request_id: RequestId,
    transport: Option<Arc<dyn Transport>>,
    mode: PhantomData<fn() -> M>,
}

impl Default for RpcClientBuilder<Unwrapped> {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            user: None,
            pass: None,
            cookie_file: None,
            wallet: None,
            request_id: RequestId::from(DEFAULT_REQUEST_ID),
            transport: None,
            mode: PhantomData,
        }
    }
}

impl<M: ResponseMode> RpcClientBuilder<M> {
    /// Scheme and host, e.g. `http://localhost`. The port is set separately.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = Some(pass.into());
        self
    }

    /// Bitcoin Core `.cookie` file, used when no password is set.
    pub fn cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    /// Default wallet for wallet-scoped methods.
    pub fn wallet(mut self, wallet: impl Into<String>) -> Self {
        self.wallet = Some(wallet.into());
        self
    }

    pub fn request_id(mut self, id: impl Into<RequestId>) -> Self {
        self.request_id = id.into();
        self
    }

    /// Use `transport` instead of building an [`HttpTransport`]. Credentials
    /// and timeout are then the transport's business.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Return and fail with whole response envelopes.
    pub fn full_response(self) -> RpcClientBuilder<FullResponse> {
        self.into_mode()
    }

    /// Return `result` and fail with the daemon's error object (the default).
    pub fn unwrapped(self) -> RpcClientBuilder<Unwrapped> {
        self.into_mode()
    }

    fn into_mode<N: ResponseMode>(self) -> RpcClientBuilder<N> {
        RpcClientBuilder {
            url: self.url,
            port: self.port,
            timeout: self.timeout,
            user: self.user,
            pass: self.pass,
            cookie_file: self.cookie_file,
            wallet: self.wallet,
            request_id: self.request_id,
            transport: self.transport,
            mode: PhantomData,
        }
    }

    pub fn build(self) -> Result<RpcClient<M>, ClientError> {
        let auth = resolve_auth(
            self.user.as_deref(),
            self.pass.as_deref(),
            self.cookie_file.as_deref(),
        )?;
        let base_url = build_base_url(&self.url, self.port)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&base_url, auth.clone(), self.timeout)?),
        };

        let config = RpcConfig {
            base_url,
            timeout: self.timeout,
            auth,
            wallet: self.wallet.filter(|w| !w.is_empty()),
            request_id: self.request_id,
        };

        Ok(RpcClient {
            transport,
            config: Arc::new(config),
            mode: PhantomData,
        })
    }
}
