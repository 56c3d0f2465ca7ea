//! Bitcoin Core REST interface (`-rest`).
//!
//! Every operation templates one path under `/rest/` and issues one GET.
//! Bodies come back as raw bytes in the requested [`RestFormat`]; the daemon
//! does not authenticate REST requests.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bitcoin::{BlockHash, OutPoint, Txid};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::{build_base_url, DEFAULT_PORT, DEFAULT_TIMEOUT, DEFAULT_URL};
use crate::error::{ClientError, RpcError};
use crate::transport::{HttpTransport, Transport};

/// Response encoding, the path suffix after the final `.`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RestFormat {
    #[default]
    Json,
    Hex,
    Bin,
}

impl RestFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Hex => "hex",
            Self::Bin => "bin",
        }
    }
}

impl fmt::Display for RestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw REST reply body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestBody(Vec<u8>);

impl RestBody {
    /// Decode a `json` format body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.0).map_err(|e| {
            RpcError::InvalidResponse(format!("decode REST JSON body: {e}")).into()
        })
    }

    /// Body as text. `hex` bodies end with a newline, which is kept.
    pub fn text(&self) -> Result<&str, ClientError> {
        std::str::from_utf8(&self.0).map_err(|e| {
            RpcError::InvalidResponse(format!("REST body is not UTF-8: {e}")).into()
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

// ==============================================================================
// Query Parameters
// ==============================================================================

/// Arguments of [`RestClient::utxos`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxosParams {
    pub outpoints: Vec<OutPoint>,
    /// Include mempool transactions. Defaults to `true`.
    pub checkmempool: bool,
    pub format: RestFormat,
}

impl UtxosParams {
    pub fn new(outpoints: impl Into<Vec<OutPoint>>) -> Self {
        Self {
            outpoints: outpoints.into(),
            checkmempool: true,
            format: RestFormat::Json,
        }
    }

    pub fn checkmempool(mut self, checkmempool: bool) -> Self {
        self.checkmempool = checkmempool;
        self
    }

    pub fn format(mut self, format: RestFormat) -> Self {
        self.format = format;
        self
    }
}

impl From<OutPoint> for UtxosParams {
    fn from(outpoint: OutPoint) -> Self {
        Self::new(vec![outpoint])
    }
}

/// Arguments of [`RestClient::headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersParams {
    pub hash: BlockHash,
    /// Number of headers upward from `hash`. Defaults to `1`.
    pub count: u32,
    pub format: RestFormat,
}

impl HeadersParams {
    pub fn new(hash: BlockHash) -> Self {
        Self {
            hash,
            count: 1,
            format: RestFormat::Json,
        }
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn format(mut self, format: RestFormat) -> Self {
        self.format = format;
        self
    }
}

// ==============================================================================
// Paths
// ==============================================================================

fn block_path(hash: &BlockHash, format: RestFormat) -> String {
    format!("/rest/block/{hash}.{format}")
}

fn block_notxdetails_path(hash: &BlockHash, format: RestFormat) -> String {
    format!("/rest/block/notxdetails/{hash}.{format}")
}

fn block_hash_by_height_path(height: u64, format: RestFormat) -> String {
    format!("/rest/blockhashbyheight/{height}.{format}")
}

fn utxos_path(params: &UtxosParams) -> String {
    let mut path = String::from("/rest/getutxos");
    if params.checkmempool {
        path.push_str("/checkmempool");
    }
    for outpoint in &params.outpoints {
        path.push_str(&format!("/{}-{}", outpoint.txid, outpoint.vout));
    }
    path.push('.');
    path.push_str(params.format.as_str());
    path
}

fn headers_path(params: &HeadersParams) -> String {
    format!(
        "/rest/headers/{}/{}.{}",
        params.count, params.hash, params.format
    )
}

fn tx_path(txid: &Txid, format: RestFormat) -> String {
    format!("/rest/tx/{txid}.{format}")
}

const CHAIN_INFO_PATH: &str = "/rest/chaininfo.json";
const MEMPOOL_CONTENTS_PATH: &str = "/rest/mempool/contents.json";
const MEMPOOL_INFO_PATH: &str = "/rest/mempool/info.json";

// ==============================================================================
// RestClient
// ==============================================================================

/// Client for the daemon's REST endpoints.
///
/// Obtain one from [`RpcClient::rest`](crate::RpcClient::rest) to share the
/// RPC client's connection pool, or build one standalone.
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
}

impl RestClient {
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Block with full transaction details.
    pub async fn block(
        &self,
        hash: &BlockHash,
        format: RestFormat,
    ) -> Result<RestBody, ClientError> {
        self.get(&block_path(hash, format)).await
    }

    /// Block with txids only.
    pub async fn block_notxdetails(
        &self,
        hash: &BlockHash,
        format: RestFormat,
    ) -> Result<RestBody, ClientError> {
        self.get(&block_notxdetails_path(hash, format)).await
    }

    pub async fn block_hash_by_height(
        &self,
        height: u64,
        format: RestFormat,
    ) -> Result<RestBody, ClientError> {
        self.get(&block_hash_by_height_path(height, format)).await
    }

    /// Always JSON.
    pub async fn chain_info(&self) -> Result<RestBody, ClientError> {
        self.get(CHAIN_INFO_PATH).await
    }

    /// UTXO set lookup for the given outpoints. An empty list is sent as-is
    /// and rejected by the daemon.
    pub async fn utxos(&self, params: impl Into<UtxosParams>) -> Result<RestBody, ClientError> {
        self.get(&utxos_path(&params.into())).await
    }

    pub async fn headers(&self, params: HeadersParams) -> Result<RestBody, ClientError> {
        self.get(&headers_path(&params)).await
    }

    /// Always JSON.
    pub async fn mempool_contents(&self) -> Result<RestBody, ClientError> {
        self.get(MEMPOOL_CONTENTS_PATH).await
    }

    /// Always JSON.
    pub async fn mempool_info(&self) -> Result<RestBody, ClientError> {
        self.get(MEMPOOL_INFO_PATH).await
    }

    pub async fn tx(&self, txid: &Txid, format: RestFormat) -> Result<RestBody, ClientError> {
        self.get(&tx_path(txid, format)).await
    }

    async fn get(&self, path: &str) -> Result<RestBody, ClientError> {
        debug!(rest.path = path, "rest get");
        let reply = self.transport.get(path).await?;
        debug!(
            rest.path = path,
            status = %reply.status,
            body_len = reply.body.len(),
            "rest response"
        );

        if !reply.is_success() {
            trace!(rest.path = path, body = %reply.body_text(), "rest error body");
            return Err(RpcError::HttpStatus {
                status: reply.status.as_u16(),
                body: reply.body_text(),
            }
            .into());
        }
        Ok(RestBody(reply.body))
    }
}

pub struct RestClientBuilder {
    url: String,
    port: u16,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            transport: None,
        }
    }
}

impl RestClientBuilder {
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

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<RestClient, ClientError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let base_url = build_base_url(&self.url, self.port)?;
                Arc::new(HttpTransport::new(&base_url, None, self.timeout)?)
            }
        };
        Ok(RestClient::from_transport(transport))
    }
}
