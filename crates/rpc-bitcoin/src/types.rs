//! Decoded shapes for a few common results.
//!
//! Most wrappers return the daemon's JSON as-is. These structs cover the
//! results callers most often decode with [`RpcClient::call_as`] or
//! [`RestBody::json`].
//!
//! [`RpcClient::call_as`]: crate::RpcClient::call_as
//! [`RestBody::json`]: crate::rest::RestBody::json

use bitcoin::BlockHash;
use serde::Deserialize;

// ==============================================================================
// Chain Info
// ==============================================================================

/// Basic chain information from `getblockchaininfo` or `/rest/chaininfo.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainInfo {
    pub chain: String,
    pub blocks: u64,
    pub headers: u64,
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: BlockHash,
    pub difficulty: f64,
    pub pruned: bool,
    #[serde(default, rename = "initialblockdownload")]
    pub initial_block_download: Option<bool>,
}

// ==============================================================================
// Mempool Info
// ==============================================================================

/// From `getmempoolinfo` or `/rest/mempool/info.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct MempoolInfo {
    #[serde(default)]
    pub loaded: Option<bool>,
    pub size: u64,
    pub bytes: u64,
    pub usage: u64,
    #[serde(rename = "maxmempool")]
    pub max_mempool: u64,
    /// BTC/kvB.
    #[serde(rename = "mempoolminfee")]
    pub mempool_min_fee: f64,
    /// BTC/kvB.
    #[serde(rename = "minrelaytxfee")]
    pub min_relay_tx_fee: f64,
}
