//! Async client for Bitcoin Core's JSON-RPC and REST interfaces.
//!
//! ```no_run
//! # async fn run() -> Result<(), rpc_bitcoin::ClientError> {
//! use rpc_bitcoin::RpcClient;
//! use rpc_bitcoin::methods::params::GetBalanceParams;
//!
//! let client = RpcClient::builder()
//!     .port(18443)
//!     .user("rpcuser")
//!     .pass("rpcpassword")
//!     .wallet("main")
//!     .build()?;
//!
//! let tip = client.getbestblockhash().await?;
//! let balance = client.getbalance(GetBalanceParams::new(), None).await?;
//! let chain_info = client.rest().chain_info().await?;
//! # let _ = (tip, balance, chain_info);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod methods;
pub mod protocol;
pub mod rest;
pub mod transport;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use client::{FullResponse, ResponseMode, RpcClient, RpcClientBuilder, Unwrapped};
pub use config::RpcConfig;
pub use error::{ClientError, RpcError, ServerError};
pub use methods::{MethodSpec, Scope, METHODS};
pub use protocol::{BatchRequest, BatchResponse, RequestId, RpcRequest, RpcResponse};
pub use rest::{RestBody, RestClient, RestFormat};
pub use transport::{HttpReply, HttpTransport, Transport};
