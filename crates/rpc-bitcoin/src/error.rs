use crate::protocol::RpcResponse;

/// An error reported by the daemon inside a JSON-RPC envelope.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ServerError {
    pub code: i64,
    pub message: String,
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code {}: {}", self.code, self.message)
    }
}

/// Failures on the wire: transport, HTTP status and JSON-RPC level.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("RPC server error {0}")]
    Server(ServerError),

    #[error("RPC server error envelope: {}", envelope_summary(.0))]
    Envelope(Box<RpcResponse>),

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("invalid RPC parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl ClientError {
    /// The daemon's `{code, message}` when this is an unwrapped server error.
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            ClientError::Rpc(RpcError::Server(err)) => Some(err),
            _ => None,
        }
    }

    /// The full response envelope when the client runs in full-response mode.
    pub fn envelope(&self) -> Option<&RpcResponse> {
        match self {
            ClientError::Rpc(RpcError::Envelope(envelope)) => Some(&**envelope),
            _ => None,
        }
    }
}

fn envelope_summary(envelope: &RpcResponse) -> String {
    match &envelope.error {
        Some(err) => format!("{err} (id {})", envelope.id_display()),
        None => format!("no error member (id {})", envelope.id_display()),
    }
}
