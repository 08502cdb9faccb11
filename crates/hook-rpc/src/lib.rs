// hook-rpc/src/lib.rs
pub mod client;
pub mod types;

pub use client::{HttpLedgerClient, LedgerClient};
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP status {0}")]
    Http(u16),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Ledger error [{error}]: {message}")]
    Ledger { error: String, message: String },
}

impl RpcError {
    pub fn code(&self) -> i32 {
        match self {
            RpcError::Transport(_) => -32000,
            RpcError::Timeout => -32001,
            RpcError::Http(_) => -32002,
            RpcError::InvalidResponse(_) => -32700,
            RpcError::Ledger { .. } => -32603,
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RpcError::Timeout
        } else if err.is_decode() {
            RpcError::InvalidResponse(err.to_string())
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}

pub type RpcResult<T> = Result<T, RpcError>;
