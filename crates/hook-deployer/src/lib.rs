// hook-deployer/src/lib.rs

//! Hook lifecycle orchestration
//!
//! Wires the assembler, a signer and a ledger client into the deploy and
//! delete pipelines, classifies what the ledger answers and records the result
//! in an explicit application state.

pub mod classifier;
pub mod config;
pub mod orchestrator;
pub mod state;

pub use classifier::{Classification, Operation, Outcome, ResultClassifier};
pub use config::DeployerConfig;
pub use orchestrator::{HookDeployer, OperationReport, SkipReason, Stage};
pub use state::{AppState, DeployLogEntry, LoadingGuard, LogKind};

pub type DeployResult<T> = Result<T, DeployError>;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hook error: {0}")]
    Hook(#[from] hook_core::HookError),

    #[error("RPC error: {0}")]
    Rpc(#[from] hook_rpc::RpcError),
}
