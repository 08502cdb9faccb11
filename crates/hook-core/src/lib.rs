// hook-core/src/lib.rs

//! Core data structures for hook deployment
//!
//! This crate provides:
//! - Account and source file snapshots
//! - User supplied hook specs and parameters
//! - The `SetHook` transaction envelope
//! - Trigger mask (`HookOn`) calculation
//! - Envelope assembly for the deploy and delete paths
//! - The signing seam and a local signer

pub mod account;
pub mod artifact;
pub mod assembler;
pub mod hook_on;
pub mod signer;
pub mod spec;
pub mod transaction;
pub mod types;

pub use account::Account;
pub use artifact::{select_active_artifact, CompiledArtifact, SourceFile};
pub use assembler::TransactionAssembler;
pub use hook_on::{HookOnCalculator, TransactionTypeId, XorMaskCalculator};
pub use signer::{LocalSigner, SignedTransaction, TransactionSigner};
pub use spec::{HookParameter, HookSpec};
pub use transaction::{HookDefinition, HookEntry, HookParameterEntry, TransactionEnvelope, WireHookParameter};
pub use types::*;

/// Result type for hook operations
pub type HookResult<T> = Result<T, HookError>;

/// Errors that can occur while assembling or signing hook transactions
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    #[error("Invalid trigger mask: {0}")]
    InvalidMask(String),

    #[error("Cryptographic error: {0}")]
    CryptoError(#[from] hook_crypto::CryptoError),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for HookError {
    fn from(err: serde_json::Error) -> Self {
        HookError::SerializationError(err.to_string())
    }
}
