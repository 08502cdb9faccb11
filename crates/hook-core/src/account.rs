// hook-core/src/account.rs

use crate::types::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger account as seen by the pipeline.
///
/// The loading flag is not part of the snapshot; it belongs to whoever owns
/// the account registry.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Classic address (`r...`)
    pub address: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Next sequence number to use
    pub sequence: Sequence,
    /// Secret the signing key is derived from
    pub secret: String,
    /// Hashes of hooks currently installed on the account
    #[serde(default)]
    pub hooks: Vec<String>,
}

impl Account {
    pub fn new(address: impl Into<String>, secret: impl Into<String>, sequence: Sequence) -> Self {
        Self {
            address: address.into(),
            name: None,
            sequence,
            secret: secret.into(),
            hooks: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: Vec<String>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn has_hooks(&self) -> bool {
        !self.hooks.is_empty()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("name", &self.name)
            .field("sequence", &self.sequence)
            .field("secret", &"[REDACTED]")
            .field("hooks", &self.hooks)
            .finish()
    }
}
