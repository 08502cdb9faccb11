// hook-core/src/transaction.rs

use crate::{types::*, HookError, HookResult};
use hook_crypto::{HashAlgorithm, Hashable};
use serde::{Deserialize, Serialize};

/// `{ "HookParameter": { ... } }` wrapper used on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HookParameterEntry {
    #[serde(rename = "HookParameter")]
    pub hook_parameter: WireHookParameter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireHookParameter {
    /// Hex encoded name
    #[serde(rename = "HookParameterName")]
    pub name: String,
    #[serde(rename = "HookParameterValue")]
    pub value: String,
}

/// A single hook slot definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct HookDefinition {
    /// Upper-case hex bytecode; empty removes the hook in this slot
    pub create_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_api_version: Option<u16>,
    pub flags: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_parameters: Option<Vec<HookParameterEntry>>,
}

impl HookDefinition {
    /// Slot definition that deletes the installed hook
    pub fn removal() -> Self {
        Self {
            create_code: String::new(),
            hook_on: None,
            hook_namespace: None,
            hook_api_version: None,
            flags: HOOK_FLAG_OVERRIDE,
            hook_parameters: None,
        }
    }

    pub fn is_removal(&self) -> bool {
        self.create_code.is_empty()
    }

    /// `HookHash` the ledger will assign: SHA-512Half of the bytecode
    pub fn hook_hash(&self) -> HookResult<Option<String>> {
        if self.is_removal() {
            return Ok(None);
        }
        let bytecode = hook_crypto::hex_to_buffer(&self.create_code)?;
        Ok(Some(bytecode.hash_with(HashAlgorithm::Sha512Half).to_hex_upper()))
    }
}

/// `{ "Hook": { ... } }` wrapper used on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HookEntry {
    #[serde(rename = "Hook")]
    pub hook: HookDefinition,
}

/// Unsigned `SetHook` transaction.
///
/// `SigningPubKey` and `TxnSignature` stay empty until a signer fills them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionEnvelope {
    pub transaction_type: String,
    pub account: String,
    pub sequence: Sequence,
    pub fee: Fee,
    #[serde(rename = "NetworkID")]
    pub network_id: NetworkId,
    pub hooks: Vec<HookEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_pub_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_signature: Option<String>,
}

impl TransactionEnvelope {
    /// Create a new unsigned `SetHook` envelope carrying one hook definition
    pub fn set_hook(
        account: impl Into<String>,
        sequence: Sequence,
        fee: impl Into<Fee>,
        network_id: NetworkId,
        hook: HookDefinition,
    ) -> Self {
        Self {
            transaction_type: SET_HOOK.to_string(),
            account: account.into(),
            sequence,
            fee: fee.into(),
            network_id,
            hooks: vec![HookEntry { hook }],
            signing_pub_key: None,
            txn_signature: None,
        }
    }

    /// The (only) hook definition carried by this envelope
    pub fn hook(&self) -> Option<&HookDefinition> {
        self.hooks.first().map(|entry| &entry.hook)
    }

    pub fn set_fee(&mut self, fee: impl Into<Fee>) {
        self.fee = fee.into();
    }

    pub fn is_signed(&self) -> bool {
        self.txn_signature.is_some()
    }

    /// Copy with signing fields cleared
    pub fn unsigned(&self) -> Self {
        let mut copy = self.clone();
        copy.signing_pub_key = None;
        copy.txn_signature = None;
        copy
    }

    /// Canonical JSON encoding
    pub fn to_json_bytes(&self) -> HookResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> HookResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Validate basic envelope properties
    pub fn validate_basic(&self) -> HookResult<()> {
        if self.account.is_empty() {
            return Err(HookError::InvalidTransaction("Account cannot be empty".into()));
        }

        if self.transaction_type != SET_HOOK {
            return Err(HookError::InvalidTransaction(format!(
                "Unexpected transaction type {}",
                self.transaction_type
            )));
        }

        if self.fee.is_empty() || !self.fee.chars().all(|c| c.is_ascii_digit()) {
            return Err(HookError::InvalidTransaction(format!("Fee must be drops, got {:?}", self.fee)));
        }

        let hook = self
            .hook()
            .ok_or_else(|| HookError::InvalidTransaction("Envelope carries no hook".into()))?;

        if !hook.is_removal() {
            if hook.hook_namespace.is_none() {
                return Err(HookError::InvalidTransaction("HookNamespace missing".into()));
            }
            if hook.hook_on.is_none() {
                return Err(HookError::InvalidTransaction("HookOn missing".into()));
            }
        }

        if let Some(params) = &hook.hook_parameters {
            if params.is_empty() {
                return Err(HookError::InvalidTransaction("HookParameters cannot be empty".into()));
            }
        }

        Ok(())
    }
}
