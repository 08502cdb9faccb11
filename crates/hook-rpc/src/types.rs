// hook-rpc/src/types.rs
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A ledger command, as the websocket API spells it: `{ "command": ..., ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerRequest {
    Submit { tx_blob: String },
    Fee { tx_blob: String },
    AccountInfo { account: String },
}

impl LedgerRequest {
    pub fn command(&self) -> &'static str {
        match self {
            LedgerRequest::Submit { .. } => "submit",
            LedgerRequest::Fee { .. } => "fee",
            LedgerRequest::AccountInfo { .. } => "account_info",
        }
    }

    pub fn params(&self) -> serde_json::Value {
        match self {
            LedgerRequest::Submit { tx_blob } | LedgerRequest::Fee { tx_blob } => {
                json!({ "tx_blob": tx_blob })
            }
            LedgerRequest::AccountInfo { account } => {
                json!({ "account": account, "ledger_index": "current" })
            }
        }
    }

    /// JSON-RPC body: `{ "method": <command>, "params": [ { ... } ] }`
    pub fn to_json_rpc(&self) -> RpcRequest {
        RpcRequest {
            method: self.command().to_string(),
            params: vec![self.params()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse<T> {
    pub result: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Raw outcome of `submit`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_result_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_json: Option<TxJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_ledger_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_exception: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SubmissionResult {
    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_json.as_ref().and_then(|tx| tx.hash.as_deref())
    }

    /// Low-level error description; `error_exception` wins over `error_message`
    pub fn error_description(&self) -> Option<&str> {
        self.error_exception
            .as_deref()
            .or(self.error_message.as_deref())
    }
}

/// The `drops` object of a `fee` response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeEstimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_ledger_fee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub account: String,
    pub sequence: u32,
}

/// Fields every non-submit result may carry when the ledger refuses a request
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LedgerStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_exception: Option<String>,
}

impl LedgerStatus {
    pub fn into_error(self) -> Option<crate::RpcError> {
        let failed = self.status.as_deref() == Some("error") || self.error.is_some();
        if !failed {
            return None;
        }
        Some(crate::RpcError::Ledger {
            error: self.error.unwrap_or_else(|| "unknown".into()),
            message: self
                .error_exception
                .or(self.error_message)
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FeeResult {
    #[serde(flatten)]
    pub status: LedgerStatus,
    #[serde(default)]
    pub drops: Option<FeeEstimate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountData {
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Sequence")]
    pub sequence: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountInfoResult {
    #[serde(flatten)]
    pub status: LedgerStatus,
    #[serde(default)]
    pub account_data: Option<AccountData>,
}
