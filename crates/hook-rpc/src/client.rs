// hook-rpc/src/client.rs
use crate::types::{AccountInfo, AccountInfoResult, FeeEstimate, FeeResult, LedgerRequest, RpcResponse, SubmissionResult};
use crate::{RpcError, RpcResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Network side of the pipeline.
///
/// Implementations surface transport failures as errors and never retry.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a signed blob and return the ledger's raw verdict
    async fn submit(&self, tx_blob: &str) -> RpcResult<SubmissionResult>;

    /// Ask the ledger what it would charge for this (signed draft) transaction
    async fn fee(&self, tx_blob: &str) -> RpcResult<FeeEstimate>;

    /// Current sequence for an address
    async fn account_info(&self, address: &str) -> RpcResult<AccountInfo>;
}

/// JSON-RPC over HTTP
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpLedgerClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Client with a request timeout; `None` leaves timing to the transport
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Option<Duration>) -> RpcResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(&self, request: &LedgerRequest) -> RpcResult<T> {
        tracing::debug!("→ {} {}", request.command(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request.to_json_rpc())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", request.command(), status);
            return Err(RpcError::Http(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let parsed: RpcResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", request.command(), e)))?;

        Ok(parsed.result)
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn submit(&self, tx_blob: &str) -> RpcResult<SubmissionResult> {
        let request = LedgerRequest::Submit {
            tx_blob: tx_blob.to_string(),
        };
        let result: SubmissionResult = self.call(&request).await?;
        tracing::debug!(
            "← submit engine_result={:?} error={:?}",
            result.engine_result,
            result.error
        );
        Ok(result)
    }

    async fn fee(&self, tx_blob: &str) -> RpcResult<FeeEstimate> {
        let request = LedgerRequest::Fee {
            tx_blob: tx_blob.to_string(),
        };
        let result: FeeResult = self.call(&request).await?;
        if let Some(err) = result.status.into_error() {
            return Err(err);
        }
        Ok(result.drops.unwrap_or_default())
    }

    async fn account_info(&self, address: &str) -> RpcResult<AccountInfo> {
        let request = LedgerRequest::AccountInfo {
            account: address.to_string(),
        };
        let result: AccountInfoResult = self.call(&request).await?;
        if let Some(err) = result.status.into_error() {
            return Err(err);
        }
        let data = result
            .account_data
            .ok_or_else(|| RpcError::InvalidResponse("account_info without account_data".into()))?;

        Ok(AccountInfo {
            account: data.account,
            sequence: data.sequence,
        })
    }
}
