// hook-deployer/src/orchestrator.rs
use crate::classifier::{Operation, Outcome, ResultClassifier};
use crate::config::{DeployerConfig, FeeConfig};
use crate::state::{AppState, DeployLogEntry};
use crate::{DeployError, DeployResult};
use hook_core::{
    select_active_artifact, Account, HookSpec, LocalSigner, SignedTransaction, TransactionAssembler,
    TransactionEnvelope, TransactionSigner, XorMaskCalculator,
};
use hook_rpc::{HttpLedgerClient, LedgerClient, SubmissionResult};
use std::fmt;
use std::sync::Arc;

/// Pipeline stage of an in-flight operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Preparing,
    AwaitingFee,
    Signing,
    Submitting,
    Classifying,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Preparing => "preparing",
            Stage::AwaitingFee => "awaiting-fee",
            Stage::Signing => "signing",
            Stage::Submitting => "submitting",
            Stage::Classifying => "classifying",
        };
        f.write_str(name)
    }
}

/// Why an operation did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownAccount,
    AccountBusy,
    NoHooks,
    NoCompiledArtifact,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::UnknownAccount => "account is not registered",
            SkipReason::AccountBusy => "account has an operation in flight",
            SkipReason::NoHooks => "account has no hooks",
            SkipReason::NoCompiledArtifact => "no compiled file to deploy",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationReport {
    /// A precondition was not met; state and log are untouched
    Skipped(SkipReason),
    /// The ledger answered
    Completed { result: SubmissionResult, outcome: Outcome },
    /// Signing or submission failed before the ledger answered
    Failed { reason: String },
}

impl OperationReport {
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            OperationReport::Completed { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, OperationReport::Skipped(_))
    }
}

/// Runs deploy and delete for accounts held in an [`AppState`]
pub struct HookDeployer {
    state: Arc<AppState>,
    assembler: TransactionAssembler,
    signer: Arc<dyn TransactionSigner>,
    client: Arc<dyn LedgerClient>,
    classifier: ResultClassifier,
    fees: FeeConfig,
}

impl HookDeployer {
    pub fn new(
        state: Arc<AppState>,
        assembler: TransactionAssembler,
        signer: Arc<dyn TransactionSigner>,
        client: Arc<dyn LedgerClient>,
        classifier: ResultClassifier,
        fees: FeeConfig,
    ) -> Self {
        Self {
            state,
            assembler,
            signer,
            client,
            classifier,
            fees,
        }
    }

    /// Wire the local signer, the HTTP client and the XOR mask calculator
    pub fn from_config(config: &DeployerConfig, state: Arc<AppState>) -> DeployResult<Self> {
        let calculator = XorMaskCalculator::new(&config.hook_on.base_mask)?;
        let assembler = TransactionAssembler::new(config.network.network_id, Arc::new(calculator));
        let client = HttpLedgerClient::with_timeout(config.network.rpc_url.clone(), config.network.request_timeout())?;

        tracing::info!(
            "Ledger endpoint {} (network {}), signing with {:?}",
            client.endpoint(),
            assembler.network_id(),
            config.signing.scheme
        );

        Ok(Self::new(
            state,
            assembler,
            Arc::new(LocalSigner::new(config.signing.scheme)),
            Arc::new(client),
            ResultClassifier::new(&config.network.explorer_host),
            config.fees.clone(),
        ))
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Install the active compiled file on `address`
    pub async fn deploy(&self, address: &str, spec: HookSpec) -> OperationReport {
        let (files, active) = self.state.files().await;

        // Values are remembered for the targeted file even if nothing gets sent
        let target = select_active_artifact(&files, active)
            .map(|artifact| artifact.name.to_string())
            .or_else(|| files.get(active).map(|file| file.name.clone()));
        if let Some(name) = &target {
            self.state.record_deploy_values(name, spec.clone()).await;
        }

        let _permit = match self.state.try_acquire(address).await {
            Ok(permit) => permit,
            Err(reason) => return self.skip(Operation::Deploy, address, reason),
        };
        let account = match self.state.account(address).await {
            Some(account) => account,
            None => return self.skip(Operation::Deploy, address, SkipReason::UnknownAccount),
        };

        self.enter(Operation::Deploy, address, Stage::Preparing);
        let tx = match self.assembler.prepare_deploy(&account, &spec, &files, active) {
            Ok(Some(tx)) => tx,
            Ok(None) => return self.skip(Operation::Deploy, address, SkipReason::NoCompiledArtifact),
            Err(e) => return self.fail(Operation::Deploy, address, e.into()).await,
        };

        let hook_hash = match tx.hook().map(|hook| hook.hook_hash()) {
            Some(Ok(hash)) => hash,
            Some(Err(e)) => return self.fail(Operation::Deploy, address, e.into()).await,
            None => None,
        };

        let result = match self.sign_and_submit(Operation::Deploy, &account, &tx).await {
            Ok(result) => result,
            Err(e) => return self.fail(Operation::Deploy, address, e).await,
        };

        let outcome = self.classify(Operation::Deploy, address, &result).await;
        if outcome == Outcome::Success {
            if let Some(hash) = hook_hash {
                self.state.record_hook(address, hash).await;
            }
        }

        self.enter(Operation::Deploy, address, Stage::Idle);
        OperationReport::Completed { result, outcome }
    }

    /// Remove the hook installed on `address`
    pub async fn delete(&self, address: &str) -> OperationReport {
        let _permit = match self.state.try_acquire(address).await {
            Ok(permit) => permit,
            Err(reason) => return self.skip(Operation::Delete, address, reason),
        };
        let account = match self.state.account(address).await {
            Some(account) if account.has_hooks() => account,
            Some(_) => return self.skip(Operation::Delete, address, SkipReason::NoHooks),
            None => return self.skip(Operation::Delete, address, SkipReason::UnknownAccount),
        };

        self.enter(Operation::Delete, address, Stage::Preparing);
        let mut tx = self.assembler.prepare_delete(&account, &self.fees.delete_base_fee);

        self.enter(Operation::Delete, address, Stage::AwaitingFee);
        match self.estimate_fee(&account, &tx).await {
            Ok(fee) => {
                tracing::debug!("Delete fee for {} set to {}", address, fee);
                tx.set_fee(fee);
            }
            Err(e) => {
                tracing::warn!(
                    "Fee estimate for {} failed, keeping {}: {}",
                    address,
                    self.fees.delete_base_fee,
                    e
                );
            }
        }

        let result = match self.sign_and_submit(Operation::Delete, &account, &tx).await {
            Ok(result) => result,
            Err(e) => return self.fail(Operation::Delete, address, e).await,
        };

        let outcome = self.classify(Operation::Delete, address, &result).await;
        if outcome == Outcome::Success {
            self.state.clear_hooks(address).await;
        }

        self.enter(Operation::Delete, address, Stage::Idle);
        OperationReport::Completed { result, outcome }
    }

    /// Pull the current sequence for `address` from the ledger into state
    pub async fn refresh_sequence(&self, address: &str) -> DeployResult<u32> {
        if self.state.account(address).await.is_none() {
            return Err(DeployError::UnknownAccount(address.to_string()));
        }

        let info = self.client.account_info(address).await?;
        self.state.set_sequence(address, info.sequence).await;
        tracing::debug!("Sequence for {} is {}", address, info.sequence);
        Ok(info.sequence)
    }

    /// Sign a draft and ask the ledger what it would charge
    async fn estimate_fee(&self, account: &Account, tx: &TransactionEnvelope) -> DeployResult<String> {
        let key = self.signer.derive_credential(&account.secret)?;
        let draft = self.signer.sign(tx, &key)?;
        let estimate = self.client.fee(&draft.tx_blob).await?;

        Ok(estimate
            .open_ledger_fee
            .unwrap_or_else(|| self.fees.delete_fallback_fee.clone()))
    }

    async fn sign_and_submit(
        &self,
        operation: Operation,
        account: &Account,
        tx: &TransactionEnvelope,
    ) -> DeployResult<SubmissionResult> {
        self.enter(operation, &account.address, Stage::Signing);
        // The ledger has the final word on the envelope
        if let Err(e) = tx.validate_basic() {
            tracing::warn!("Submitting {} envelope for {} anyway: {}", operation, account.address, e);
        }
        let key = self.signer.derive_credential(&account.secret)?;
        let SignedTransaction { tx_blob, hash } = self.signer.sign(tx, &key)?;

        self.enter(operation, &account.address, Stage::Submitting);
        tracing::debug!("Submitting {} ({} hex chars)", hash, tx_blob.len());
        Ok(self.client.submit(&tx_blob).await?)
    }

    async fn classify(&self, operation: Operation, address: &str, result: &SubmissionResult) -> Outcome {
        self.enter(operation, address, Stage::Classifying);
        let classification = self.classifier.classify(operation, result);
        for entry in classification.entries {
            self.state.push_log(entry).await;
        }
        classification.outcome
    }

    fn enter(&self, operation: Operation, address: &str, stage: Stage) {
        tracing::info!("{} {}: {}", operation, address, stage);
    }

    fn skip(&self, operation: Operation, address: &str, reason: SkipReason) -> OperationReport {
        tracing::debug!("{} {} skipped: {}", operation, address, reason);
        OperationReport::Skipped(reason)
    }

    async fn fail(&self, operation: Operation, address: &str, err: DeployError) -> OperationReport {
        match &err {
            DeployError::Rpc(rpc) => tracing::error!("{} {} failed ({}): {}", operation, address, rpc.code(), rpc),
            _ => tracing::error!("{} {} failed: {}", operation, address, err),
        }
        self.state.push_log(DeployLogEntry::error(operation.failure_notice())).await;
        self.enter(operation, address, Stage::Idle);
        OperationReport::Failed {
            reason: err.to_string(),
        }
    }
}
