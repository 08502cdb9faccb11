// hook-deployer/src/state.rs
use crate::orchestrator::SkipReason;
use chrono::{DateTime, Utc};
use hook_core::{Account, HookSpec, Sequence, SourceFile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Success,
    Error,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Success => write!(f, "success"),
            LogKind::Error => write!(f, "error"),
        }
    }
}

/// One line of the deploy log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployLogEntry {
    pub kind: LogKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl DeployLogEntry {
    fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            engine_result: None,
            tx_hash: None,
            explorer_url: None,
            timestamp: Utc::now(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(LogKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LogKind::Error, text)
    }

    pub fn with_engine_result(mut self, code: impl Into<String>) -> Self {
        self.engine_result = Some(code.into());
        self
    }

    pub fn with_transaction(mut self, hash: impl Into<String>, explorer_url: impl Into<String>) -> Self {
        self.tx_hash = Some(hash.into());
        self.explorer_url = Some(explorer_url.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.kind == LogKind::Success
    }
}

impl fmt::Display for DeployLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.timestamp.format("%H:%M:%S"), self.kind, self.text)?;
        if let Some(url) = &self.explorer_url {
            write!(f, " {}", url)?;
        }
        Ok(())
    }
}

/// Exclusive in-flight marker for one account.
///
/// Holding the guard means the account is loading; dropping it clears the flag.
#[derive(Debug)]
pub struct LoadingGuard {
    address: String,
    flag: Arc<AtomicBool>,
}

impl LoadingGuard {
    fn try_acquire(address: &str, flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                address: address.to_string(),
                flag: flag.clone(),
            })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        tracing::trace!("Released loading permit for {}", self.address);
    }
}

#[derive(Debug)]
struct AccountRecord {
    account: Account,
    loading: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct Workspace {
    files: Vec<SourceFile>,
    active: usize,
}

/// Application state shared by every operation
#[derive(Debug, Default)]
pub struct AppState {
    accounts: RwLock<Vec<AccountRecord>>,
    workspace: RwLock<Workspace>,
    deploy_values: RwLock<HashMap<String, HookSpec>>,
    deploy_logs: RwLock<Vec<DeployLogEntry>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_accounts(accounts: Vec<Account>) -> Self {
        let state = Self::new();
        for account in accounts {
            state.add_account(account).await;
        }
        state
    }

    /// Register an account, replacing any record with the same address
    pub async fn add_account(&self, account: Account) {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|r| r.account.address == account.address) {
            Some(record) => record.account = account,
            None => accounts.push(AccountRecord {
                account,
                loading: Arc::new(AtomicBool::new(false)),
            }),
        }
    }

    pub async fn account(&self, address: &str) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|r| r.account.address == address)
            .map(|r| r.account.clone())
    }

    pub async fn accounts(&self) -> Vec<Account> {
        self.accounts.read().await.iter().map(|r| r.account.clone()).collect()
    }

    pub async fn is_loading(&self, address: &str) -> Option<bool> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|r| r.account.address == address)
            .map(|r| r.loading.load(Ordering::Acquire))
    }

    /// Take the account's loading permit
    pub async fn try_acquire(&self, address: &str) -> Result<LoadingGuard, SkipReason> {
        let accounts = self.accounts.read().await;
        let record = accounts
            .iter()
            .find(|r| r.account.address == address)
            .ok_or(SkipReason::UnknownAccount)?;
        LoadingGuard::try_acquire(address, &record.loading).ok_or(SkipReason::AccountBusy)
    }

    async fn update_account<F>(&self, address: &str, update: F) -> bool
    where
        F: FnOnce(&mut Account),
    {
        let mut accounts = self.accounts.write().await;
        match accounts.iter_mut().find(|r| r.account.address == address) {
            Some(record) => {
                update(&mut record.account);
                true
            }
            None => false,
        }
    }

    pub async fn set_sequence(&self, address: &str, sequence: Sequence) -> bool {
        self.update_account(address, |a| a.sequence = sequence).await
    }

    /// Remember a hook installed on the account
    pub async fn record_hook(&self, address: &str, hook_hash: String) -> bool {
        self.update_account(address, |a| {
            // Flags = 1 overrides the slot, so the new hook replaces the old one
            a.hooks = vec![hook_hash];
        })
        .await
    }

    pub async fn clear_hooks(&self, address: &str) -> bool {
        self.update_account(address, |a| a.hooks.clear()).await
    }

    pub async fn set_files(&self, files: Vec<SourceFile>, active: usize) {
        let mut workspace = self.workspace.write().await;
        workspace.files = files;
        workspace.active = active;
    }

    /// Snapshot of the file list and the focused index
    pub async fn files(&self) -> (Vec<SourceFile>, usize) {
        let workspace = self.workspace.read().await;
        (workspace.files.clone(), workspace.active)
    }

    pub async fn record_deploy_values(&self, file: &str, spec: HookSpec) {
        self.deploy_values.write().await.insert(file.to_string(), spec);
    }

    pub async fn deploy_values(&self, file: &str) -> Option<HookSpec> {
        self.deploy_values.read().await.get(file).cloned()
    }

    pub async fn push_log(&self, entry: DeployLogEntry) {
        match entry.kind {
            LogKind::Success => tracing::info!("{}", entry.text),
            LogKind::Error => tracing::warn!("{}", entry.text),
        }
        self.deploy_logs.write().await.push(entry);
    }

    pub async fn logs(&self) -> Vec<DeployLogEntry> {
        self.deploy_logs.read().await.clone()
    }

    pub async fn log_count(&self) -> usize {
        self.deploy_logs.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Account {
        Account::new("rAlice", "secret", 7).with_hooks(vec!["AA".into()])
    }

    #[tokio::test]
    async fn test_permit_is_exclusive() {
        let state = AppState::with_accounts(vec![alice()]).await;

        let guard = state.try_acquire("rAlice").await.unwrap();
        assert_eq!(guard.address(), "rAlice");
        assert_eq!(state.is_loading("rAlice").await, Some(true));
        assert_eq!(state.try_acquire("rAlice").await.unwrap_err(), SkipReason::AccountBusy);

        drop(guard);
        assert_eq!(state.is_loading("rAlice").await, Some(false));
        assert!(state.try_acquire("rAlice").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let state = AppState::new();
        assert_eq!(state.try_acquire("rNobody").await.unwrap_err(), SkipReason::UnknownAccount);
        assert!(state.is_loading("rNobody").await.is_none());
        assert!(!state.clear_hooks("rNobody").await);
    }

    #[tokio::test]
    async fn test_add_account_replaces_but_keeps_permit() {
        let state = AppState::with_accounts(vec![alice()]).await;
        let _guard = state.try_acquire("rAlice").await.unwrap();

        state.add_account(Account::new("rAlice", "secret", 9)).await;

        assert_eq!(state.accounts().await.len(), 1);
        assert_eq!(state.account("rAlice").await.unwrap().sequence, 9);
        assert_eq!(state.is_loading("rAlice").await, Some(true));
    }

    #[tokio::test]
    async fn test_hook_bookkeeping() {
        let state = AppState::with_accounts(vec![alice()]).await;

        state.record_hook("rAlice", "BB".into()).await;
        assert_eq!(state.account("rAlice").await.unwrap().hooks, vec!["BB".to_string()]);

        state.clear_hooks("rAlice").await;
        assert!(!state.account("rAlice").await.unwrap().has_hooks());
    }

    #[tokio::test]
    async fn test_deploy_values_keyed_by_file() {
        let state = AppState::new();
        let spec = HookSpec::new("ns", vec!["ttPAYMENT".into()], "12");

        state.record_deploy_values("hook.wasm", spec.clone()).await;

        assert_eq!(state.deploy_values("hook.wasm").await, Some(spec));
        assert!(state.deploy_values("other.wasm").await.is_none());
    }

    #[tokio::test]
    async fn test_log_append_order() {
        let state = AppState::new();
        state.push_log(DeployLogEntry::success("first")).await;
        state.push_log(DeployLogEntry::error("second")).await;

        let logs = state.logs().await;
        assert_eq!(logs.len(), 2);
        assert!(logs[0].is_success());
        assert_eq!(logs[1].kind, LogKind::Error);
        assert_eq!(logs[1].text, "second");
    }

    #[test]
    fn test_entry_display_includes_link() {
        let entry = DeployLogEntry::success("[tesSUCCESS] applied")
            .with_engine_result("tesSUCCESS")
            .with_transaction("ABC123", "https://explorer/ABC123");
        let line = entry.to_string();
        assert!(line.contains("[success] [tesSUCCESS] applied"));
        assert!(line.ends_with("https://explorer/ABC123"));
    }
}
