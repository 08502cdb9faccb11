// hook-deployer/src/config.rs
use crate::{DeployError, DeployResult};
use hook_crypto::SignatureScheme;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployerConfig {
    pub network: NetworkConfig,
    pub fees: FeeConfig,
    #[serde(default)]
    pub signing: SigningConfig,
    #[serde(default)]
    pub hook_on: HookOnConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Copied verbatim into `NetworkID`
    pub network_id: u32,
    /// Explorer host; links are `https://<host>/<hash>`
    pub explorer_host: String,
    /// Absent means no local timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeConfig {
    /// Fee a delete starts with before estimation
    pub delete_base_fee: String,
    /// Fee used when the estimate comes back without `open_ledger_fee`
    pub delete_fallback_fee: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SigningConfig {
    pub scheme: SignatureScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookOnConfig {
    pub base_mask: String,
}

impl Default for HookOnConfig {
    fn default() -> Self {
        Self {
            base_mask: format!("{:x}", hook_core::XorMaskCalculator::DEFAULT_BASE_MASK),
        }
    }
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                rpc_url: "https://hooks-testnet-v3.xrpl-labs.com".into(),
                network_id: 21338,
                explorer_host: "hooks-testnet-v3-explorer.xrpl-labs.com".into(),
                request_timeout_secs: None,
            },
            fees: FeeConfig {
                delete_base_fee: "100000".into(),
                delete_fallback_fee: "1000".into(),
            },
            signing: SigningConfig::default(),
            hook_on: HookOnConfig::default(),
        }
    }
}

impl NetworkConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl DeployerConfig {
    pub fn from_file(path: &str) -> DeployResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)
            .map_err(|e| DeployError::Config(format!("{}: {}", path, e)))?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> DeployResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| DeployError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `HOOKS_RPC_URL`, `HOOKS_NETWORK_ID` and `HOOKS_EXPLORER_URL`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("HOOKS_RPC_URL") {
            tracing::info!("RPC URL overridden: {}", url);
            self.network.rpc_url = url;
        }

        if let Some(raw) = lookup("HOOKS_NETWORK_ID") {
            match raw.trim().parse() {
                Ok(id) => self.network.network_id = id,
                Err(_) => tracing::warn!("Ignoring HOOKS_NETWORK_ID={:?}: not a number", raw),
            }
        }

        if let Some(host) = lookup("HOOKS_EXPLORER_URL") {
            self.network.explorer_host = host;
        }
    }
}
