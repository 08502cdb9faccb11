// hook-deployer/src/main.rs
use anyhow::Context;
use clap::{Parser, Subcommand};
use hook_core::{Account, HookOnCalculator, HookSpec, SourceFile, TransactionTypeId, XorMaskCalculator};
use hook_deployer::{AppState, DeployerConfig, HookDeployer, OperationReport};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hook-deployer")]
#[command(about = "Deploy and delete ledger hooks", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./hooks.toml")]
        output: String,
    },

    /// Install a compiled hook on an account
    Deploy {
        /// Configuration file path
        #[arg(short, long, default_value = "./hooks.toml")]
        config: String,

        /// JSON file holding the account list
        #[arg(long, default_value = "./accounts.json")]
        accounts: String,

        /// Account address
        #[arg(short, long)]
        account: String,

        /// Compiled files, in order
        #[arg(short, long, required = true, num_args = 1..)]
        wasm: Vec<String>,

        /// Index of the focused file
        #[arg(long, default_value = "0")]
        active: usize,

        /// Namespace string, hashed before sending
        #[arg(short, long)]
        namespace: String,

        /// Transaction types that trigger the hook (ttPAYMENT, ttINVOKE, ...)
        #[arg(short, long, num_args = 0..)]
        invoke: Vec<String>,

        /// Fee in drops
        #[arg(short, long)]
        fee: String,

        /// Hook parameter as name=value
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Remove the hook from an account
    Delete {
        /// Configuration file path
        #[arg(short, long, default_value = "./hooks.toml")]
        config: String,

        /// JSON file holding the account list
        #[arg(long, default_value = "./accounts.json")]
        accounts: String,

        /// Account address
        #[arg(short, long)]
        account: String,
    },

    /// Print the namespace hash for a string
    Namespace { value: String },

    /// Print the HookOn mask for a set of transaction types
    HookOn {
        types: Vec<String>,

        /// Base mask in hex (defaults to 3e3ff5bf)
        #[arg(long)]
        base: Option<String>,

        /// List the known transaction types and their codes
        #[arg(long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("hook_deployer={0},hook_core={0},hook_rpc={0},hyper=warn", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { output } => {
            DeployerConfig::default().to_file(&output)?;
            println!("✓ Configuration written to {}", output);
        }
        Commands::Deploy {
            config,
            accounts,
            account,
            wasm,
            active,
            namespace,
            invoke,
            fee,
            params,
        } => {
            let mut spec = HookSpec::new(namespace, invoke, fee);
            for param in &params {
                let (name, value) = param
                    .split_once('=')
                    .with_context(|| format!("parameter {:?} is not name=value", param))?;
                spec = spec.with_parameter(name, value);
            }

            let files = wasm
                .iter()
                .map(|path| load_source(path))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let (deployer, state) = open(&config, &accounts).await?;
            state.set_files(files, active).await;
            refresh(&deployer, &account).await;

            let report = deployer.deploy(&account, spec).await;
            finish(&state, &accounts, report).await?;
        }
        Commands::Delete {
            config,
            accounts,
            account,
        } => {
            let (deployer, state) = open(&config, &accounts).await?;
            refresh(&deployer, &account).await;

            let report = deployer.delete(&account).await;
            finish(&state, &accounts, report).await?;
        }
        Commands::Namespace { value } => {
            println!("{}", hook_core::assembler::namespace_hash(&value));
        }
        Commands::HookOn { types, base, list } => {
            if list {
                for tt in TransactionTypeId::all() {
                    println!("{:>3}  {}", tt.code(), tt);
                }
                return Ok(());
            }

            let calculator = match base {
                Some(base) => XorMaskCalculator::new(&base)?,
                None => XorMaskCalculator::default(),
            };
            println!("{}", calculator.calculate(&types)?);
        }
    }

    Ok(())
}

fn load_config(path: &str) -> anyhow::Result<DeployerConfig> {
    let mut config = if Path::new(path).exists() {
        tracing::info!("Loading configuration from {}", path);
        DeployerConfig::from_file(path)?
    } else {
        tracing::warn!("{} not found, using defaults", path);
        DeployerConfig::default()
    };
    config.apply_env_overrides();
    Ok(config)
}

fn load_source(path: &str) -> anyhow::Result<SourceFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path))?;
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Ok(SourceFile::compiled(name, bytes))
}

async fn open(config_path: &str, accounts_path: &str) -> anyhow::Result<(HookDeployer, Arc<AppState>)> {
    let config = load_config(config_path)?;

    let raw = std::fs::read_to_string(accounts_path).with_context(|| format!("reading {}", accounts_path))?;
    let accounts: Vec<Account> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", accounts_path))?;
    tracing::info!("Loaded {} accounts", accounts.len());

    let state = Arc::new(AppState::with_accounts(accounts).await);
    let deployer = HookDeployer::from_config(&config, state.clone())?;
    Ok((deployer, state))
}

async fn refresh(deployer: &HookDeployer, address: &str) {
    if let Err(e) = deployer.refresh_sequence(address).await {
        tracing::warn!("Could not refresh sequence for {}, using stored value: {}", address, e);
    }
}

async fn finish(state: &AppState, accounts_path: &str, report: OperationReport) -> anyhow::Result<()> {
    for entry in state.logs().await {
        println!("{}", entry);
    }

    let accounts = state.accounts().await;
    std::fs::write(accounts_path, serde_json::to_string_pretty(&accounts)?)
        .with_context(|| format!("writing {}", accounts_path))?;

    match report {
        OperationReport::Skipped(reason) => println!("Nothing to do: {}", reason),
        OperationReport::Completed { outcome, .. } => tracing::debug!("Finished with {:?}", outcome),
        OperationReport::Failed { reason } => anyhow::bail!(reason),
    }
    Ok(())
}
