//! Root-chain bridge test preparation.
//!
//! Deploys (or reuses) a test ERC20, mints to the test account, configures
//! the bridge's rate-control thresholds for it, and hands the bridge's
//! rate-control and admin roles over from the deployer to the multisig.
//!
//! ```text
//! .env + config.toml ─▶ EnvConfig / PrepareConfig
//!                              │
//!                              ▼
//!   registry.json ─▶ PreparationPlan ─▶ operator confirmation
//!         ▲                                   │
//!         │                                   ▼
//!         └── token address ◀── deploy ─▶ mint ─▶ thresholds ─▶ revoke roles ─▶ summary
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use bridge_prep::blockchain::{BlockchainClient, DeployerSigner, TxWorkflow};
use bridge_prep::config::{self, EnvConfig, PrepareConfig};
use bridge_prep::lifecycle::ConfirmationGate;
use bridge_prep::observability::logging;
use bridge_prep::prepare::{self, Preparation, PreparationPlan};
use bridge_prep::registry::ContractRegistry;
use bridge_prep::{PrepareResult, PreparationSummary};

#[derive(Parser)]
#[command(name = "bridge-prep")]
#[command(about = "Prepare a root-chain bridge deployment for testing", long_about = None)]
struct Cli {
    /// TOML file with tunables; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment file loaded before reading variables.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Registry file, overriding `registry.path` from the config.
    #[arg(long)]
    registry: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match dotenvy::from_path(&cli.env_file) {
        Ok(()) => {}
        Err(e) if e.not_found() => {}
        Err(e) => {
            eprintln!("Failed to load {}: {}", cli.env_file.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let mut config = match config::loader::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = cli.registry {
        config.registry.path = path;
    }

    logging::init(&config.observability);

    tracing::info!("=======Start Test Preparation=======");
    match run(&config).await {
        Ok(summary) => {
            println!("{}", summary);
            tracing::info!("=======End Test Preparation=======");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Test preparation failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &PrepareConfig) -> PrepareResult<PreparationSummary> {
    let env = EnvConfig::from_env()?;
    let registry = ContractRegistry::load(&config.registry.path)?;
    let plan = PreparationPlan::resolve(&env, config, &registry)?;

    let signer = DeployerSigner::from_credential(&env.deployer, env.chain_id).await?;
    let deployer = signer.address();
    tracing::info!(deployer = %deployer, "Deployer address resolved");

    let client = BlockchainClient::connect(&env.rpc_url, signer.into_wallet(), &config.blockchain);
    let workflow = TxWorkflow::new(client, deployer, &config.blockchain);

    let preparation = Preparation::resolve(workflow, registry, plan).await?;
    prepare::run(preparation, ConfirmationGate::stdin()).await
}
