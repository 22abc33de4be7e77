//! Multisend CLI - Command-line interface for the Multisend SDK
//!
//! Estimate and submit batched transfers, manage token approvals and inspect
//! gas prices from the terminal.

use alloy_primitives::{Address, U256};
use anyhow::Context;
use clap::{Parser, Subcommand};
use multisend_sdk::address::parse_address;
use multisend_sdk::token::{format_amount, parse_amount};
use multisend_sdk::transaction::{ConnectedMultiSend, MultiSend};
use multisend_sdk::{BatchRequest, SdkConfig, TxOptions};
use multisend_sdk::client::RpcClient;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisend-cli")]
#[command(about = "Multisend SDK Command Line Interface", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file (cannot be combined with the connection flags)
    #[arg(
        short,
        long,
        conflicts_with_all = ["rpc_url", "rpc_user", "rpc_password", "contract"]
    )]
    config: Option<PathBuf>,

    /// RPC endpoint URL
    #[arg(long, default_value = "http://localhost:8545")]
    rpc_url: String,

    /// RPC username
    #[arg(long)]
    rpc_user: Option<String>,

    /// RPC password
    #[arg(long)]
    rpc_password: Option<String>,

    /// Multi-send contract address
    #[arg(long)]
    contract: Option<String>,

    /// Gas limit override
    #[arg(long)]
    gas_limit: Option<u64>,

    /// Gas price override in wei
    #[arg(long)]
    gas_price: Option<u128>,

    /// Nonce override
    #[arg(long)]
    nonce: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the gas cost of a batch described in a JSON file
    Estimate {
        /// Batch file
        #[arg(short, long)]
        batch: PathBuf,
        /// Estimate as this account (checks its allowance first)
        #[arg(short, long)]
        from: Option<String>,
    },
    /// Submit a batch described in a JSON file
    Send {
        /// Batch file
        #[arg(short, long)]
        batch: PathBuf,
        /// Signing account (defaults to the node's first account)
        #[arg(short, long)]
        from: Option<String>,
    },
    /// Send native coin to two recipients
    SendToTwo {
        #[arg(long)]
        to1: String,
        /// Amount in wei
        #[arg(long)]
        amount1: String,
        #[arg(long)]
        to2: String,
        /// Amount in wei
        #[arg(long)]
        amount2: String,
        /// Signing account (defaults to the node's first account)
        #[arg(short, long)]
        from: Option<String>,
    },
    /// Approve the multi-send contract to spend a token
    Approve {
        /// Token address
        #[arg(short, long)]
        token: String,
        /// Amount in the token's display units (e.g. 12.5)
        #[arg(short, long)]
        amount: String,
        /// Signing account (defaults to the node's first account)
        #[arg(short, long)]
        from: Option<String>,
    },
    /// Show an owner's allowance for the multi-send contract
    Allowance {
        /// Token address
        #[arg(short, long)]
        token: String,
        /// Token owner
        #[arg(short, long)]
        owner: String,
        /// Amount the next batch needs, in the token's minimal unit
        #[arg(short, long, default_value = "0")]
        required: String,
    },
    /// Show advisory slow/average/fast gas prices
    GasPrices,
}

fn load_config(cli: &Cli) -> anyhow::Result<SdkConfig> {
    if let Some(ref path) = cli.config {
        return SdkConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    let contract = cli
        .contract
        .as_deref()
        .context("--contract is required when no --config file is given")?;
    let mut config = SdkConfig::new(cli.rpc_url.clone(), parse_address(contract)?);
    if let (Some(user), Some(pass)) = (&cli.rpc_user, &cli.rpc_password) {
        config = config.with_auth(user.clone(), pass.clone());
    }
    config.validate()?;
    Ok(config)
}

fn load_batch(path: &PathBuf) -> anyhow::Result<BatchRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read batch file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse batch file {}", path.display()))
}

async fn connect(
    multisend: &MultiSend<RpcClient>,
    from: Option<&str>,
) -> anyhow::Result<ConnectedMultiSend<RpcClient>> {
    match from {
        Some(account) => Ok(multisend.connect(parse_address(account)?)),
        None => Ok(multisend.connect_default().await?),
    }
}

fn parse_wei(text: &str) -> anyhow::Result<U256> {
    text.parse::<U256>()
        .with_context(|| format!("invalid amount {text:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging, RUST_LOG takes precedence
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&cli)?;
    let multisend = MultiSend::from_config(config)?;
    let options = TxOptions {
        gas_limit: cli.gas_limit,
        gas_price: cli.gas_price,
        nonce: cli.nonce,
    };

    match &cli.command {
        Commands::Estimate { batch, from } => {
            let request = load_batch(batch)?;
            let prepared = multisend.prepare(&request)?;
            println!("Method: {}", prepared.method());
            println!("Recipients: {}", request.recipient_count());
            println!("Value: {} wei", prepared.value);
            if let Some(requirement) = prepared.token_requirement {
                println!("Token total: {} ({})", requirement.total, requirement.token);
            }

            let estimation = match from {
                Some(account) => {
                    let signer: Address = parse_address(account)?;
                    multisend.connect(signer).estimate(&request, options).await?
                }
                None => multisend.estimate(&request, options).await?,
            };
            println!("\nGas Estimate");
            println!("============");
            println!("Gas limit: {}", estimation.gas_limit);
            println!("Gas price: {} wei", estimation.gas_price);
            println!(
                "Total cost: {} wei ({} ETH)",
                estimation.total_cost,
                format_amount(estimation.total_cost, 18)?
            );
        }
        Commands::Send { batch, from } => {
            let request = load_batch(batch)?;
            let connected = connect(&multisend, from.as_deref()).await?;
            println!(
                "Sending {} batch to {} recipients from {}...",
                request.kind(),
                request.recipient_count(),
                connected.signer()
            );
            let tx = connected.send(&request, options).await?;
            println!("✓ Transaction submitted: {}", tx);
        }
        Commands::SendToTwo {
            to1,
            amount1,
            to2,
            amount2,
            from,
        } => {
            let connected = connect(&multisend, from.as_deref()).await?;
            let tx = connected
                .send_to_two(
                    parse_address(to1)?,
                    parse_wei(amount1)?,
                    parse_address(to2)?,
                    parse_wei(amount2)?,
                    options,
                )
                .await?;
            println!("✓ Transaction submitted: {}", tx);
        }
        Commands::Approve {
            token,
            amount,
            from,
        } => {
            let token = parse_address(token)?;
            let metadata = multisend.token_metadata(token).await?;
            let raw = parse_amount(amount, metadata.decimals)?;
            let connected = connect(&multisend, from.as_deref()).await?;
            println!(
                "Approving {} {} ({} minimal units) for {}...",
                amount,
                metadata.symbol,
                raw,
                multisend.contract_address()
            );
            let tx = connected.approve_spending(token, raw, options).await?;
            println!("✓ Approval submitted: {}", tx);
        }
        Commands::Allowance {
            token,
            owner,
            required,
        } => {
            let token = parse_address(token)?;
            let owner = parse_address(owner)?;
            let status = multisend
                .check_allowance(token, owner, parse_wei(required)?)
                .await?;
            println!("Allowance");
            println!("=========");
            println!("Current: {}", status.current);
            println!("Required: {}", status.required);
            println!("Sufficient: {}", status.sufficient);
        }
        Commands::GasPrices => {
            let tiers = multisend.gas_price_tiers().await?;
            println!("Gas Prices (wei)");
            println!("================");
            println!("Slow: {}", tiers.slow);
            println!("Average: {}", tiers.average);
            println!("Fast: {}", tiers.fast);
        }
    }

    Ok(())
}
