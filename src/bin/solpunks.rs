//! Command-line front end for the SolPunks presale.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, error};

use presale::blockchain::{Connection, RpcConnection};
use presale::config::Config;
use presale::utils::init_logging;
use presale::wallet::{
    KeypairWallet, LocalWalletHost, Navigator, ProviderLocator, SystemNavigator, WalletHost,
};
use presale::Presale;

#[derive(Debug, Parser)]
#[command(name = "solpunks", author, version, about = "SolPunks presale CLI", long_about = None)]
struct Args {
    /// Path to the configuration file (TOML); default locations are searched when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", env = "PRESALE_LOG_LEVEL")]
    log_level: String,

    /// Print the default configuration to stdout and exit
    #[arg(long)]
    print_default_config: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show how much SOL has been raised towards the goal
    Progress,
    /// Buy into the presale by sending SOL from the configured wallet
    Buy {
        /// Amount in SOL, e.g. 0.5
        #[arg(short, long)]
        amount: String,
    },
    /// Print the presale address for sending SOL manually
    Address,
    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
    /// Check the configuration for errors
    CheckConfig,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level);

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if args.print_default_config {
        println!("{}", Config::default_toml());
        return Ok(());
    }

    let config_path = args.config.as_deref();
    match args.command.unwrap_or(Command::Progress) {
        | Command::Init { output, force } => init_config(&output, force),
        | Command::CheckConfig => {
            load_config(config_path)?;
            println!("{} configuration is valid", "ok:".green().bold());
            Ok(())
        }
        | Command::Address => {
            println!("{}", load_config(config_path)?.presale.recipient);
            Ok(())
        }
        | Command::Progress => {
            let (presale, _) = open_presale(&load_config(config_path)?)?;
            let progress = presale.progress().await.context("failed to fetch balance")?;
            println!("{} SOL RAISED", progress.sol_raised().to_string().as_str().bold());
            println!("{}", progress);
            Ok(())
        }
        | Command::Buy { amount } => buy(&load_config(config_path)?, &amount).await,
    }
}

/// Load and validate the configuration
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        | Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        | None => Config::load().context("failed to load configuration")?,
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }
    Config::default().save(output)?;
    println!("wrote {}", output.display());
    Ok(())
}

fn open_presale(config: &Config) -> Result<(Presale, Arc<dyn Connection>)> {
    let connection: Arc<dyn Connection> =
        Arc::new(RpcConnection::new(config.solana.connection_config()?));
    let presale = Presale::new(
        connection.clone(),
        &config.presale.recipient,
        config.presale.goal_lamports()?,
        config.solana.commitment_config()?,
    )?;
    Ok((presale, connection))
}

/// Host exposing the configured keypair under the configured provider name
fn wallet_host(config: &Config, connection: Arc<dyn Connection>) -> Result<LocalWalletHost> {
    let mut host = LocalWalletHost::new();
    if config.has_wallet() {
        let keypair = config.load_keypair().context("failed to load wallet keypair")?;
        let wallet = KeypairWallet::new(connection, keypair);
        debug!("using wallet {}", wallet.pubkey());
        host.register(&config.provider.namespace, &config.provider.network, Arc::new(wallet));
    }
    Ok(host)
}

async fn buy(config: &Config, amount: &str) -> Result<()> {
    let (presale, connection) = open_presale(config)?;
    let host: Arc<dyn WalletHost> = Arc::new(wallet_host(config, connection)?);
    let navigator: Arc<dyn Navigator> = Arc::new(SystemNavigator::new());
    let locator = ProviderLocator::new(Some(host), navigator, config.provider.clone());
    let provider = locator.locate();

    match presale.buy(provider.as_deref(), amount).await {
        | Ok(receipt) => {
            println!("{}", receipt.message().as_str().green());
            match presale.progress().await {
                | Ok(progress) => println!("{}", progress),
                | Err(e) => debug!("could not refresh progress: {}", e),
            }
            Ok(())
        }
        | Err(e) => bail!("Transaction failed: {}", e),
    }
}
