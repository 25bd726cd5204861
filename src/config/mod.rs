//! Configuration module for the presale client

use crate::blockchain::{parse_address, RpcConnectionConfig};
use crate::presale::LAMPORTS_PER_SOL;
use crate::utils::error::{Error, Result};
use crate::wallet::VendorSpec;
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::signature::{read_keypair_file, Keypair};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration file version
    pub version: String,
    /// Solana RPC configuration
    pub solana: SolanaConfig,

    /// Presale configuration
    pub presale: PresaleConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Wallet provider to look for
    #[serde(default)]
    pub provider: VendorSpec,
}

/// Solana RPC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolanaConfig {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Commitment level (processed, confirmed, finalized)
    pub commitment: String,

    /// Timeout for RPC requests in seconds; also bounds confirmation waits
    pub timeout_seconds: u64,
}

/// Presale configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresaleConfig {
    /// Address collecting the presale SOL
    pub recipient: String,

    /// Fundraising goal in whole SOL
    pub goal_sol: u64,
}

/// Wallet configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Wallet private key (base58 encoded)
    pub private_key: Option<String>,

    /// Wallet file path (alternative to private_key)
    pub keypair_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            solana: SolanaConfig::default(),
            presale: PresaleConfig::default(),
            wallet: WalletConfig::default(),
            provider: VendorSpec::default(),
        }
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for PresaleConfig {
    fn default() -> Self {
        Self { recipient: "9u92hBMxYgcGNi1JYSbRsuEM1CsLVW48G7jKG6rRhXr8".to_string(), goal_sol: 1000 }
    }
}

impl SolanaConfig {
    /// Parsed commitment level
    pub fn commitment_level(&self) -> Result<CommitmentLevel> {
        CommitmentLevel::from_str(self.commitment.trim()).map_err(|_| {
            Error::ConfigError(format!(
                "Unknown commitment '{}' (expected processed, confirmed or finalized)",
                self.commitment
            ))
        })
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        Ok(CommitmentConfig { commitment: self.commitment_level()? })
    }

    pub fn connection_config(&self) -> Result<RpcConnectionConfig> {
        Ok(RpcConnectionConfig {
            rpc_url: self.rpc_url.clone(),
            commitment: self.commitment_level()?,
            timeout_seconds: self.timeout_seconds,
        })
    }
}

impl PresaleConfig {
    pub fn goal_lamports(&self) -> Result<u64> {
        self.goal_sol
            .checked_mul(LAMPORTS_PER_SOL)
            .ok_or_else(|| Error::ConfigError(format!("goal_sol {} is too large", self.goal_sol)))
    }
}

impl Config {
    /// Serialize default config to TOML string
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).expect("serialize default config")
    }

    /// Load configuration from a specific file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {:?}: {}", path.as_ref(), e))
        })?;
        let mut cfg: Self = toml::from_str(&content)?;
        cfg.merge_env()?;
        Ok(cfg)
    }

    /// Save the configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        // Create parent directories if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }
        fs::write(path, content).map_err(|e| {
            Error::ConfigError(format!("Failed to write config file {:?}: {}", path, e))
        })?;
        Ok(())
    }

    /// Validate the configuration for required fields and reasonable values
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::ConfigError("Config version must be set (e.g., '0.1.0')".to_string()));
        }
        // Solana config
        if self.solana.rpc_url.trim().is_empty() {
            return Err(Error::ConfigError("Solana RPC URL must be set".to_string()));
        }
        url::Url::parse(&self.solana.rpc_url)
            .map_err(|e| Error::ConfigError(format!("Invalid Solana RPC URL: {}", e)))?;
        self.solana.commitment_level()?;
        if self.solana.timeout_seconds == 0 {
            return Err(Error::ConfigError("Solana timeout_seconds must be > 0".to_string()));
        }
        // Presale config
        parse_address(&self.presale.recipient)
            .map_err(|e| Error::ConfigError(format!("presale.recipient: {}", e)))?;
        if self.presale.goal_sol == 0 {
            return Err(Error::ConfigError("presale.goal_sol must be > 0".to_string()));
        }
        self.presale.goal_lamports()?;
        // Provider config
        if self.provider.namespace.trim().is_empty() || self.provider.network.trim().is_empty() {
            return Err(Error::ConfigError(
                "provider.namespace and provider.network must be set".to_string(),
            ));
        }
        url::Url::parse(&self.provider.install_url)
            .map_err(|e| Error::ConfigError(format!("Invalid provider.install_url: {}", e)))?;
        Ok(())
    }

    /// Load configuration from default locations: `./config.toml`, then the
    /// user config directory, else defaults
    pub fn load() -> Result<Self> {
        let mut candidates = vec![PathBuf::from("config.toml")];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("solpunks").join("config.toml"));
        }
        Self::load_from(&candidates)
    }

    /// The first existing file wins; a file that exists but fails to parse is
    /// an error, not a reason to fall through
    fn load_from(candidates: &[PathBuf]) -> Result<Self> {
        if let Some(path) = candidates.iter().find(|p| p.exists()) {
            return Self::from_file(path);
        }

        let mut config = Self::default();
        config.merge_env()?;
        Ok(config)
    }

    /// Merge environment variables into the configuration
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(rpc_url) = env::var("SOLANA_RPC_URL") {
            self.solana.rpc_url = rpc_url;
        }

        if let Ok(recipient) = env::var("PRESALE_RECIPIENT") {
            self.presale.recipient = recipient;
        }

        if let Ok(private_key) = env::var("WALLET_PRIVATE_KEY") {
            self.wallet.private_key = Some(private_key);
        }

        if let Ok(env_keypair) = env::var("SOLANA_KEYPAIR") {
            self.wallet.keypair_path = Some(env_keypair);
        }

        // Takes precedence over SOLANA_KEYPAIR
        if let Ok(keypair_path) = env::var("WALLET_KEYPAIR_PATH") {
            self.wallet.keypair_path = Some(keypair_path);
        }

        Ok(())
    }

    /// Whether any signing key is configured
    pub fn has_wallet(&self) -> bool {
        self.wallet.private_key.is_some() || self.wallet.keypair_path.is_some()
    }

    pub fn load_keypair(&self) -> Result<Keypair> {
        // Try to load from private key first
        if let Some(ref private_key) = self.wallet.private_key {
            let bytes: Vec<u8> = bs58::decode(private_key.trim()).into_vec()?;
            let keypair = Keypair::from_bytes(&bytes)
                .map_err(|e| Error::WalletError(format!("Keypair from_bytes error: {}", e)))?;
            return Ok(keypair);
        }

        // Then try to load from keypair file
        if let Some(ref keypair_path) = self.wallet.keypair_path {
            let contents = fs::read_to_string(keypair_path).map_err(|e| {
                Error::WalletError(format!("Failed to read keypair file {}: {}", keypair_path, e))
            })?;
            let trimmed = contents.trim();

            // Solana CLI format: JSON array of 64 bytes
            if trimmed.starts_with('[') {
                return read_keypair_file(keypair_path).map_err(|e| {
                    Error::WalletError(format!("Invalid keypair file {}: {}", keypair_path, e))
                });
            }

            let decoded = bs58::decode(trimmed.trim_matches('"')).into_vec()?;
            let keypair = Keypair::from_bytes(&decoded)
                .map_err(|e| Error::WalletError(format!("Keypair from_bytes error: {}", e)))?;
            return Ok(keypair);
        }

        Err(Error::WalletError("No wallet private key or keypair file provided".to_string()))
    }
}
