//! Error handling for the presale client.

use thiserror::Error;

/// Main error type for the presale client
#[derive(Debug, Error)]
pub enum Error {
    /// Destination or wallet address that is not a valid Solana public key
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// SOL amount that cannot be turned into a positive number of lamports
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// No wallet provider is installed in the host environment
    #[error("No supported wallet available; install Phantom to proceed")]
    WalletUnavailable,

    /// A provider was found but exposes no public key yet
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// Wallet-related errors (signing, key loading)
    #[error("Wallet error: {0}")]
    WalletError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Connection / network errors
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

/// Result type for the presale client
pub type Result<T> = std::result::Result<T, Error>;

impl From<bs58::decode::Error> for Error {
    fn from(err: bs58::decode::Error) -> Self {
        Error::WalletError(format!("bs58 decode error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_error = Error::ConfigError("missing field".to_string());
        assert_eq!(config_error.to_string(), "Configuration error: missing field");

        let address_error = Error::InvalidAddress("not-a-valid-address".to_string());
        assert_eq!(address_error.to_string(), "Invalid address: not-a-valid-address");

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let wrapped_io_error = Error::from(io_error);
        assert!(wrapped_io_error.to_string().contains("I/O error"));

        let toml_error: Error = toml::from_str::<toml::Table>("key = ").unwrap_err().into();
        assert!(toml_error.to_string().starts_with("TOML error"));
    }

    #[test]
    fn test_bs58_error_is_wallet_error() {
        let err: Error = bs58::decode("0OIl").into_vec().unwrap_err().into();
        assert!(matches!(err, Error::WalletError(_)));
    }
}
