//! # SolPunks presale
//! Client for the SolPunks token presale on Solana.
//!
//! Finds a wallet provider, builds SOL transfers to the presale address with a
//! fresh blockhash, and reports how much of the raise goal has been reached.

pub use crate::utils::error::{Error, Result};

pub mod blockchain;
pub mod config;
pub mod presale;
pub mod utils;
pub mod wallet;

pub use crate::blockchain::{build_transfer, Connection, RpcConnection, TransferTransaction};
pub use crate::presale::{Presale, PurchaseReceipt, RaiseProgress};
pub use crate::wallet::{ProviderLocator, WalletProvider};
