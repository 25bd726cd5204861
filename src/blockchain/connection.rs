use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};
use solana_client::nonblocking::rpc_client::RpcClient as AsyncRpcClient;
#[cfg(test)]
use mockall::automock;
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

use crate::{Error, Result};

/// Interval between signature status polls while confirming
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Network operations the presale needs from a Solana node.
///
/// Every call suspends until the node answers or the transport gives up;
/// failures come back as [`Error::ConnectionError`] and are never retried here.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    /// Latest blockhash, fetched fresh on every call
    async fn get_latest_blockhash(&self) -> Result<Hash>;

    /// Balance of `pubkey` in lamports
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64>;

    /// Submit an already signed transaction
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature>;

    /// Wait until `signature` reaches `commitment`.
    ///
    /// Returns `Ok(false)` if the signature is still unknown when the wait
    /// runs out.
    async fn confirm_transaction(
        &self, signature: &Signature, commitment: CommitmentConfig,
    ) -> Result<bool>;
}

/// Configuration for the RPC connection
#[derive(Debug, Clone)]
pub struct RpcConnectionConfig {
    pub rpc_url: String,
    pub commitment: CommitmentLevel,
    pub timeout_seconds: u64,
}

impl Default for RpcConnectionConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: CommitmentLevel::Confirmed,
            timeout_seconds: 30,
        }
    }
}

/// [`Connection`] backed by a JSON-RPC node
pub struct RpcConnection {
    client: AsyncRpcClient,
    config: RpcConnectionConfig,
}

impl RpcConnection {
    /// Create a new connection; no request is made until first use
    pub fn new(config: RpcConnectionConfig) -> Self {
        let client = AsyncRpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            CommitmentConfig { commitment: config.commitment },
        );

        Self { client, config }
    }

    #[cfg(test)]
    fn with_client(client: AsyncRpcClient, config: RpcConnectionConfig) -> Self {
        Self { client, config }
    }

    /// Total time `confirm_transaction` may take, status requests included
    fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }
}

#[async_trait]
impl Connection for RpcConnection {
    async fn get_latest_blockhash(&self) -> Result<Hash> {
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| Error::ConnectionError(format!("Failed to get latest blockhash: {}", e)))?;
        debug!("latest blockhash {}", blockhash);
        Ok(blockhash)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        self.client
            .get_balance(pubkey)
            .await
            .map_err(|e| Error::ConnectionError(format!("Failed to get balance: {}", e)))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(|e| Error::ConnectionError(format!("Failed to send transaction: {}", e)))
    }

    async fn confirm_transaction(
        &self, signature: &Signature, commitment: CommitmentConfig,
    ) -> Result<bool> {
        let started = Instant::now();
        let deadline = started + self.confirm_timeout();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let poll = self.client.get_signature_status_with_commitment(signature, commitment);
            // a status request cut off by the deadline counts as "not seen yet"
            let status = match tokio::time::timeout(remaining, poll).await {
                | Ok(status) => status.map_err(|e| {
                    Error::ConnectionError(format!("Failed to get signature status: {}", e))
                })?,
                | Err(_) => None,
            };

            match status {
                | Some(Ok(())) => return Ok(true),
                | Some(Err(e)) => {
                    return Err(Error::ConnectionError(format!(
                        "Transaction {} failed: {}",
                        signature, e
                    )))
                }
                | None if Instant::now() + CONFIRM_POLL_INTERVAL >= deadline => {
                    warn!("gave up waiting for {} after {:?}", signature, started.elapsed());
                    return Ok(false);
                }
                | None => tokio::time::sleep(CONFIRM_POLL_INTERVAL).await,
            }
        }
    }
}
