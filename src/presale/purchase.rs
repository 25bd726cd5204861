use std::sync::Arc;

use log::{info, warn};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature};

use super::amount::{lamports_to_sol, sol_to_lamports};
use super::progress::RaiseProgress;
use crate::blockchain::{build_transfer, parse_address, Connection};
use crate::wallet::WalletProvider;
use crate::{Error, Result};

/// Outcome of a confirmed purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub signature: Signature,
    pub lamports: u64,
    pub payer: Pubkey,
}

impl PurchaseReceipt {
    /// Message shown to the buyer
    pub fn message(&self) -> String {
        format!("Transaction successful: {}", self.signature)
    }
}

/// A presale that collects SOL at a single recipient address
pub struct Presale {
    connection: Arc<dyn Connection>,
    recipient: Pubkey,
    goal_lamports: u64,
    commitment: CommitmentConfig,
}

impl Presale {
    pub fn new(
        connection: Arc<dyn Connection>, recipient: &str, goal_lamports: u64,
        commitment: CommitmentConfig,
    ) -> Result<Self> {
        Ok(Self { connection, recipient: parse_address(recipient)?, goal_lamports, commitment })
    }

    /// Read the recipient's balance and compare it with the goal
    pub async fn progress(&self) -> Result<RaiseProgress> {
        let raised = self.connection.get_balance(&self.recipient).await?;
        Ok(RaiseProgress::new(raised, self.goal_lamports))
    }

    /// Buy with `amount` SOL through `provider`.
    ///
    /// Checks run in order (amount, provider, connected account) and the first
    /// failure is returned before anything touches the network. The transfer is
    /// rebuilt on each call, signed and sent by the provider, then confirmed at
    /// the presale's commitment level. Nothing is retried.
    pub async fn buy(
        &self, provider: Option<&dyn WalletProvider>, amount: &str,
    ) -> Result<PurchaseReceipt> {
        let lamports = sol_to_lamports(amount)?;
        let provider = provider.ok_or(Error::WalletUnavailable)?;
        let payer = provider.public_key().ok_or(Error::WalletNotConnected)?;

        let transfer =
            build_transfer(lamports, &payer, &self.recipient.to_string(), self.connection.as_ref())
                .await?;
        let signature = provider.sign_and_send_transaction(transfer.to_transaction()).await?;
        info!("sent {} SOL from {} in {}", lamports_to_sol(lamports), payer, signature);

        if !self.connection.confirm_transaction(&signature, self.commitment).await? {
            warn!("{} not confirmed at {:?}", signature, self.commitment.commitment);
            return Err(Error::ConnectionError(format!(
                "transaction {} was not confirmed",
                signature
            )));
        }

        Ok(PurchaseReceipt { signature, lamports, payer })
    }
}
