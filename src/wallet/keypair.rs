use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use super::provider::WalletProvider;
use crate::blockchain::Connection;
use crate::{Error, Result};

/// Wallet provider backed by a local keypair (keypair + connection)
#[derive(Clone)]
pub struct KeypairWallet {
    connection: Arc<dyn Connection>,
    keypair: Arc<Keypair>,
}

impl KeypairWallet {
    /// Create wallet from a keypair and the connection used to broadcast
    pub fn new(connection: Arc<dyn Connection>, keypair: Keypair) -> Self {
        Self { connection, keypair: Arc::new(keypair) }
    }

    /// Public key of the wallet
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl WalletProvider for KeypairWallet {
    fn is_expected_vendor(&self) -> bool {
        true
    }

    fn public_key(&self) -> Option<Pubkey> {
        Some(self.pubkey())
    }

    async fn sign_and_send_transaction(&self, mut transaction: Transaction) -> Result<Signature> {
        let recent_blockhash = transaction.message.recent_blockhash;
        transaction
            .try_sign(&[self.keypair.as_ref()], recent_blockhash)
            .map_err(|e| Error::WalletError(format!("Failed to sign transaction: {}", e)))?;
        let signature = self.connection.send_transaction(&transaction).await?;
        info!("submitted {}", signature);
        Ok(signature)
    }
}
