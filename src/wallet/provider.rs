//! Wallet provider discovery.
//!
//! A wallet extension announces itself on the host as
//! `<namespace>.<network>` (Phantom uses `phantom.solana`) and carries a flag
//! saying which vendor it is. Nothing here reads process-wide state: the host
//! and the navigator used to send users to the install page are passed in.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::Transaction};

use crate::Result;

pub const PHANTOM_NAMESPACE: &str = "phantom";
pub const SOLANA_NETWORK: &str = "solana";
pub const PHANTOM_INSTALL_URL: &str = "https://phantom.app/";

/// A wallet able to sign and broadcast on behalf of the buyer
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether the provider identifies itself as the expected vendor
    fn is_expected_vendor(&self) -> bool;

    /// Public key of the connected account, `None` until connected
    fn public_key(&self) -> Option<Pubkey>;

    /// Sign `transaction` and submit it, returning the signature
    async fn sign_and_send_transaction(&self, transaction: Transaction) -> Result<Signature>;
}

/// Host environment that may expose wallet providers
#[cfg_attr(test, automock)]
pub trait WalletHost: Send + Sync {
    fn lookup(&self, namespace: &str, network: &str) -> Option<Arc<dyn WalletProvider>>;
}

/// Opens a URL in a new browsing context
#[cfg_attr(test, automock)]
pub trait Navigator: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Which provider to look for and where to send users who lack it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSpec {
    pub namespace: String,
    pub network: String,
    pub install_url: String,
}

impl VendorSpec {
    pub fn phantom() -> Self {
        Self {
            namespace: PHANTOM_NAMESPACE.to_string(),
            network: SOLANA_NETWORK.to_string(),
            install_url: PHANTOM_INSTALL_URL.to_string(),
        }
    }
}

impl Default for VendorSpec {
    fn default() -> Self {
        Self::phantom()
    }
}

/// Finds the wallet provider for a [`VendorSpec`]
pub struct ProviderLocator {
    host: Option<Arc<dyn WalletHost>>,
    navigator: Arc<dyn Navigator>,
    vendor: VendorSpec,
}

impl ProviderLocator {
    /// `host` is `None` when there is no global window to inspect, as during
    /// server-side rendering or a headless run.
    pub fn new(
        host: Option<Arc<dyn WalletHost>>, navigator: Arc<dyn Navigator>, vendor: VendorSpec,
    ) -> Self {
        Self { host, navigator, vendor }
    }

    /// Return the expected vendor's provider if the host has it.
    ///
    /// Without a host this is a silent `None`. With a host but no provider, or
    /// a provider flagged as another vendor, the install page is opened once
    /// and `None` is returned.
    pub fn locate(&self) -> Option<Arc<dyn WalletProvider>> {
        let host = self.host.as_ref()?;

        match host.lookup(&self.vendor.namespace, &self.vendor.network) {
            | Some(provider) if provider.is_expected_vendor() => {
                debug!("found {}.{} provider", self.vendor.namespace, self.vendor.network);
                return Some(provider);
            }
            | Some(_) => {
                info!("{}.{} is not the expected vendor", self.vendor.namespace, self.vendor.network)
            }
            | None => info!("no {}.{} provider installed", self.vendor.namespace, self.vendor.network),
        }

        if let Err(e) = self.navigator.open(&self.vendor.install_url) {
            warn!("could not open {}: {}", self.vendor.install_url, e);
        }
        None
    }
}

/// In-process host holding providers registered by the application
#[derive(Default, Clone)]
pub struct LocalWalletHost {
    providers: HashMap<(String, String), Arc<dyn WalletProvider>>,
}

impl LocalWalletHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `provider` as `<namespace>.<network>`, replacing any previous one
    pub fn register(
        &mut self, namespace: &str, network: &str, provider: Arc<dyn WalletProvider>,
    ) -> &mut Self {
        self.providers.insert((namespace.to_string(), network.to_string()), provider);
        self
    }
}

impl WalletHost for LocalWalletHost {
    fn lookup(&self, namespace: &str, network: &str) -> Option<Arc<dyn WalletProvider>> {
        self.providers.get(&(namespace.to_string(), network.to_string())).cloned()
    }
}
