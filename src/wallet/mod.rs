//! Wallet discovery and signing

pub mod keypair;
pub mod navigator;
pub mod provider;

pub use keypair::KeypairWallet;
pub use navigator::{LogNavigator, SystemNavigator};
pub use provider::{
    LocalWalletHost, Navigator, ProviderLocator, VendorSpec, WalletHost, WalletProvider,
};
