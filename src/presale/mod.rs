//! The presale itself: amount entry, raise progress and the buy flow

pub mod amount;
pub mod progress;
pub mod purchase;

pub use amount::{lamports_to_sol, sol_to_lamports, LAMPORTS_PER_SOL};
pub use progress::RaiseProgress;
pub use purchase::{Presale, PurchaseReceipt};
