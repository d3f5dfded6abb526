pub mod client;
pub mod config;
pub mod constants;
pub mod convert;
pub mod error;
pub mod groups;
pub mod mapper;
pub mod models;
pub mod payment;
pub mod reconcile;
pub mod store;

pub use client::{WalletApi, WalletApiClient};
pub use error::WalletError;
pub use groups::{GroupService, GroupStorage, InMemoryGroupStorage};
pub use payment::{PaymentFlow, PaymentProvider, PaymentUser, PayphoneClient};
pub use reconcile::{SyncOutcome, SyncState, WalletSync};
pub use store::{BalanceStore, CartStore};

#[cfg(test)]
mod tests;
