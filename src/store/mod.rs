pub mod balance;
pub mod cart;

pub use balance::{BalanceStore, LocalTransaction};
pub use cart::CartStore;
