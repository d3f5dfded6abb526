pub mod cart;
pub mod group;
pub mod payment;
pub mod transaction;
pub mod wallet;

pub use cart::CartItem;
pub use group::{Group, GroupProduct, GroupStatus};
pub use payment::{
    PaymentOutcome, PaymentState, ProviderConfirmation, RedirectDirective, RedirectParams,
};
pub use transaction::{
    BackendTransaction, LabelRef, Transaction, TransactionStatus, TransactionType,
};
pub use wallet::{BackendWallet, Wallet};
