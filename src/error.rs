use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum WalletError {
    /// Backend request failed, timed out, or returned a non-success status
    #[error("Network error (status {status:?}): {message}")]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// Client-side amount validation failed; never sent to the backend
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Transfer requested without a resolvable recipient
    #[error("Transfer recipient is required")]
    MissingRecipient,

    /// Wallet auto-provisioning failed; fatal for the current operation
    #[error("Wallet provisioning failed: {0}")]
    Provisioning(String),

    /// Only email identifiers are supported for wallet lookup
    #[error("Unsupported wallet identifier: {0}")]
    UnsupportedIdentifier(String),

    /// Transfer target has no wallet; pending transfers are not supported
    #[error("Recipient {0} has no registered wallet")]
    RecipientNotRegistered(String),

    /// Malformed balance or amount representation from the backend
    #[error("Malformed balance representation: {0}")]
    Conversion(String),

    /// Payment provider declined the transaction; terminal, no retry
    #[error("Payment rejected or cancelled: {0}")]
    PaymentRejected(String),

    /// Provider redirect arrived without id or clientTransactionId
    #[error("Missing or invalid payment redirect parameters")]
    InvalidRedirectParams,

    /// Card metadata encryption failed before transmission
    #[error("Card encryption failed: {0}")]
    Encryption(String),

    /// Missing or malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local snapshot read/write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(String),
}

impl WalletError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        WalletError::Network {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
