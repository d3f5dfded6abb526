use async_trait::async_trait;
use chrono::Utc;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WalletError;
use crate::models::{BackendTransaction, BackendWallet, Wallet};

pub mod http;

pub use http::WalletApiClient;

/// Body of `POST /wallets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateWalletRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_encrypted: Option<String>,
}

/// Body of `PUT /wallets/:id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateWalletRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body of `POST /wallets/recharge`. `client_transaction_id` must be a fresh
/// UUID and `reference_code` unique per attempt; the backend deduplicates on
/// them.
#[derive(Debug, Clone, Serialize)]
pub struct RechargeRequest {
    pub wallet_id: String,
    #[serde(rename = "amountUsd")]
    pub amount_usd: f64,
    #[serde(rename = "referenceCode")]
    pub reference_code: String,
    #[serde(rename = "clientTransactionId")]
    pub client_transaction_id: String,
    #[serde(rename = "payphone_transactionId", skip_serializing_if = "Option::is_none")]
    pub payphone_transaction_id: Option<String>,
}

/// Body of `POST /wallets/transfer`.
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub receiver_user_id: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub transfer_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "transactionId")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RechargeResponse {
    pub wallet: BackendWallet,
}

/// Body of `POST /user-cards`. The holder name is encrypted before it gets
/// anywhere near this struct.
#[derive(Debug, Clone, Serialize)]
pub struct SaveUserCardRequest {
    #[serde(rename = "cardToken")]
    pub card_token: String,
    #[serde(rename = "cardHolderEncrypted")]
    pub card_holder_encrypted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "lastDigits", skip_serializing_if = "Option::is_none")]
    pub last_digits: Option<String>,
}

/// Typed façade over the backend wallet endpoints. The reqwest implementation
/// lives in [`http::WalletApiClient`]; flows depend on the trait so tests can
/// stub the seam.
#[async_trait]
pub trait WalletApi: Send + Sync {
    /// Fetches the authenticated user's wallet, auto-provisioning one (alias
    /// derived from the email local part) when the backend reports none.
    async fn get_wallet_by_user_id(
        &self,
        identifier: &str,
        user_id: Option<&str>,
    ) -> Result<Wallet, WalletError>;

    async fn create_wallet(&self, req: CreateWalletRequest) -> Result<Wallet, WalletError>;

    async fn get_wallet(&self, wallet_id: &str) -> Result<Wallet, WalletError>;

    async fn update_wallet(
        &self,
        wallet_id: &str,
        req: UpdateWalletRequest,
    ) -> Result<Wallet, WalletError>;

    async fn create_recharge(&self, req: RechargeRequest) -> Result<Wallet, WalletError>;

    async fn create_transfer(&self, req: TransferRequest) -> Result<TransferResult, WalletError>;

    /// Email-based wallet lookup. Any non-email identifier fails with
    /// `UnsupportedIdentifier` instead of attempting a request.
    async fn find_wallet_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Wallet>, WalletError>;

    async fn list_transactions(
        &self,
        wallet_id: &str,
    ) -> Result<Vec<BackendTransaction>, WalletError>;

    async fn save_user_card(&self, req: SaveUserCardRequest) -> Result<(), WalletError>;

    /// Fetch-or-create the wallet, synthesize a unique reference code, then
    /// delegate to [`WalletApi::create_recharge`].
    async fn recharge_by_user_email(
        &self,
        email: &str,
        user_id: &str,
        amount_usd: f64,
        method: &str,
    ) -> Result<Wallet, WalletError> {
        if amount_usd <= 0.0 {
            return Err(WalletError::InvalidAmount(amount_usd));
        }
        let wallet = self.get_wallet_by_user_id(email, Some(user_id)).await?;
        info!(
            "Recharging wallet {} with {} USD via {}",
            wallet.id, amount_usd, method
        );
        self.create_recharge(RechargeRequest {
            wallet_id: wallet.id,
            amount_usd,
            reference_code: generate_reference_code(),
            client_transaction_id: Uuid::new_v4().to_string(),
            payphone_transaction_id: None,
        })
        .await
    }

    /// Resolves the recipient wallet first; an unregistered recipient is a
    /// hard error, there is no pending-transfer path.
    async fn transfer_between_users(
        &self,
        sender_email: &str,
        recipient_identifier: &str,
        amount: f64,
        description: Option<String>,
    ) -> Result<TransferResult, WalletError> {
        if amount <= 0.0 {
            return Err(WalletError::InvalidAmount(amount));
        }
        if recipient_identifier.trim().is_empty() {
            return Err(WalletError::MissingRecipient);
        }
        let recipient = self
            .find_wallet_by_identifier(recipient_identifier)
            .await?
            .ok_or_else(|| {
                WalletError::RecipientNotRegistered(recipient_identifier.to_string())
            })?;
        info!(
            "Transferring {} BeCoins from {} to user {}",
            amount, sender_email, recipient.user_id
        );
        self.create_transfer(TransferRequest {
            receiver_user_id: recipient.user_id,
            amount,
            description,
            transfer_type: "user_transfer".to_string(),
        })
        .await
    }
}

/// Timestamp plus random suffix; unique per recharge attempt.
pub(crate) fn generate_reference_code() -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("RC-{}-{:04}", Utc::now().timestamp_millis(), suffix)
}
