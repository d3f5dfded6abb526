//! Payment confirmation flow: provider redirect → server-side confirmation →
//! backend recharge → optional encrypted card persistence.
//!
//! The recharge is only invoked after the provider reports `Approved`, so no
//! partial recharge is possible. Every step failure sets a human-readable
//! message and halts the chain.

use log::{info, warn};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::client::{RechargeRequest, SaveUserCardRequest, WalletApi};
use crate::constants::{SUCCESS_REDIRECT_DELAY_MS, WALLET_ROUTE};
use crate::convert::minor_units_to_usd;
use crate::error::WalletError;
use crate::models::{
    PaymentOutcome, PaymentState, ProviderConfirmation, RedirectDirective, RedirectParams,
};

pub mod card;
pub mod payphone;

pub use card::{decrypt_card_holder, encrypt_card_holder};
pub use payphone::{PaymentProvider, PayphoneClient};

const APPROVED: &str = "Approved";

/// The user on whose behalf the flow runs.
#[derive(Debug, Clone)]
pub struct PaymentUser {
    pub email: String,
    pub user_id: String,
}

pub struct PaymentFlow {
    provider: Arc<dyn PaymentProvider>,
    api: Arc<dyn WalletApi>,
    card_encryption_key: Option<String>,
    state: Mutex<PaymentState>,
}

impl PaymentFlow {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        api: Arc<dyn WalletApi>,
        card_encryption_key: Option<String>,
    ) -> Self {
        PaymentFlow {
            provider,
            api,
            card_encryption_key,
            state: Mutex::new(PaymentState::Pending),
        }
    }

    pub fn state(&self) -> PaymentState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: PaymentState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Drives the whole state machine for one provider redirect. Missing or
    /// malformed redirect parameters terminate immediately with zero network
    /// calls.
    pub async fn run(&self, user: &PaymentUser, params: &RedirectParams) -> PaymentOutcome {
        let (Some(raw_id), Some(client_tx_id)) =
            (params.id.as_deref(), params.client_transaction_id.as_deref())
        else {
            warn!("Payment redirect missing id or clientTransactionId");
            self.set_state(PaymentState::Failed);
            return PaymentOutcome::failed("Parámetros de pago inválidos");
        };
        let Ok(transaction_id) = raw_id.parse::<i64>() else {
            warn!("Non-numeric provider transaction id: {}", raw_id);
            self.set_state(PaymentState::Failed);
            return PaymentOutcome::failed("Parámetros de pago inválidos");
        };

        self.set_state(PaymentState::Confirming);
        let confirmation = match self.provider.confirm(transaction_id, client_tx_id).await {
            Ok(c) => c,
            Err(e) => {
                warn!("Provider confirmation failed: {}", e);
                self.set_state(PaymentState::Failed);
                return PaymentOutcome::failed(format!("No se pudo confirmar el pago: {e}"));
            }
        };

        if confirmation.status != APPROVED {
            info!(
                "Provider reported status {:?} for transaction {}",
                confirmation.status, transaction_id
            );
            self.set_state(PaymentState::Failed);
            return PaymentOutcome::failed("Transacción rechazada o cancelada");
        }
        self.set_state(PaymentState::Approved);

        self.set_state(PaymentState::Recharging);
        let wallet = match self.recharge(user, &confirmation).await {
            Ok(w) => w,
            Err(e) => {
                warn!("Recharge after approval failed: {}", e);
                self.set_state(PaymentState::Failed);
                return PaymentOutcome::failed(format!("No se pudo acreditar la recarga: {e}"));
            }
        };

        // Best effort: the recharge already landed, a card-persistence
        // failure must not be reported as a failed payment.
        if confirmation.card_token.is_some() {
            if let Err(e) = self.persist_card(user, &confirmation).await {
                warn!("Card persistence skipped: {}", e);
            }
        }

        self.set_state(PaymentState::RechargeDone);
        info!(
            "Recharge complete for wallet {} ({} USD)",
            wallet.id,
            minor_units_to_usd(confirmation.amount)
        );
        PaymentOutcome {
            state: PaymentState::RechargeDone,
            message: "Recarga exitosa".to_string(),
            wallet: Some(wallet),
            redirect: Some(RedirectDirective {
                to: WALLET_ROUTE.to_string(),
                after_ms: SUCCESS_REDIRECT_DELAY_MS,
            }),
        }
    }

    async fn recharge(
        &self,
        user: &PaymentUser,
        confirmation: &ProviderConfirmation,
    ) -> Result<crate::models::Wallet, WalletError> {
        let wallet = self
            .api
            .get_wallet_by_user_id(&user.email, Some(&user.user_id))
            .await?;
        // Provider amounts are minor units; a fresh idempotency token per
        // attempt lets the backend deduplicate retries.
        self.api
            .create_recharge(RechargeRequest {
                wallet_id: wallet.id,
                amount_usd: minor_units_to_usd(confirmation.amount),
                reference_code: confirmation.transaction_id.to_string(),
                client_transaction_id: Uuid::new_v4().to_string(),
                payphone_transaction_id: Some(confirmation.transaction_id.to_string()),
            })
            .await
    }

    async fn persist_card(
        &self,
        user: &PaymentUser,
        confirmation: &ProviderConfirmation,
    ) -> Result<(), WalletError> {
        let token = confirmation
            .card_token
            .clone()
            .ok_or_else(|| WalletError::Encryption("no card token present".to_string()))?;
        let key = self.card_encryption_key.as_deref().ok_or_else(|| {
            WalletError::Config("card encryption key not configured".to_string())
        })?;
        let holder = confirmation
            .card_holder
            .as_deref()
            .unwrap_or(user.email.as_str());
        let encrypted = encrypt_card_holder(holder, key)?;

        self.api
            .save_user_card(SaveUserCardRequest {
                card_token: token,
                card_holder_encrypted: encrypted,
                brand: confirmation.card_brand.clone(),
                last_digits: confirmation.last_digits.clone(),
            })
            .await
    }
}
