use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::Wallet;

/// Query parameters the payment provider appends to the return URL.
#[derive(Debug, Clone, Default)]
pub struct RedirectParams {
    pub id: Option<String>,
    pub client_transaction_id: Option<String>,
}

impl RedirectParams {
    pub fn new(id: Option<String>, client_transaction_id: Option<String>) -> Self {
        RedirectParams {
            id,
            client_transaction_id,
        }
    }

    /// Extracts `id` and `clientTransactionId` from a provider return URL.
    /// Missing parameters stay `None`; the flow treats that as terminal.
    pub fn from_return_url(raw: &str) -> Self {
        let Ok(url) = Url::parse(raw) else {
            return RedirectParams::default();
        };
        let mut params = RedirectParams::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "id" => params.id = Some(value.into_owned()),
                "clientTransactionId" => params.client_transaction_id = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// Provider confirmation response. Amounts are in minor units (cents).
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfirmation {
    #[serde(rename = "transactionId")]
    pub transaction_id: i64,
    #[serde(rename = "clientTransactionId")]
    pub client_transaction_id: String,
    #[serde(rename = "transactionStatus")]
    pub status: String,
    pub amount: i64,
    #[serde(default, rename = "cardToken")]
    pub card_token: Option<String>,
    #[serde(default, rename = "cardBrand")]
    pub card_brand: Option<String>,
    #[serde(default, rename = "lastDigits")]
    pub last_digits: Option<String>,
    #[serde(default, rename = "cardHolder")]
    pub card_holder: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Pending,
    Confirming,
    Approved,
    Recharging,
    RechargeDone,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedirectDirective {
    pub to: String,
    pub after_ms: u64,
}

/// Terminal result of one payment-confirmation run.
#[derive(Debug, Serialize)]
pub struct PaymentOutcome {
    pub state: PaymentState,
    pub message: String,
    pub wallet: Option<Wallet>,
    pub redirect: Option<RedirectDirective>,
}

impl PaymentOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        PaymentOutcome {
            state: PaymentState::Failed,
            message: message.into(),
            wallet: None,
            redirect: None,
        }
    }
}
