use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use crate::config::Config;
use crate::error::WalletError;
use crate::models::ProviderConfirmation;

/// Server-side confirmation seam for the external payment provider. Tests
/// stub this; production uses [`PayphoneClient`].
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn confirm(
        &self,
        transaction_id: i64,
        client_transaction_id: &str,
    ) -> Result<ProviderConfirmation, WalletError>;
}

#[derive(Serialize)]
struct ConfirmRequest<'a> {
    id: i64,
    #[serde(rename = "clientTxId")]
    client_tx_id: &'a str,
}

/// Payphone confirmation endpoint client.
pub struct PayphoneClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl PayphoneClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        PayphoneClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        PayphoneClient::new(config.payphone_base_url.clone(), config.payphone_token.clone())
    }
}

#[async_trait]
impl PaymentProvider for PayphoneClient {
    async fn confirm(
        &self,
        transaction_id: i64,
        client_transaction_id: &str,
    ) -> Result<ProviderConfirmation, WalletError> {
        debug!("Confirming provider transaction {}", transaction_id);
        let response = self
            .http
            .post(format!("{}/button/V2/Confirm", self.base_url))
            .bearer_auth(&self.token)
            .json(&ConfirmRequest {
                id: transaction_id,
                client_tx_id: client_transaction_id,
            })
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(WalletError::Network {
                status: Some(status),
                message: body,
            });
        }
        response.json().await.map_err(WalletError::from_reqwest)
    }
}
