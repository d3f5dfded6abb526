use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Method, RequestBuilder, Response, StatusCode};

use crate::client::{
    CreateWalletRequest, RechargeRequest, RechargeResponse, SaveUserCardRequest, TransferRequest,
    TransferResult, UpdateWalletRequest, WalletApi,
};
use crate::config::Config;
use crate::error::WalletError;
use crate::models::{BackendTransaction, BackendWallet, Wallet};

/// reqwest-backed implementation of [`WalletApi`] against the backend REST
/// surface. All paths are relative to the configured base URL (which carries
/// the `/api` prefix).
pub struct WalletApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl WalletApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        WalletApiClient {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        WalletApiClient::new(config.api_base_url.clone(), config.api_token.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Turns a non-success response into a typed error carrying the HTTP
    /// status and response body.
    async fn error_from(response: Response) -> WalletError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        WalletError::Network {
            status: Some(status),
            message: body,
        }
    }

    async fn decode_wallet(response: Response) -> Result<Wallet, WalletError> {
        let raw: BackendWallet = response.json().await.map_err(WalletError::from_reqwest)?;
        Ok(Wallet::from_backend(raw))
    }
}

#[async_trait]
impl WalletApi for WalletApiClient {
    async fn get_wallet_by_user_id(
        &self,
        identifier: &str,
        user_id: Option<&str>,
    ) -> Result<Wallet, WalletError> {
        debug!("Fetching wallet for {}", identifier);
        let response = self
            .request(Method::GET, "/wallets")
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;

        if response.status() == StatusCode::NOT_FOUND {
            info!("No wallet for {}, provisioning one", identifier);
            let user_id = user_id.ok_or_else(|| {
                WalletError::Provisioning(format!(
                    "user id required to provision a wallet for {identifier}"
                ))
            })?;
            let alias = identifier.split('@').next().map(str::to_string);
            return self
                .create_wallet(CreateWalletRequest {
                    user_id: user_id.to_string(),
                    alias,
                    address: None,
                    private_key_encrypted: None,
                })
                .await
                .map_err(|e| WalletError::Provisioning(e.to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode_wallet(response).await
    }

    async fn create_wallet(&self, req: CreateWalletRequest) -> Result<Wallet, WalletError> {
        info!("Creating wallet for user {}", req.user_id);
        let response = self
            .request(Method::POST, "/wallets")
            .json(&req)
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode_wallet(response).await
    }

    async fn get_wallet(&self, wallet_id: &str) -> Result<Wallet, WalletError> {
        let response = self
            .request(Method::GET, &format!("/wallets/{wallet_id}"))
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode_wallet(response).await
    }

    async fn update_wallet(
        &self,
        wallet_id: &str,
        req: UpdateWalletRequest,
    ) -> Result<Wallet, WalletError> {
        debug!("Updating wallet {}", wallet_id);
        let response = self
            .request(Method::PUT, &format!("/wallets/{wallet_id}"))
            .json(&req)
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode_wallet(response).await
    }

    async fn create_recharge(&self, req: RechargeRequest) -> Result<Wallet, WalletError> {
        info!(
            "Recharge of {} USD for wallet {} (reference {})",
            req.amount_usd, req.wallet_id, req.reference_code
        );
        let response = self
            .request(Method::POST, "/wallets/recharge")
            .json(&req)
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let body: RechargeResponse = response.json().await.map_err(WalletError::from_reqwest)?;
        Ok(Wallet::from_backend(body.wallet))
    }

    async fn create_transfer(&self, req: TransferRequest) -> Result<TransferResult, WalletError> {
        if req.amount <= 0.0 {
            return Err(WalletError::InvalidAmount(req.amount));
        }
        if req.receiver_user_id.trim().is_empty() {
            return Err(WalletError::MissingRecipient);
        }
        info!(
            "Transfer of {} BeCoins to user {}",
            req.amount, req.receiver_user_id
        );
        let response = self
            .request(Method::POST, "/wallets/transfer")
            .json(&req)
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response.json().await.map_err(WalletError::from_reqwest)
    }

    async fn find_wallet_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Wallet>, WalletError> {
        // Only email lookup is supported; anything else is rejected before a
        // request is attempted.
        if !identifier.contains('@') {
            warn!("Unsupported wallet identifier format: {}", identifier);
            return Err(WalletError::UnsupportedIdentifier(identifier.to_string()));
        }
        let response = self
            .request(Method::GET, "/wallets")
            .query(&[("email", identifier)])
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Self::decode_wallet(response).await.map(Some)
    }

    async fn list_transactions(
        &self,
        wallet_id: &str,
    ) -> Result<Vec<BackendTransaction>, WalletError> {
        let response = self
            .request(Method::GET, "/transactions")
            .query(&[("wallet_id", wallet_id)])
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response.json().await.map_err(WalletError::from_reqwest)
    }

    async fn save_user_card(&self, req: SaveUserCardRequest) -> Result<(), WalletError> {
        debug!("Persisting card metadata (token {})", req.card_token);
        let response = self
            .request(Method::POST, "/user-cards")
            .json(&req)
            .send()
            .await
            .map_err(WalletError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}
