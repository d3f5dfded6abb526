use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

use crate::constants::USD_PER_BECOIN;

#[derive(Clone)]
pub struct Config {
    /// Backend REST base URL, including the `/api` prefix.
    pub api_base_url: String,
    /// Bearer token for backend calls; absent when unauthenticated.
    pub api_token: Option<String>,
    /// Payphone API base URL.
    pub payphone_base_url: String,
    /// Payphone bearer token used for server-side confirmation.
    pub payphone_token: String,
    /// Payphone store identifier.
    pub payphone_store_id: String,
    /// Hex-encoded 32-byte key for card-metadata encryption. Never logged.
    pub card_encryption_key: Option<String>,
    /// BeCoin → USD exchange rate.
    pub usd_per_becoin: f64,
    /// Path of the persisted balance snapshot.
    pub snapshot_path: String,
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("payphone_base_url", &self.payphone_base_url)
            .field("payphone_token", &"<redacted>")
            .field("payphone_store_id", &self.payphone_store_id)
            .field(
                "card_encryption_key",
                &self.card_encryption_key.as_ref().map(|_| "<redacted>"),
            )
            .field("usd_per_becoin", &self.usd_per_becoin)
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            api_base_url: env::var("BELAND_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api".to_string()),
            api_token: env::var("BELAND_API_TOKEN").ok(),
            payphone_base_url: env::var("PAYPHONE_API_URL")
                .unwrap_or_else(|_| "https://pay.payphonetodoesposible.com/api".to_string()),
            payphone_token: env::var("PAYPHONE_TOKEN").unwrap_or_default(),
            payphone_store_id: env::var("PAYPHONE_STORE_ID").unwrap_or_default(),
            card_encryption_key: env::var("CARD_ENCRYPTION_KEY").ok(),
            usd_per_becoin: env::var("USD_PER_BECOIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(USD_PER_BECOIN),
            snapshot_path: env::var("WALLET_SNAPSHOT_PATH")
                .unwrap_or_else(|_| "beland-wallet.json".to_string()),
        }
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
