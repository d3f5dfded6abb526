use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::convert::{RawBalance, convert_backend_balance};

/// Wallet record exactly as the backend serializes it. The balance fields are
/// duck-typed (integer, float, or decimal string) and must go through the
/// conversion boundary before the rest of the crate touches them.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendWallet {
    pub id: String,
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
    pub becoin_balance: RawBalance,
    #[serde(default)]
    pub locked_balance: Option<RawBalance>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub qr: Option<String>,
    // Opaque to the client; carried through but never decrypted here.
    #[serde(default)]
    pub private_key_encrypted: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Normalized wallet with balances in canonical BeCoins.
#[derive(Debug, Clone, Serialize)]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub becoin_balance: f64,
    pub locked_balance: f64,
    pub alias: Option<String>,
    pub address: Option<String>,
    pub qr: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Wallet {
    /// Decode boundary for backend wallets. Unexpected shapes fail at serde
    /// time; known-ambiguous numeric fields fall back to zero with a warning.
    pub fn from_backend(raw: BackendWallet) -> Self {
        let becoin_balance = match convert_backend_balance(&raw.becoin_balance) {
            Ok(v) => v,
            Err(e) => {
                warn!("Malformed becoin_balance for wallet {}: {}", raw.id, e);
                0.0
            }
        };
        let locked_balance = match raw.locked_balance.as_ref() {
            None => 0.0,
            Some(lb) => match convert_backend_balance(lb) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Malformed locked_balance for wallet {}: {}", raw.id, e);
                    0.0
                }
            },
        };

        Wallet {
            id: raw.id,
            user_id: raw.user_id,
            becoin_balance,
            locked_balance,
            alias: raw.alias,
            address: raw.address,
            qr: raw.qr,
            created_at: raw.created_at,
        }
    }
}
