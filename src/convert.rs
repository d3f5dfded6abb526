//! Conversion boundary between backend balance representations and canonical
//! BeCoins, and between BeCoins and USD.
//!
//! The backend serializes balances in three shapes: a JSON integer (scaled
//! minor units), a JSON float (canonical BeCoins), or a decimal string
//! (canonical BeCoins). Detection is by representation, so converting an
//! already-canonical value is idempotent.

use serde::{Deserialize, Serialize};

use crate::constants::{BALANCE_SCALE, PROVIDER_MINOR_UNITS, USD_PER_BECOIN};
use crate::error::WalletError;

/// Balance exactly as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBalance {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<f64> for RawBalance {
    fn from(v: f64) -> Self {
        RawBalance::Float(v)
    }
}

/// Normalizes a backend balance to canonical BeCoins.
///
/// Integer form is backend-scaled and divided by [`BALANCE_SCALE`]; float and
/// decimal-string forms are already canonical. Malformed input fails with
/// `WalletError::Conversion`; callers decide the fallback (commonly zero).
pub fn convert_backend_balance(raw: &RawBalance) -> Result<f64, WalletError> {
    match raw {
        RawBalance::Int(n) => Ok(*n as f64 / BALANCE_SCALE),
        RawBalance::Float(v) => {
            if v.is_finite() {
                Ok(*v)
            } else {
                Err(WalletError::Conversion(format!("non-finite balance: {v}")))
            }
        }
        RawBalance::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| WalletError::Conversion(format!("unparseable balance: {s:?}")))
        }
    }
}

/// Normalizes a backend transaction amount. Transaction amounts arrive
/// unscaled, independent of the wallet balance representation. Sign is
/// preserved; the mapper takes the magnitude at the display boundary.
pub fn convert_backend_transaction_amount(raw: f64) -> Result<f64, WalletError> {
    if raw.is_finite() {
        Ok(raw)
    } else {
        Err(WalletError::Conversion(format!(
            "non-finite transaction amount: {raw}"
        )))
    }
}

pub fn becoins_to_usd(becoins: f64) -> f64 {
    becoins_to_usd_at(becoins, USD_PER_BECOIN)
}

pub fn becoins_to_usd_at(becoins: f64, usd_per_becoin: f64) -> f64 {
    becoins * usd_per_becoin
}

/// Two-decimal USD display format.
pub fn format_usd_price(value: f64) -> String {
    format!("${value:.2}")
}

/// Payment-provider amounts always arrive in cents.
pub fn minor_units_to_usd(minor: i64) -> f64 {
    minor as f64 / PROVIDER_MINOR_UNITS
}
