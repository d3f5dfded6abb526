use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use crate::constants::SNAPSHOT_VERSION;
use crate::convert::{becoins_to_usd, becoins_to_usd_at};
use crate::error::WalletError;
use crate::models::TransactionType;

/// Transaction appended by a local optimistic action. Kept separate from the
/// backend-derived [`crate::models::Transaction`], which is read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalTransaction {
    pub id: Uuid,
    pub tx_type: TransactionType,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    balance: f64,
    history: Vec<LocalTransaction>,
}

#[derive(Debug)]
struct Inner {
    balance: f64,
    history: Vec<LocalTransaction>,
}

/// Locally cached BeCoin balance and optimistic transaction log.
///
/// This is an injected, explicitly-scoped container: construct one, share it
/// behind an `Arc`, and reset it between tests. Mutation is synchronous and
/// all-or-nothing; reads always reflect the latest write.
#[derive(Debug)]
pub struct BalanceStore {
    inner: Mutex<Inner>,
}

impl BalanceStore {
    pub fn new(initial_balance: f64) -> Self {
        BalanceStore {
            inner: Mutex::new(Inner {
                balance: initial_balance.max(0.0),
                history: Vec::new(),
            }),
        }
    }

    /// Loads a persisted snapshot, falling back to `initial_balance` when the
    /// file is missing or unreadable.
    pub fn hydrate(path: &Path, initial_balance: f64) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Snapshot>(&contents) {
                Ok(snapshot) => {
                    info!(
                        "Hydrated balance store from {:?} (balance {})",
                        path, snapshot.balance
                    );
                    BalanceStore {
                        inner: Mutex::new(Inner {
                            balance: snapshot.balance.max(0.0),
                            history: snapshot.history,
                        }),
                    }
                }
                Err(e) => {
                    warn!("Corrupt balance snapshot at {:?}: {}", path, e);
                    BalanceStore::new(initial_balance)
                }
            },
            Err(_) => BalanceStore::new(initial_balance),
        }
    }

    /// Writes the current state as a JSON snapshot.
    pub fn persist(&self, path: &Path) -> Result<(), WalletError> {
        let snapshot = {
            let inner = self.lock();
            Snapshot {
                version: SNAPSHOT_VERSION,
                balance: inner.balance,
                history: inner.history.clone(),
            }
        };
        let json = serde_json::to_string(&snapshot)
            .map_err(|e| WalletError::Storage(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| WalletError::Storage(e.to_string()))?;
        debug!("Persisted balance snapshot to {:?}", path);
        Ok(())
    }

    pub fn balance(&self) -> f64 {
        self.lock().balance
    }

    /// Authoritative overwrite, used after backend reconciliation. Clamped at
    /// non-negative; no other validation.
    pub fn set_balance(&self, amount: f64) {
        let mut inner = self.lock();
        inner.balance = amount.max(0.0);
        debug!("Balance set to {}", inner.balance);
    }

    /// Atomically deducts `amount` and appends a transaction record. Returns
    /// `false` without mutating when the amount is non-positive or exceeds the
    /// current balance.
    pub fn spend(&self, amount: f64, description: &str, category: &str) -> bool {
        let mut inner = self.lock();
        if amount <= 0.0 || amount > inner.balance {
            warn!(
                "Rejected spend of {} (balance {})",
                amount, inner.balance
            );
            return false;
        }
        inner.balance -= amount;
        inner.history.push(LocalTransaction {
            id: Uuid::new_v4(),
            tx_type: TransactionType::Exchange,
            amount,
            description: description.to_string(),
            category: category.to_string(),
            created_at: Utc::now(),
        });
        info!("Spent {} BeCoins, balance now {}", amount, inner.balance);
        true
    }

    /// USD valuation of `amount`, or of the current balance when `None`.
    pub fn balance_in_usd(&self, amount: Option<f64>) -> f64 {
        becoins_to_usd(amount.unwrap_or_else(|| self.balance()))
    }

    pub fn balance_in_usd_at(&self, amount: Option<f64>, usd_per_becoin: f64) -> f64 {
        becoins_to_usd_at(amount.unwrap_or_else(|| self.balance()), usd_per_becoin)
    }

    pub fn history(&self) -> Vec<LocalTransaction> {
        self.lock().history.clone()
    }

    /// Drops all state. Exposed for test scoping and account switches.
    pub fn reset(&self, initial_balance: f64) {
        let mut inner = self.lock();
        inner.balance = initial_balance.max(0.0);
        inner.history.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
