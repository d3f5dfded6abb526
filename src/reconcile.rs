//! Keeps the local balance store consistent with the backend ledger.
//!
//! Fetch cycles run `Idle → Loading → Idle`. Backend values win on success;
//! network failures are swallowed so a transient outage never blanks the UI
//! balance — the local value stays authoritative until connectivity returns.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::client::WalletApi;
use crate::error::WalletError;
use crate::mapper::map_backend_transactions;
use crate::models::{Transaction, Wallet};
use crate::store::BalanceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Loading,
}

/// Result of one fetch cycle, mainly for observability and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Backend value applied to the local store.
    Updated(f64),
    /// Backend unreachable; local balance kept.
    KeptLocal(String),
    /// A newer fetch started before this one finished; result discarded.
    Stale,
}

pub struct WalletSync {
    api: Arc<dyn WalletApi>,
    store: Arc<BalanceStore>,
    identifier: String,
    user_id: Option<String>,
    state: Mutex<SyncState>,
    generation: AtomicU64,
    last_error: Mutex<Option<String>>,
    wallet: Mutex<Option<Wallet>>,
}

impl WalletSync {
    pub fn new(
        api: Arc<dyn WalletApi>,
        store: Arc<BalanceStore>,
        identifier: impl Into<String>,
        user_id: Option<String>,
    ) -> Self {
        WalletSync {
            api,
            store,
            identifier: identifier.into(),
            user_id,
            state: Mutex::new(SyncState::Idle),
            generation: AtomicU64::new(0),
            last_error: Mutex::new(None),
            wallet: Mutex::new(None),
        }
    }

    /// Fetches the wallet and overwrites the local balance on success.
    /// Stale responses (superseded by a newer fetch) are discarded without
    /// touching the store.
    pub async fn fetch(&self) -> SyncOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(SyncState::Loading);
        debug!("Reconciliation fetch {} for {}", generation, self.identifier);

        let result = self
            .api
            .get_wallet_by_user_id(&self.identifier, self.user_id.as_deref())
            .await;
        self.set_state(SyncState::Idle);

        match result {
            Ok(wallet) => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!("Discarding stale reconciliation result {}", generation);
                    return SyncOutcome::Stale;
                }
                let balance = wallet.becoin_balance;
                self.store.set_balance(balance);
                *self.lock(&self.wallet) = Some(wallet);
                *self.lock(&self.last_error) = None;
                info!("Reconciled balance to {}", balance);
                SyncOutcome::Updated(balance)
            }
            Err(e) => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!("Discarding stale reconciliation failure {}", generation);
                    return SyncOutcome::Stale;
                }
                // Deliberate: never blank the UI balance over a transient
                // network failure.
                warn!("Reconciliation failed, keeping local balance: {}", e);
                let message = e.to_string();
                *self.lock(&self.last_error) = Some(message.clone());
                SyncOutcome::KeptLocal(message)
            }
        }
    }

    /// Manual reconciliation after a mutating action (recharge, transfer).
    pub async fn refetch(&self) -> SyncOutcome {
        self.fetch().await
    }

    /// Fetches and maps the backend transaction history for display.
    pub async fn transaction_history(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, WalletError> {
        let cached = self.lock(&self.wallet).as_ref().map(|w| w.id.clone());
        let wallet_id = match cached {
            Some(id) => id,
            None => {
                let wallet = self
                    .api
                    .get_wallet_by_user_id(&self.identifier, self.user_id.as_deref())
                    .await?;
                let id = wallet.id.clone();
                *self.lock(&self.wallet) = Some(wallet);
                id
            }
        };
        let records = self.api.list_transactions(&wallet_id).await?;
        Ok(map_backend_transactions(&records, now))
    }

    pub fn state(&self) -> SyncState {
        *self.lock(&self.state)
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock(&self.last_error).clone()
    }

    pub fn wallet(&self) -> Option<Wallet> {
        self.lock(&self.wallet).clone()
    }

    fn set_state(&self, state: SyncState) {
        *self.lock(&self.state) = state;
    }

    fn lock<'a, T>(&self, m: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
