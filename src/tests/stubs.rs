use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::client::{
    CreateWalletRequest, RechargeRequest, SaveUserCardRequest, TransferRequest, TransferResult,
    UpdateWalletRequest, WalletApi,
};
use crate::error::WalletError;
use crate::models::{BackendTransaction, ProviderConfirmation, Wallet};
use crate::payment::PaymentProvider;

pub fn sample_wallet(balance: f64) -> Wallet {
    Wallet {
        id: "w-1".to_string(),
        user_id: "uid-1".to_string(),
        becoin_balance: balance,
        locked_balance: 0.0,
        alias: Some("sample".to_string()),
        address: None,
        qr: None,
        created_at: None,
    }
}

/// WalletApi stub recording every mutating call.
pub struct StubWalletApi {
    pub wallet: Wallet,
    pub fail_get_wallet: bool,
    /// The first wallet fetch sleeps this long and then fails; later fetches
    /// behave normally. Lets tests race a slow failure against a fresh fetch.
    pub slow_fail_first_get_ms: Option<u64>,
    pub find_result: Option<Wallet>,
    pub transactions: Vec<BackendTransaction>,
    pub recharges: Mutex<Vec<RechargeRequest>>,
    pub cards: Mutex<Vec<SaveUserCardRequest>>,
    pub calls: AtomicUsize,
    get_wallet_calls: AtomicUsize,
}

impl StubWalletApi {
    pub fn new(wallet: Wallet) -> Self {
        StubWalletApi {
            wallet,
            fail_get_wallet: false,
            slow_fail_first_get_ms: None,
            find_result: None,
            transactions: Vec::new(),
            recharges: Mutex::new(Vec::new()),
            cards: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            get_wallet_calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletApi for StubWalletApi {
    async fn get_wallet_by_user_id(
        &self,
        _identifier: &str,
        _user_id: Option<&str>,
    ) -> Result<Wallet, WalletError> {
        self.bump();
        let call = self.get_wallet_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ms) = self.slow_fail_first_get_ms
            && call == 0
        {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
            return Err(WalletError::Network {
                status: None,
                message: "request timed out".to_string(),
            });
        }
        if self.fail_get_wallet {
            return Err(WalletError::Network {
                status: None,
                message: "connection refused".to_string(),
            });
        }
        Ok(self.wallet.clone())
    }

    async fn create_wallet(&self, _req: CreateWalletRequest) -> Result<Wallet, WalletError> {
        self.bump();
        Ok(self.wallet.clone())
    }

    async fn get_wallet(&self, _wallet_id: &str) -> Result<Wallet, WalletError> {
        self.bump();
        Ok(self.wallet.clone())
    }

    async fn update_wallet(
        &self,
        _wallet_id: &str,
        _req: UpdateWalletRequest,
    ) -> Result<Wallet, WalletError> {
        self.bump();
        Ok(self.wallet.clone())
    }

    async fn create_recharge(&self, req: RechargeRequest) -> Result<Wallet, WalletError> {
        self.bump();
        self.recharges.lock().unwrap().push(req);
        Ok(self.wallet.clone())
    }

    async fn create_transfer(&self, _req: TransferRequest) -> Result<TransferResult, WalletError> {
        self.bump();
        Ok(TransferResult {
            status: Some("completed".to_string()),
            transaction_id: Some("tx-1".to_string()),
        })
    }

    async fn find_wallet_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Wallet>, WalletError> {
        self.bump();
        if !identifier.contains('@') {
            return Err(WalletError::UnsupportedIdentifier(identifier.to_string()));
        }
        Ok(self.find_result.clone())
    }

    async fn list_transactions(
        &self,
        _wallet_id: &str,
    ) -> Result<Vec<BackendTransaction>, WalletError> {
        self.bump();
        Ok(self.transactions.clone())
    }

    async fn save_user_card(&self, req: SaveUserCardRequest) -> Result<(), WalletError> {
        self.bump();
        self.cards.lock().unwrap().push(req);
        Ok(())
    }
}

/// PaymentProvider stub returning a canned confirmation.
pub struct StubProvider {
    pub confirmation: Option<ProviderConfirmation>,
    pub calls: AtomicUsize,
}

impl StubProvider {
    pub fn approved(amount: i64) -> Self {
        StubProvider {
            confirmation: Some(confirmation_with_status("Approved", amount)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_confirmation(confirmation: ProviderConfirmation) -> Self {
        StubProvider {
            confirmation: Some(confirmation),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn confirmation_with_status(status: &str, amount: i64) -> ProviderConfirmation {
    ProviderConfirmation {
        transaction_id: 987654,
        client_transaction_id: "ctx-1".to_string(),
        status: status.to_string(),
        amount,
        card_token: None,
        card_brand: None,
        last_digits: None,
        card_holder: None,
        email: None,
    }
}

#[async_trait]
impl PaymentProvider for StubProvider {
    async fn confirm(
        &self,
        _transaction_id: i64,
        _client_transaction_id: &str,
    ) -> Result<ProviderConfirmation, WalletError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.confirmation.clone().ok_or(WalletError::Network {
            status: Some(500),
            message: "provider unavailable".to_string(),
        })
    }
}
