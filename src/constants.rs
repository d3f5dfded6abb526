/// Divisor applied to integer-form backend balances (minor units).
pub const BALANCE_SCALE: f64 = 100.0;

/// Divisor for payment-provider amounts, which always arrive in cents.
pub const PROVIDER_MINOR_UNITS: f64 = 100.0;

/// Default exchange rate when the config does not override it.
pub const USD_PER_BECOIN: f64 = 0.05;

/// Delay before redirecting back to the wallet screen after a successful
/// recharge, so the success state stays visible.
pub const SUCCESS_REDIRECT_DELAY_MS: u64 = 3000;

/// Route the payment flow redirects to on terminal success.
pub const WALLET_ROUTE: &str = "/wallet";

/// Snapshot format version for the persisted balance store.
pub const SNAPSHOT_VERSION: u32 = 1;
