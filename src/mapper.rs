//! Translates heterogeneous backend transaction records into the normalized
//! frontend model.
//!
//! Classification is keyword-substring matching against ordered rule tables.
//! The tables and their order are load-bearing: the backend's category
//! vocabulary mixes Spanish and English, first match wins, and the defaults
//! absorb anything unknown. Do not reorder without checking live backend
//! samples.

use chrono::{DateTime, Utc};
use log::warn;

use crate::convert::convert_backend_transaction_amount;
use crate::models::{BackendTransaction, Transaction, TransactionStatus, TransactionType};

const TYPE_RULES: &[(&[&str], TransactionType)] = &[
    (&["recarga", "recharge"], TransactionType::Recharge),
    (
        &["transferencia", "transfer", "retiro", "withdraw"],
        TransactionType::Transfer,
    ),
    (&["recibido", "receive"], TransactionType::Receive),
    (&["canje", "exchange"], TransactionType::Exchange),
];

const STATUS_RULES: &[(&[&str], TransactionStatus)] = &[
    (&["pendiente", "pending"], TransactionStatus::Pending),
    (&["fallido", "failed", "error"], TransactionStatus::Failed),
    (
        &["completado", "completed", "exitoso"],
        TransactionStatus::Completed,
    ),
];

pub fn classify_type(label: &str) -> TransactionType {
    let needle = label.to_lowercase();
    for (keywords, tx_type) in TYPE_RULES {
        if keywords.iter().any(|k| needle.contains(k)) {
            return *tx_type;
        }
    }
    TransactionType::Exchange
}

pub fn classify_status(label: &str) -> TransactionStatus {
    let needle = label.to_lowercase();
    for (keywords, status) in STATUS_RULES {
        if keywords.iter().any(|k| needle.contains(k)) {
            return *status;
        }
    }
    TransactionStatus::Completed
}

/// Relative date display: "Hoy, HH:MM", "Ayer, HH:MM", "N días atrás" for
/// 2–6 days, else "DD/MM/YYYY".
pub fn format_relative_date(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now.date_naive() - ts.date_naive()).num_days();
    match days {
        0 => format!("Hoy, {}", ts.format("%H:%M")),
        1 => format!("Ayer, {}", ts.format("%H:%M")),
        2..=6 => format!("{days} días atrás"),
        _ => ts.format("%d/%m/%Y").to_string(),
    }
}

fn default_description(tx_type: TransactionType) -> &'static str {
    match tx_type {
        TransactionType::Recharge => "Recarga de BeCoins",
        TransactionType::Transfer => "Transferencia enviada",
        TransactionType::Receive => "Transferencia recibida",
        TransactionType::Exchange => "Canje de BeCoins",
    }
}

/// Maps one backend record to the frontend model, evaluated against `now` so
/// date formatting is deterministic under test.
pub fn map_backend_transaction(record: &BackendTransaction, now: DateTime<Utc>) -> Transaction {
    let tx_type = record
        .kind
        .as_ref()
        .map(|k| classify_type(k.label()))
        .unwrap_or(TransactionType::Exchange);
    let status = record
        .status
        .as_ref()
        .map(|s| classify_status(s.label()))
        .unwrap_or(TransactionStatus::Completed);

    // Direction lives in the type; the displayed amount is a magnitude.
    let amount = match convert_backend_transaction_amount(record.amount) {
        Ok(v) => v.abs(),
        Err(e) => {
            warn!("Malformed amount on transaction {}: {}", record.id, e);
            0.0
        }
    };

    let description = record
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| default_description(tx_type).to_string());

    Transaction {
        id: record.id.clone(),
        tx_type,
        amount,
        description,
        date: format_relative_date(record.created_at, now),
        status,
        from: record.from.clone(),
        to: record.to.clone(),
    }
}

/// Convenience wrapper for history lists.
pub fn map_backend_transactions(
    records: &[BackendTransaction],
    now: DateTime<Utc>,
) -> Vec<Transaction> {
    records
        .iter()
        .map(|r| map_backend_transaction(r, now))
        .collect()
}
